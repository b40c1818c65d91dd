mod problem;
mod solver;

pub use problem::{pitch_for_flight_path, TrimProblem};
pub use solver::TrimSolver;
