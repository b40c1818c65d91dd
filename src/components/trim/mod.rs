mod config;
mod state;

pub use config::{TrimBounds, TrimSolverConfig};
pub use state::{TrimCondition, TrimError, TrimResiduals, TrimSolution};
