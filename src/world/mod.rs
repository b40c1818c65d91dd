mod initial_conditions;
mod properties;
mod simulation;

pub use initial_conditions::{InitialConditions, InitialSpeed};
pub use simulation::Simulation;
