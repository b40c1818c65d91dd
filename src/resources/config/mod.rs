mod physics;
mod simulation;

pub use physics::{PhysicsConfig, RateIntegrator};
pub use simulation::SimulationConfig;
