mod accelerations;
mod force_calculator;
mod integrator;

pub use accelerations::calculate_accelerations;
pub use force_calculator::{calculate_net_forces_moments, evaluate_derivatives, ModelContext};
pub use integrator::{propagate, IntegratorHistory};
