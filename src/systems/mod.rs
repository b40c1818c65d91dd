pub mod aerodynamics;
pub mod ground;
pub mod mass;
pub mod physics;
pub mod propulsion;
pub mod trim;

pub use aerodynamics::{calculate_aerodynamic_forces_moments, calculate_air_data, AeroInputs};
pub use ground::{calculate_ground_reactions, GroundInputs};
pub use mass::calculate_mass_properties;
pub use physics::{
    calculate_accelerations, calculate_net_forces_moments, evaluate_derivatives, propagate,
    IntegratorHistory, ModelContext,
};
pub use propulsion::{calculate_propulsion, set_engine_running, PropulsionMode};
pub use trim::{TrimProblem, TrimSolver};
