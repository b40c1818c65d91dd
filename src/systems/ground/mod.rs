mod contact;

pub use contact::{brake_command, calculate_ground_reactions, GroundInputs};
