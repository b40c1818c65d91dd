#![allow(dead_code)]

mod assertions;
mod fixtures;

// Re-export
pub use assertions::{
    assert_quaternion_normalised, assert_state_valid, assert_telemetry_finite, assert_trimmed,
};
pub use fixtures::*;
