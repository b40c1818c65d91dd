use serde::{Deserialize, Serialize};

use crate::utils::deg_to_rad;

/// Search ranges for the free trim variables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimBounds {
    /// [rad]
    pub alpha: (f64, f64),
    pub beta: (f64, f64),
    /// Normalised commands
    pub elevator: (f64, f64),
    pub aileron: (f64, f64),
    pub rudder: (f64, f64),
    pub throttle: (f64, f64),
    /// Ground trim attitude ranges [rad]
    pub theta: (f64, f64),
    pub phi: (f64, f64),
    /// Ground trim altitude search half-width about the terrain [ft]
    pub altitude_span: f64,
}

impl Default for TrimBounds {
    fn default() -> Self {
        Self {
            alpha: (deg_to_rad(-10.0), deg_to_rad(25.0)),
            beta: (deg_to_rad(-20.0), deg_to_rad(20.0)),
            elevator: (-1.0, 1.0),
            aileron: (-1.0, 1.0),
            rudder: (-1.0, 1.0),
            throttle: (0.0, 1.0),
            theta: (deg_to_rad(-30.0), deg_to_rad(30.0)),
            phi: (deg_to_rad(-30.0), deg_to_rad(30.0)),
            altitude_span: 50.0,
        }
    }
}

/// Configuration for the trim solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSolverConfig {
    /// Newton iteration budget
    pub max_iterations: u64,
    /// Nelder-Mead iteration budget per stall escape
    pub max_simplex_iterations: u64,
    /// Cost below which the condition counts as trimmed
    pub cost_tolerance: f64,
    /// Relative finite-difference step for the Jacobian
    pub jacobian_step: f64,
    /// Largest Newton step, in units of each variable's range
    pub max_step_fraction: f64,
    pub bounds: TrimBounds,
}

impl Default for TrimSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 60,
            max_simplex_iterations: 400,
            cost_tolerance: 1e-6,
            jacobian_step: 1e-6,
            max_step_fraction: 0.25,
            bounds: TrimBounds::default(),
        }
    }
}
