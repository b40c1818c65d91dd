use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target equilibrium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrimCondition {
    /// Wings-level, constant altitude at the current airspeed
    Level,
    /// Steady climb (or descent) along flight path angle `gamma` [rad]
    Climb { gamma: f64 },
    /// Coordinated level turn at bank angle `bank` [rad]
    Turn { bank: f64 },
    /// At rest on the gear
    Ground,
}

impl TrimCondition {
    pub fn gamma(&self) -> f64 {
        match self {
            TrimCondition::Climb { gamma } => *gamma,
            _ => 0.0,
        }
    }

    pub fn bank(&self) -> f64 {
        match self {
            TrimCondition::Turn { bank } => *bank,
            _ => 0.0,
        }
    }
}

/// Acceleration residuals: body linear (ft/s²) and angular (rad/s²)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrimResiduals {
    pub udot: f64,
    pub vdot: f64,
    pub wdot: f64,
    pub pdot: f64,
    pub qdot: f64,
    pub rdot: f64,
}

impl TrimResiduals {
    /// Sum of squares with angular terms weighted by ten
    pub fn cost(&self) -> f64 {
        self.udot.powi(2)
            + self.vdot.powi(2)
            + self.wdot.powi(2)
            + (10.0 * self.pdot).powi(2)
            + (10.0 * self.qdot).powi(2)
            + (10.0 * self.rdot).powi(2)
    }

    /// Cost over the residuals a ground trim balances
    pub fn ground_cost(&self) -> f64 {
        self.wdot.powi(2) + (10.0 * self.pdot).powi(2) + (10.0 * self.qdot).powi(2)
    }
}

/// A converged equilibrium
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSolution {
    pub condition: TrimCondition,
    /// [rad]
    pub alpha: f64,
    pub beta: f64,
    pub theta: f64,
    pub phi: f64,
    /// Normalised commands
    pub elevator: f64,
    pub aileron: f64,
    pub rudder: f64,
    pub throttle: f64,
    /// Geometric altitude of the solution [ft]
    pub altitude: f64,
    pub cost: f64,
    pub iterations: u64,
    pub residuals: TrimResiduals,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrimError {
    #[error("Trim did not converge: cost {cost:.3e} after {iterations} iterations")]
    NotConverged { cost: f64, iterations: u64 },

    #[error("Invalid trim condition: {0}")]
    InvalidCondition(String),

    #[error("Ground trim left units unloaded: {0}")]
    Unsettled(String),

    #[error("Trim solver failed: {0}")]
    Solver(String),
}
