use serde::{Deserialize, Serialize};

use crate::utils::constants::{MAX_TIMESTEP, MIN_TIMESTEP};
use crate::utils::errors::ConfigError;

/// Integration scheme for translational and rotational rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RateIntegrator {
    Euler,
    #[default]
    AdamsBashforth2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed simulation step [s]
    pub timestep: f64,
    pub rate_integrator: RateIntegrator,
    /// Fail a frame as soon as a non-finite value appears
    pub check_integrity: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 120.0,
            rate_integrator: RateIntegrator::AdamsBashforth2,
            check_integrity: true,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TIMESTEP..=MAX_TIMESTEP).contains(&self.timestep) {
            return Err(ConfigError::invalid(format!(
                "timestep {} outside [{MIN_TIMESTEP}, {MAX_TIMESTEP}]",
                self.timestep
            )));
        }
        Ok(())
    }
}
