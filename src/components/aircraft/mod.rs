mod presets;
mod state;

pub use state::AircraftState;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::components::{AeroConfig, ControlLimits, GroundConfig, MassConfig, PropulsionConfig};
use crate::utils::errors::ConfigError;

/// The full aircraft definition consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftConfig {
    pub name: String,
    pub mass: MassConfig,
    /// Pilot eye point, body axes relative to the reference point [ft]
    #[serde(default)]
    pub pilot_eye: Vector3<f64>,
    pub aero: AeroConfig,
    #[serde(default)]
    pub propulsion: PropulsionConfig,
    #[serde(default)]
    pub ground: GroundConfig,
    #[serde(default)]
    pub limits: ControlLimits,
}

impl AircraftConfig {
    /// Parse and validate an aircraft from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate an aircraft from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading aircraft configuration from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self
            .mass
            .validate()
            .and_then(|_| self.aero.validate())
            .and_then(|_| self.propulsion.validate())
            .and_then(|_| self.ground.validate())
            .and_then(|_| self.limits.validate());
        if let Err(err) = &result {
            warn!("Aircraft {} failed validation: {}", self.name, err);
        }
        result
    }

    pub fn engine_count(&self) -> usize {
        self.propulsion.engines.len()
    }
}
