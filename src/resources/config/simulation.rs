use serde::{Deserialize, Serialize};
use std::path::Path;

use super::physics::PhysicsConfig;
use crate::components::TrimSolverConfig;
use crate::resources::environment::EnvironmentConfig;
use crate::utils::errors::ConfigError;

/// Everything about a run that is not the aircraft itself
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub environment: EnvironmentConfig,
    pub trim: TrimSolverConfig,
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(file)?;
        config.physics.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }
}
