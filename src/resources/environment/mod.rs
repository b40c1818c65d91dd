mod atmosphere;
mod gravity;
mod wind;

pub use atmosphere::{
    geometric_altitude, geopotential_altitude, AtmosphereConfig, AtmosphereModel, AtmosphereState,
};
pub use gravity::{Geodetic, GravityModel};
pub use wind::WindConfig;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub atmosphere: AtmosphereConfig,
    pub wind: WindConfig,
    pub gravity: GravityModel,
}

/// Atmosphere, wind and gravity for one simulation instance
#[derive(Debug, Clone)]
pub struct EnvironmentModel {
    pub atmosphere: AtmosphereModel,
    pub wind: WindConfig,
    pub gravity: GravityModel,
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        Self::new(&EnvironmentConfig::default())
    }
}

impl EnvironmentModel {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            atmosphere: AtmosphereModel::new(config.atmosphere),
            wind: config.wind.clone(),
            gravity: config.gravity,
        }
    }

    pub fn wind_at(&self, height_agl: f64) -> nalgebra::Vector3<f64> {
        self.wind.wind_at(height_agl)
    }
}
