use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::errors::ConfigError;

/// Which brake command acts on a gear unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrakeGroup {
    #[default]
    None,
    Left,
    Right,
    /// Follows the larger of the left and right commands
    Center,
    Nose,
    Tail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearConfig {
    pub name: String,
    /// Contact point, body axes relative to the reference point [ft]
    pub location: Vector3<f64>,
    /// [lbf/ft]
    pub spring_k: f64,
    /// Compression damping [lbf·s/ft]
    pub damping_c: f64,
    /// Rebound damping [lbf·s/ft], defaults to `damping_c`
    #[serde(default)]
    pub damping_rebound: Option<f64>,
    pub static_friction: f64,
    pub dynamic_friction: f64,
    pub rolling_friction: f64,
    /// Maximum steering angle [deg]; zero for a fixed unit
    #[serde(default)]
    pub max_steer: f64,
    #[serde(default)]
    pub brake_group: BrakeGroup,
    #[serde(default)]
    pub retractable: bool,
}

impl GearConfig {
    pub fn is_steerable(&self) -> bool {
        self.max_steer.abs() > 0.0
    }

    pub fn rebound_damping(&self) -> f64 {
        self.damping_rebound.unwrap_or(self.damping_c)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    #[serde(default)]
    pub units: Vec<GearConfig>,
    /// Time for a full retraction or extension [s]
    #[serde(default = "default_transition_time")]
    pub transition_time: f64,
    /// Contact speed below which static friction applies [ft/s]
    #[serde(default = "default_rolling_threshold")]
    pub rolling_threshold: f64,
}

fn default_transition_time() -> f64 {
    5.0
}

fn default_rolling_threshold() -> f64 {
    0.1
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            transition_time: default_transition_time(),
            rolling_threshold: default_rolling_threshold(),
        }
    }
}

impl GroundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transition_time < 0.0 || self.rolling_threshold <= 0.0 {
            return Err(ConfigError::invalid("invalid gear transition or rolling threshold"));
        }
        for unit in &self.units {
            if unit.spring_k <= 0.0 || unit.damping_c < 0.0 || unit.rebound_damping() < 0.0 {
                return Err(ConfigError::invalid(format!(
                    "gear {} needs a positive spring and non-negative damping",
                    unit.name
                )));
            }
            let friction = [unit.static_friction, unit.dynamic_friction, unit.rolling_friction];
            if friction.iter().any(|mu| *mu < 0.0) {
                return Err(ConfigError::invalid(format!(
                    "gear {} has a negative friction coefficient",
                    unit.name
                )));
            }
        }
        Ok(())
    }

    pub fn has_retractable_gear(&self) -> bool {
        self.units.iter().any(|u| u.retractable)
    }
}

/// Per-unit contact state for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GearState {
    /// Penetration along the local vertical [ft]
    pub compression: f64,
    /// Sink rate of the contact point [ft/s]
    pub compression_rate: f64,
    pub wow: bool,
    /// [lbf]
    pub normal_force: f64,
    /// [rad]
    pub steer_angle: f64,
    /// Rolling-direction speed of the contact point [ft/s]
    pub wheel_speed: f64,
    /// Friction force in the wheel frame (rolling, side) [lbf]
    pub friction: (f64, f64),
    /// Body-axis force and moment about the CG
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}
