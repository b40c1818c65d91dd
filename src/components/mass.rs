use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::constants::STANDARD_GRAVITY;
use crate::utils::errors::ConfigError;

/// A fixed payload item, located in body axes relative to the reference point [ft]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMass {
    pub name: String,
    /// Weight [lbs]
    pub weight: f64,
    pub location: Vector3<f64>,
}

/// Structural mass properties of the airframe.
///
/// Products of inertia are entered positive; the tensor carries them negated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassConfig {
    /// Empty weight [lbs]
    pub empty_weight: f64,
    /// Empty centre of gravity relative to the reference point, body axes [ft]
    pub empty_cg: Vector3<f64>,
    /// Moments of inertia about the empty CG [slug·ft²]
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    #[serde(default)]
    pub ixy: f64,
    #[serde(default)]
    pub ixz: f64,
    #[serde(default)]
    pub iyz: f64,
    #[serde(default)]
    pub point_masses: Vec<PointMass>,
}

impl MassConfig {
    pub fn new(empty_weight: f64, ixx: f64, iyy: f64, izz: f64, ixz: f64) -> Self {
        Self {
            empty_weight,
            empty_cg: Vector3::zeros(),
            ixx,
            iyy,
            izz,
            ixy: 0.0,
            ixz,
            iyz: 0.0,
            point_masses: Vec::new(),
        }
    }

    /// Empty inertia tensor about the empty CG
    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.ixx, -self.ixy, -self.ixz, //
            -self.ixy, self.iyy, -self.iyz, //
            -self.ixz, -self.iyz, self.izz,
        )
    }

    pub fn empty_mass(&self) -> f64 {
        self.empty_weight / STANDARD_GRAVITY
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.empty_weight > 0.0) {
            return Err(ConfigError::invalid("empty weight must be positive"));
        }
        if self.ixx <= 0.0 || self.iyy <= 0.0 || self.izz <= 0.0 {
            return Err(ConfigError::invalid("principal moments of inertia must be positive"));
        }
        if self.inertia_tensor().try_inverse().is_none() {
            return Err(ConfigError::invalid("inertia tensor is singular"));
        }
        if let Some(bad) = self.point_masses.iter().find(|p| p.weight < 0.0) {
            return Err(ConfigError::invalid(format!(
                "point mass {} has negative weight",
                bad.name
            )));
        }
        Ok(())
    }
}

/// Mass properties of the whole vehicle for the current frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassAggregate {
    /// [slugs]
    pub mass: f64,
    /// [lbs]
    pub weight: f64,
    pub empty_weight: f64,
    /// Body-axis CG relative to the reference point [ft]
    pub cg: Vector3<f64>,
    /// Inertia tensor about the CG [slug·ft²]
    pub inertia: Matrix3<f64>,
    pub inertia_inv: Matrix3<f64>,
}

impl Default for MassAggregate {
    fn default() -> Self {
        Self {
            mass: 1.0,
            weight: STANDARD_GRAVITY,
            empty_weight: STANDARD_GRAVITY,
            cg: Vector3::zeros(),
            inertia: Matrix3::identity(),
            inertia_inv: Matrix3::identity(),
        }
    }
}
