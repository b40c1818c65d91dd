use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::errors::ConfigError;
use crate::utils::{deg_to_rad, CoefficientTable};

/// Axis a coefficient term contributes to.
///
/// `Drag`, `Side` and `Lift` are wind axes; `X`, `Y` and `Z` are body axes.
/// Drag and lift are positive against the wind-axis x and z directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AeroAxis {
    Drag,
    Side,
    Lift,
    X,
    Y,
    Z,
    Roll,
    Pitch,
    Yaw,
}

impl AeroAxis {
    pub fn is_moment(&self) -> bool {
        matches!(self, AeroAxis::Roll | AeroAxis::Pitch | AeroAxis::Yaw)
    }
}

/// Independent variables available to coefficient terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AeroVariable {
    /// Angle of attack [rad]
    Alpha,
    /// Sideslip [rad]
    Beta,
    AbsBeta,
    Mach,
    /// Elevator deflection [rad]
    Elevator,
    /// Aileron deflection [rad]
    Aileron,
    /// Rudder deflection [rad]
    Rudder,
    /// Flap position, normalised
    Flaps,
    /// Speedbrake position, normalised
    Speedbrake,
    /// Non-dimensional roll rate pb/2V
    RollRate,
    /// Non-dimensional pitch rate qc/2V
    PitchRate,
    /// Non-dimensional yaw rate rb/2V
    YawRate,
    /// Non-dimensional alpha rate (dα/dt)c/2V
    AlphaRate,
    /// Height above ground over wing span
    HeightOverSpan,
    /// Gear position, normalised
    Gear,
}

/// Table part of a coefficient term, indexed by one to three variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermTable {
    pub inputs: Vec<AeroVariable>,
    pub data: CoefficientTable,
}

/// One named contribution: `constant × Π factors × table(inputs)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroTerm {
    pub name: String,
    pub axis: AeroAxis,
    #[serde(default = "unit_constant")]
    pub constant: f64,
    #[serde(default)]
    pub factors: Vec<AeroVariable>,
    #[serde(default)]
    pub table: Option<TermTable>,
}

fn unit_constant() -> f64 {
    1.0
}

impl AeroTerm {
    pub fn constant(name: &str, axis: AeroAxis, value: f64) -> Self {
        Self {
            name: name.to_string(),
            axis,
            constant: value,
            factors: Vec::new(),
            table: None,
        }
    }

    /// Linear derivative term `value × variable`
    pub fn derivative(name: &str, axis: AeroAxis, value: f64, variable: AeroVariable) -> Self {
        Self {
            factors: vec![variable],
            ..Self::constant(name, axis, value)
        }
    }

    pub fn tabulated(
        name: &str,
        axis: AeroAxis,
        inputs: Vec<AeroVariable>,
        data: CoefficientTable,
    ) -> Self {
        Self {
            table: Some(TermTable { inputs, data }),
            ..Self::constant(name, axis, 1.0)
        }
    }

    pub fn with_factor(mut self, variable: AeroVariable) -> Self {
        self.factors.push(variable);
        self
    }
}

/// Reference geometry for dimensionalising coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AeroGeometry {
    /// [ft²]
    pub wing_area: f64,
    /// [ft]
    pub wing_span: f64,
    /// Mean aerodynamic chord [ft]
    pub chord: f64,
    /// Aerodynamic reference point, body axes relative to the reference point [ft]
    #[serde(default = "Vector3::zeros")]
    pub reference_point: Vector3<f64>,
}

impl AeroGeometry {
    pub fn new(wing_area: f64, wing_span: f64, chord: f64) -> Self {
        Self {
            wing_area,
            wing_span,
            chord,
            reference_point: Vector3::zeros(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroConfig {
    pub geometry: AeroGeometry,
    pub terms: Vec<AeroTerm>,
    /// Angle of attack clamp applied before evaluation [rad]
    #[serde(default = "default_alpha_limits")]
    pub alpha_limits: (f64, f64),
    #[serde(default = "default_beta_limits")]
    pub beta_limits: (f64, f64),
}

fn default_alpha_limits() -> (f64, f64) {
    (deg_to_rad(-90.0), deg_to_rad(90.0))
}

fn default_beta_limits() -> (f64, f64) {
    (deg_to_rad(-90.0), deg_to_rad(90.0))
}

impl AeroConfig {
    pub fn new(geometry: AeroGeometry, terms: Vec<AeroTerm>) -> Self {
        Self {
            geometry,
            terms,
            alpha_limits: default_alpha_limits(),
            beta_limits: default_beta_limits(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        if g.wing_area <= 0.0 || g.wing_span <= 0.0 || g.chord <= 0.0 {
            return Err(ConfigError::invalid("reference geometry must be positive"));
        }
        if self.alpha_limits.0 >= self.alpha_limits.1 || self.beta_limits.0 >= self.beta_limits.1 {
            return Err(ConfigError::invalid("aerodynamic angle limits are inverted"));
        }
        let mut names = std::collections::HashSet::new();
        for term in &self.terms {
            if !names.insert(term.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate aerodynamic term {}",
                    term.name
                )));
            }
            if let Some(table) = &term.table {
                if table.inputs.len() != table.data.dimensions() {
                    return Err(ConfigError::invalid(format!(
                        "term {} names {} inputs for a {}-D table",
                        term.name,
                        table.inputs.len(),
                        table.data.dimensions()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Aerodynamic outputs of the current frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AeroState {
    /// Per-term coefficient values
    pub coefficients: BTreeMap<String, f64>,
    /// Summed wind-axis coefficients (drag, side, lift)
    pub wind_coefficients: Vector3<f64>,
    /// Summed body-axis force coefficients (X, Y, Z)
    pub body_coefficients: Vector3<f64>,
    /// Summed moment coefficients (roll, pitch, yaw)
    pub moment_coefficients: Vector3<f64>,
    /// Wind-axis force [lbf], components are (−drag, side, −lift)
    pub force_wind: Vector3<f64>,
    /// Body-axis force [lbf]
    pub force_body: Vector3<f64>,
    /// Body-axis moment about the CG [lbf·ft]
    pub moment: Vector3<f64>,
    pub lift_coefficient: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> AeroGeometry {
        AeroGeometry::new(174.0, 35.8, 4.9)
    }

    #[test]
    fn test_term_builders() {
        let term = AeroTerm::derivative("CLalpha", AeroAxis::Lift, 4.9, AeroVariable::Alpha)
            .with_factor(AeroVariable::Mach);
        assert_eq!(term.factors, vec![AeroVariable::Alpha, AeroVariable::Mach]);
        assert!(term.table.is_none());
        assert!(AeroAxis::Pitch.is_moment());
        assert!(!AeroAxis::Lift.is_moment());
    }

    #[test]
    fn test_duplicate_terms_rejected() {
        let config = AeroConfig::new(
            geometry(),
            vec![
                AeroTerm::constant("CD0", AeroAxis::Drag, 0.03),
                AeroTerm::constant("CD0", AeroAxis::Drag, 0.01),
            ],
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_arity_checked() {
        let table = CoefficientTable::from_pairs(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
        let mut term = AeroTerm::tabulated("CLa", AeroAxis::Lift, vec![AeroVariable::Alpha], table);
        let config = AeroConfig::new(geometry(), vec![term.clone()]);
        assert!(config.validate().is_ok());

        if let Some(table) = term.table.as_mut() {
            table.inputs.push(AeroVariable::Mach);
        }
        let config = AeroConfig::new(geometry(), vec![term]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_term_defaults() {
        let yaml = "name: CYb\naxis: Side\nconstant: -0.31\nfactors: [Beta]\n";
        let term: AeroTerm = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(term.factors, vec![AeroVariable::Beta]);

        let term: AeroTerm = serde_yaml::from_str("name: CD0\naxis: Drag\n").unwrap();
        assert_eq!(term.constant, 1.0);
    }
}
