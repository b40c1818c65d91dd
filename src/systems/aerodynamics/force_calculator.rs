use nalgebra::Vector3;

use crate::components::{AeroAxis, AeroConfig, AeroState, AeroVariable, AirData, SurfacePositions};
use crate::utils::constants::MIN_AIRSPEED_THRESHOLD;
use crate::utils::wind_to_body;

/// Dynamic pressure below which the aerodynamic outputs are zero [psf]
const MIN_QBAR: f64 = 1e-6;

/// Inputs to one aerodynamic evaluation
#[derive(Debug, Clone, Copy)]
pub struct AeroInputs<'a> {
    pub air_data: &'a AirData,
    pub surfaces: &'a SurfacePositions,
    /// Body rates relative to the air mass [rad/s]
    pub body_rates: Vector3<f64>,
    /// Current centre of gravity, body axes relative to the reference point [ft]
    pub cg: Vector3<f64>,
}

struct VariableValues {
    alpha: f64,
    beta: f64,
    roll_rate: f64,
    pitch_rate: f64,
    yaw_rate: f64,
    alpha_rate: f64,
    height_over_span: f64,
}

impl VariableValues {
    fn new(config: &AeroConfig, inputs: &AeroInputs) -> Self {
        let air = inputs.air_data;
        let geometry = &config.geometry;
        let airspeed = air.true_airspeed.max(MIN_AIRSPEED_THRESHOLD);
        let span_scale = geometry.wing_span / (2.0 * airspeed);
        let chord_scale = geometry.chord / (2.0 * airspeed);

        Self {
            alpha: air.alpha.clamp(config.alpha_limits.0, config.alpha_limits.1),
            beta: air.beta.clamp(config.beta_limits.0, config.beta_limits.1),
            roll_rate: inputs.body_rates.x * span_scale,
            pitch_rate: inputs.body_rates.y * chord_scale,
            yaw_rate: inputs.body_rates.z * span_scale,
            alpha_rate: air.alpha_dot * chord_scale,
            height_over_span: (air.height_agl / geometry.wing_span).max(0.0),
        }
    }

    fn value(&self, variable: AeroVariable, inputs: &AeroInputs) -> f64 {
        let surfaces = inputs.surfaces;
        match variable {
            AeroVariable::Alpha => self.alpha,
            AeroVariable::Beta => self.beta,
            AeroVariable::AbsBeta => self.beta.abs(),
            AeroVariable::Mach => inputs.air_data.mach,
            AeroVariable::Elevator => surfaces.elevator,
            AeroVariable::Aileron => surfaces.aileron,
            AeroVariable::Rudder => surfaces.rudder,
            AeroVariable::Flaps => surfaces.flaps,
            AeroVariable::Speedbrake => surfaces.speedbrake,
            AeroVariable::RollRate => self.roll_rate,
            AeroVariable::PitchRate => self.pitch_rate,
            AeroVariable::YawRate => self.yaw_rate,
            AeroVariable::AlphaRate => self.alpha_rate,
            AeroVariable::HeightOverSpan => self.height_over_span,
            AeroVariable::Gear => surfaces.gear,
        }
    }
}

/// Build up the aerodynamic coefficients and resolve them into body-axis loads.
///
/// Wind-axis force terms are rotated through α and β; the moments are transferred
/// from the aerodynamic reference point to the current CG.
pub fn calculate_aerodynamic_forces_moments(config: &AeroConfig, inputs: &AeroInputs) -> AeroState {
    let air = inputs.air_data;
    if air.qbar <= MIN_QBAR || air.true_airspeed <= MIN_AIRSPEED_THRESHOLD {
        return AeroState {
            coefficients: config.terms.iter().map(|t| (t.name.clone(), 0.0)).collect(),
            ..Default::default()
        };
    }

    let values = VariableValues::new(config, inputs);
    let mut state = AeroState::default();

    for term in &config.terms {
        let mut coefficient = term.constant;
        for factor in &term.factors {
            coefficient *= values.value(*factor, inputs);
        }
        if let Some(table) = &term.table {
            let keys: Vec<f64> = table
                .inputs
                .iter()
                .map(|v| values.value(*v, inputs))
                .collect();
            coefficient *= table.data.lookup(&keys);
        }

        match term.axis {
            AeroAxis::Drag => state.wind_coefficients.x += coefficient,
            AeroAxis::Side => state.wind_coefficients.y += coefficient,
            AeroAxis::Lift => state.wind_coefficients.z += coefficient,
            AeroAxis::X => state.body_coefficients.x += coefficient,
            AeroAxis::Y => state.body_coefficients.y += coefficient,
            AeroAxis::Z => state.body_coefficients.z += coefficient,
            AeroAxis::Roll => state.moment_coefficients.x += coefficient,
            AeroAxis::Pitch => state.moment_coefficients.y += coefficient,
            AeroAxis::Yaw => state.moment_coefficients.z += coefficient,
        }
        state.coefficients.insert(term.name.clone(), coefficient);
    }

    let geometry = &config.geometry;
    let qs = air.qbar * geometry.wing_area;
    state.lift_coefficient = state.wind_coefficients.z;

    state.force_wind = qs
        * Vector3::new(
            -state.wind_coefficients.x,
            state.wind_coefficients.y,
            -state.wind_coefficients.z,
        );
    state.force_body =
        wind_to_body(air.alpha, air.beta) * state.force_wind + qs * state.body_coefficients;

    let moment_ref = qs
        * Vector3::new(
            geometry.wing_span * state.moment_coefficients.x,
            geometry.chord * state.moment_coefficients.y,
            geometry.wing_span * state.moment_coefficients.z,
        );
    let arm = geometry.reference_point - inputs.cg;
    state.moment = moment_ref + arm.cross(&state.force_body);

    state
}
