use std::f64::consts::PI;

use crate::components::{PropellerConfig, PropellerState};
use crate::utils::constants::RPM_TO_RADPS;

/// Shaft speed floor for the torque balance [rad/s]
const MIN_SHAFT_SPEED: f64 = 5.0;
const BISECTION_STEPS: usize = 60;

/// Thrust and power coefficients at an advance ratio and blade angle [deg]
pub fn propeller_coefficients(config: &PropellerConfig, advance_ratio: f64, blade_angle: f64) -> (f64, f64) {
    if config.is_variable_pitch() {
        (
            config.ct_table.lookup2(advance_ratio, blade_angle),
            config.cp_table.lookup2(advance_ratio, blade_angle),
        )
    } else {
        (
            config.ct_table.lookup1(advance_ratio),
            config.cp_table.lookup1(advance_ratio),
        )
    }
}

/// Propeller thrust and absorbed power at a shaft speed.
///
/// # Arguments
/// * `rpm` - Propeller speed
/// * `blade_angle` - Blade angle [deg], ignored by fixed-pitch tables
/// * `axial_airspeed` - Inflow speed along the thrust line [ft/s]
/// * `density` - Air density [slug/ft³]
pub fn calculate_propeller_loads(
    config: &PropellerConfig,
    rpm: f64,
    blade_angle: f64,
    axial_airspeed: f64,
    density: f64,
) -> PropellerState {
    let rpm = rpm.max(0.0);
    let n = rpm / 60.0;
    let d = config.diameter;
    let advance_ratio = if n > 1e-6 { axial_airspeed / (n * d) } else { 0.0 };
    let (ct, cp) = propeller_coefficients(config, advance_ratio, blade_angle);

    let thrust = ct * density * n * n * d.powi(4);
    let power = cp * density * n.powi(3) * d.powi(5);
    let torque = if n > 1e-6 { power / (2.0 * PI * n) } else { 0.0 };
    let efficiency = if power > 1e-9 {
        (thrust * axial_airspeed / power).max(0.0)
    } else {
        0.0
    };

    PropellerState {
        rpm,
        blade_angle,
        advance_ratio,
        thrust,
        power,
        torque,
        efficiency,
        ct,
        cp,
    }
}

/// Move the blade angle toward holding the governor's target RPM
fn govern(config: &PropellerConfig, state: &mut PropellerState, dt: f64) {
    if let Some(governor) = &config.governor {
        let error = state.rpm - governor.target_rpm;
        state.blade_angle = (state.blade_angle + governor.gain * error * dt)
            .clamp(governor.min_pitch, governor.max_pitch);
    }
}

/// Advance the shaft by one step of `I·dΩ/dt = (P_shaft − P_prop)/Ω`.
///
/// `shaft_power` is the power delivered to the propeller [ft·lbf/s].
pub fn advance_propeller(
    config: &PropellerConfig,
    state: &mut PropellerState,
    shaft_power: f64,
    axial_airspeed: f64,
    density: f64,
    dt: f64,
) {
    govern(config, state, dt);
    let loads = calculate_propeller_loads(config, state.rpm, state.blade_angle, axial_airspeed, density);

    let omega = state.rpm * RPM_TO_RADPS;
    let omega_dot = (shaft_power - loads.power) / (config.inertia * omega.max(MIN_SHAFT_SPEED));
    let rpm = (omega + omega_dot * dt).max(0.0) / RPM_TO_RADPS;

    *state = calculate_propeller_loads(config, rpm, state.blade_angle, axial_airspeed, density);
}

/// Shaft speed at which the delivered and absorbed power balance.
///
/// `shaft_power` gives the delivered power [ft·lbf/s] at a propeller RPM; the
/// search runs over (0, `rpm_limit`].
fn balance_rpm(
    config: &PropellerConfig,
    shaft_power: &dyn Fn(f64) -> f64,
    blade_angle: f64,
    axial_airspeed: f64,
    density: f64,
    rpm_limit: f64,
) -> f64 {
    let excess = |rpm: f64| {
        shaft_power(rpm)
            - calculate_propeller_loads(config, rpm, blade_angle, axial_airspeed, density).power
    };
    let (mut lo, mut hi) = (1.0, rpm_limit);
    if excess(hi) >= 0.0 {
        return hi;
    }
    if excess(lo) <= 0.0 {
        return 0.0;
    }
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if excess(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Put the propeller at its steady operating point for the delivered power.
///
/// A governed propeller first searches blade angle at the target RPM and only
/// lets the RPM float once the blade reaches a pitch stop.
pub fn settle_propeller(
    config: &PropellerConfig,
    state: &mut PropellerState,
    shaft_power: &dyn Fn(f64) -> f64,
    axial_airspeed: f64,
    density: f64,
    rpm_limit: f64,
) {
    let mut blade_angle = if config.is_variable_pitch() {
        state.blade_angle
    } else {
        config.fixed_pitch
    };

    if let Some(governor) = &config.governor {
        let target = governor.target_rpm;
        let available = shaft_power(target);
        let absorbed = |angle: f64| {
            calculate_propeller_loads(config, target, angle, axial_airspeed, density).power
        };
        let (mut lo, mut hi) = (governor.min_pitch, governor.max_pitch);
        blade_angle = if absorbed(hi) <= available {
            hi
        } else if absorbed(lo) >= available {
            lo
        } else {
            for _ in 0..BISECTION_STEPS {
                let mid = 0.5 * (lo + hi);
                if absorbed(mid) < available {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            0.5 * (lo + hi)
        };
        let balanced = (absorbed(blade_angle) - available).abs() <= 1e-6 * available.abs().max(1.0);
        let rpm = if balanced {
            target
        } else {
            balance_rpm(config, shaft_power, blade_angle, axial_airspeed, density, rpm_limit)
        };
        *state = calculate_propeller_loads(config, rpm, blade_angle, axial_airspeed, density);
        return;
    }

    let rpm = balance_rpm(config, shaft_power, blade_angle, axial_airspeed, density, rpm_limit);
    *state = calculate_propeller_loads(config, rpm, blade_angle, axial_airspeed, density);
}
