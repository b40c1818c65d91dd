use nalgebra::Vector3;

use crate::components::{AirData, VehicleState};
use crate::resources::environment::{AtmosphereState, EnvironmentModel};
use crate::utils::constants::{
    AIR_GAS_CONSTANT, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, MIN_AIRSPEED_THRESHOLD,
    SPECIFIC_HEAT_RATIO,
};
use crate::utils::{flight_path_angle, heading_from_velocity};

/// Pitot pressure ratio at Mach 1, (1.2)^3.5 - 1
const SONIC_IMPACT_RATIO: f64 = 0.892_929_158_737_854;
const RAYLEIGH_PITOT_CONSTANT: f64 = 166.921_58;

fn sea_level_speed_of_sound() -> f64 {
    (SPECIFIC_HEAT_RATIO * AIR_GAS_CONSTANT * ISA_SEA_LEVEL_TEMP).sqrt()
}

/// Pitot impact pressure for a Mach number and static pressure [psf].
///
/// Isentropic below Mach 1, Rayleigh pitot (normal shock ahead of the probe) above.
pub fn impact_pressure(mach: f64, pressure: f64) -> f64 {
    let mach = mach.max(0.0);
    if mach < 1.0 {
        pressure * ((1.0 + 0.2 * mach * mach).powf(3.5) - 1.0)
    } else {
        let m2 = mach * mach;
        pressure * (RAYLEIGH_PITOT_CONSTANT * mach.powi(7) / (7.0 * m2 - 1.0).powf(2.5) - 1.0)
    }
}

/// Mach number that produces the impact-to-static pressure ratio `ratio`
pub fn mach_from_impact_ratio(ratio: f64) -> f64 {
    let ratio = ratio.max(0.0);
    let subsonic = (5.0 * ((ratio + 1.0).powf(2.0 / 7.0) - 1.0)).sqrt();
    if ratio <= SONIC_IMPACT_RATIO {
        return subsonic;
    }
    // Rayleigh pitot rearranged as M = c * sqrt((ratio + 1) * (1 - 1/(7 M^2))^2.5)
    let c = (7f64.powf(2.5) / RAYLEIGH_PITOT_CONSTANT).sqrt();
    let mut mach = subsonic.max(1.0);
    for _ in 0..100 {
        let next = c * ((ratio + 1.0) * (1.0 - 1.0 / (7.0 * mach * mach)).powf(2.5)).sqrt();
        if (next - mach).abs() < 1e-12 {
            return next;
        }
        mach = next;
    }
    mach
}

/// Calibrated airspeed for an impact pressure, referenced to sea-level standard [ft/s]
pub fn calibrated_airspeed(impact_pressure: f64) -> f64 {
    mach_from_impact_ratio(impact_pressure / ISA_SEA_LEVEL_PRESSURE) * sea_level_speed_of_sound()
}

/// True airspeed that indicates `calibrated` [ft/s] in the given atmosphere
pub fn true_airspeed_from_calibrated(calibrated: f64, atmosphere: &AtmosphereState) -> f64 {
    let qc = impact_pressure(
        calibrated / sea_level_speed_of_sound(),
        ISA_SEA_LEVEL_PRESSURE,
    );
    mach_from_impact_ratio(qc / atmosphere.pressure) * atmosphere.speed_of_sound
}

/// True airspeed for an equivalent airspeed [ft/s]
pub fn true_airspeed_from_equivalent(equivalent: f64, atmosphere: &AtmosphereState) -> f64 {
    equivalent / atmosphere.sigma.max(1e-9).sqrt()
}

fn calculate_alpha(relative_velocity: &Vector3<f64>, airspeed: f64) -> f64 {
    if airspeed > MIN_AIRSPEED_THRESHOLD {
        relative_velocity.z.atan2(relative_velocity.x)
    } else {
        0.0
    }
}

fn calculate_beta(relative_velocity: &Vector3<f64>, airspeed: f64) -> f64 {
    if airspeed > MIN_AIRSPEED_THRESHOLD {
        let uw = (relative_velocity.x.powi(2) + relative_velocity.z.powi(2)).sqrt();
        relative_velocity.y.atan2(uw)
    } else {
        0.0
    }
}

/// Derive the air-relative flight parameters for the current state.
///
/// # Arguments
/// * `state` - Vehicle state at the start of the frame
/// * `environment` - Atmosphere, wind and gravity model
/// * `terrain_elevation` - Terrain height above sea level [ft]
/// * `previous` - Previous frame's air data and the step since then, used to
///   difference α and β. `None` reports zero rates.
pub fn calculate_air_data(
    state: &VehicleState,
    environment: &EnvironmentModel,
    terrain_elevation: f64,
    previous: Option<(&AirData, f64)>,
) -> AirData {
    let altitude = state.altitude();
    let height_agl = altitude - terrain_elevation;
    let atmosphere = environment.atmosphere.state_at(altitude);
    let wind_ned = environment.wind_at(height_agl);

    let air_velocity = state.velocity - state.attitude.inverse_transform_vector(&wind_ned);
    let true_airspeed = air_velocity.norm();
    let alpha = calculate_alpha(&air_velocity, true_airspeed);
    let beta = calculate_beta(&air_velocity, true_airspeed);

    let (alpha_dot, beta_dot) = match previous {
        Some((prev, dt)) if dt > 0.0 => ((alpha - prev.alpha) / dt, (beta - prev.beta) / dt),
        _ => (0.0, 0.0),
    };

    let mach = true_airspeed / atmosphere.speed_of_sound;
    let qbar = 0.5 * atmosphere.density * true_airspeed * true_airspeed;
    let qc = impact_pressure(mach, atmosphere.pressure);

    let velocity_ned = state.velocity_ned();
    let ground_speed = velocity_ned.x.hypot(velocity_ned.y);

    AirData {
        atmosphere,
        wind_ned,
        air_velocity,
        true_airspeed,
        calibrated_airspeed: calibrated_airspeed(qc),
        equivalent_airspeed: true_airspeed * atmosphere.sigma.sqrt(),
        alpha,
        beta,
        alpha_dot,
        beta_dot,
        mach,
        qbar,
        impact_pressure: qc,
        climb_rate: -velocity_ned.z,
        gamma: flight_path_angle(&velocity_ned),
        ground_speed,
        ground_track: heading_from_velocity(&velocity_ned),
        height_agl,
    }
}
