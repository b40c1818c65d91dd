use crate::components::{EngineControls, EngineRunState, PistonConfig};
use crate::resources::environment::AtmosphereState;
use crate::utils::constants::{
    AIR_GAS_CONSTANT, IN3_TO_FT3, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP, PSF_TO_INHG,
    STANDARD_GRAVITY,
};

/// Fuel-air mass ratio at full rich mixture
const FULL_RICH_FUEL_AIR_RATIO: f64 = 0.08;
const STOICHIOMETRIC_FUEL_AIR_RATIO: f64 = 0.0668;
/// Equivalence ratio of best power
const BEST_POWER_EQUIVALENCE: f64 = 1.15;

/// Power output of a piston engine at one shaft speed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PistonOutput {
    /// Net shaft power [hp]
    pub power_hp: f64,
    /// [inHg]
    pub map_inhg: f64,
    /// [lbs/s]
    pub fuel_flow: f64,
}

/// Combustion efficiency over equivalence ratio, peaking at best-power mixture
pub fn mixture_efficiency(equivalence_ratio: f64) -> f64 {
    (1.0 - 3.0 * (equivalence_ratio - BEST_POWER_EQUIVALENCE).powi(2)).clamp(0.0, 1.0)
}

pub fn equivalence_ratio(mixture: f64) -> f64 {
    mixture.clamp(0.0, 1.0) * FULL_RICH_FUEL_AIR_RATIO / STOICHIOMETRIC_FUEL_AIR_RATIO
}

/// Power fraction from the magneto selection: 0 off, 1 or 2 single, 3 both
pub fn magneto_factor(magnetos: u8) -> f64 {
    match magnetos {
        0 => 0.0,
        1 | 2 => 0.97,
        _ => 1.0,
    }
}

/// Whether the ignition and mixture can sustain combustion
pub fn can_fire(controls: &EngineControls) -> bool {
    magneto_factor(controls.magnetos) > 0.0
        && mixture_efficiency(equivalence_ratio(controls.mixture)) > 0.0
}

/// Induction air mass flow [slug/s]
fn air_flow(config: &PistonConfig, engine_rpm: f64, manifold_density: f64) -> f64 {
    config.volumetric_efficiency * config.displacement * IN3_TO_FT3 * engine_rpm / 120.0
        * manifold_density
}

/// Shaft power of a piston engine at `engine_rpm`.
///
/// Combustion power scales with induction air flow relative to the rated flow
/// at sea level; friction grows with the square of RPM and the starter adds a
/// fixed power while cranking.
pub fn piston_output(
    config: &PistonConfig,
    controls: &EngineControls,
    run_state: EngineRunState,
    engine_rpm: f64,
    atmosphere: &AtmosphereState,
) -> PistonOutput {
    let engine_rpm = engine_rpm.max(0.0);
    let friction_hp =
        config.friction_fraction * config.max_hp * (engine_rpm / config.max_rpm).powi(2);

    let (combustion_hp, map, fuel_flow) = match run_state {
        EngineRunState::Running => {
            let throttle = controls.throttle.clamp(0.0, 1.0);
            let map = atmosphere.pressure
                * (config.idle_map_fraction + (1.0 - config.idle_map_fraction) * throttle);
            let manifold_density = map / (AIR_GAS_CONSTANT * atmosphere.temperature);
            let flow = air_flow(config, engine_rpm, manifold_density);
            let rated_flow = air_flow(
                config,
                config.max_rpm,
                ISA_SEA_LEVEL_PRESSURE / (AIR_GAS_CONSTANT * ISA_SEA_LEVEL_TEMP),
            );

            let phi = equivalence_ratio(controls.mixture);
            let hp = config.max_hp
                * (1.0 + config.friction_fraction)
                * flow
                / rated_flow
                * mixture_efficiency(phi)
                * magneto_factor(controls.magnetos);
            let fuel_air = controls.mixture.clamp(0.0, 1.0) * FULL_RICH_FUEL_AIR_RATIO;
            (hp, map, flow * STANDARD_GRAVITY * fuel_air)
        }
        EngineRunState::Cranking => (config.starter_hp, atmosphere.pressure, 0.0),
        EngineRunState::Off => (0.0, atmosphere.pressure, 0.0),
    };

    PistonOutput {
        power_hp: combustion_hp - friction_hp,
        map_inhg: map * PSF_TO_INHG,
        fuel_flow,
    }
}
