use crate::components::{EngineControls, EngineRunState, SpoolConfig, TurbineConfig, TurbopropConfig};
use crate::resources::environment::AtmosphereState;
use crate::utils::{lag_factor, lerp, CoefficientTable};

/// Thrust, fuel flow and afterburner state of a turbine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurbineOutput {
    /// [lbf]
    pub thrust: f64,
    /// [lbs/s]
    pub fuel_flow: f64,
    pub augmentation: bool,
}

/// Spool speeds (N1, N2) [%] the engine is heading toward
pub fn spool_targets(
    spool: &SpoolConfig,
    run_state: EngineRunState,
    throttle: f64,
) -> (f64, f64) {
    match run_state {
        EngineRunState::Off => (0.0, 0.0),
        EngineRunState::Cranking => (
            spool.starter_n2 * spool.idle_n1 / spool.idle_n2,
            spool.starter_n2,
        ),
        EngineRunState::Running => {
            let throttle = throttle.clamp(0.0, 1.0);
            (
                lerp(spool.idle_n1, spool.max_n1, throttle),
                lerp(spool.idle_n2, spool.max_n2, throttle),
            )
        }
    }
}

/// First-order lag of the spools toward their targets
pub fn advance_spool(spool: &SpoolConfig, n1: &mut f64, n2: &mut f64, targets: (f64, f64), dt: f64) {
    let lag = |current: f64, target: f64| {
        let tau = if target > current {
            spool.spool_up_time
        } else {
            spool.spool_down_time
        };
        current + (target - current) * lag_factor(dt, tau)
    };
    *n1 = lag(*n1, targets.0);
    *n2 = lag(*n2, targets.1);
}

/// Fraction of the way from idle to max N2
pub fn n2_fraction(spool: &SpoolConfig, n2: f64) -> f64 {
    ((n2 - spool.idle_n2) / (spool.max_n2 - spool.idle_n2)).clamp(0.0, 1.0)
}

fn lapse(table: &Option<CoefficientTable>, mach: f64, atmosphere: &AtmosphereState) -> f64 {
    match table {
        Some(table) => table.lookup2(mach, atmosphere.altitude),
        None => atmosphere.sigma,
    }
}

/// Dry spool throttle position for an afterburning engine
pub fn dry_throttle(config: &TurbineConfig, throttle: f64) -> f64 {
    if config.augmented && config.augmentation_threshold > 0.0 {
        (throttle / config.augmentation_threshold).clamp(0.0, 1.0)
    } else {
        throttle.clamp(0.0, 1.0)
    }
}

/// Thrust of a running turbine at its current N2.
///
/// Dry thrust grows with the square of the N2 fraction between lapsed idle and
/// military values. With the afterburner armed and the throttle above the
/// threshold, thrust blends toward lapsed max thrust and fuel burns at ATSFC.
pub fn turbine_output(
    config: &TurbineConfig,
    controls: &EngineControls,
    n2: f64,
    mach: f64,
    atmosphere: &AtmosphereState,
) -> TurbineOutput {
    let fraction = n2_fraction(&config.spool, n2);
    let idle = config.mil_thrust * config.idle_thrust_fraction * lapse(&config.idle_lapse, mach, atmosphere);
    let mil = config.mil_thrust * lapse(&config.mil_lapse, mach, atmosphere);
    let dry = idle + (mil - idle) * fraction * fraction;

    let throttle = controls.throttle.clamp(0.0, 1.0);
    let augmenting = config.augmented
        && controls.augmentation
        && throttle > config.augmentation_threshold
        && config.augmentation_threshold < 1.0;

    if augmenting {
        let max = config.max_thrust * lapse(&config.max_lapse, mach, atmosphere);
        let blend = (throttle - config.augmentation_threshold) / (1.0 - config.augmentation_threshold);
        let thrust = dry + (max - mil).max(0.0) * blend * fraction * fraction;
        TurbineOutput {
            thrust,
            fuel_flow: config.atsfc * thrust / 3600.0,
            augmentation: true,
        }
    } else {
        TurbineOutput {
            thrust: dry,
            fuel_flow: config.tsfc * dry / 3600.0,
            augmentation: false,
        }
    }
}

/// Shaft power [hp] and fuel flow [lbs/s] of a running turboprop core
pub fn turboprop_output(config: &TurbopropConfig, n2: f64, atmosphere: &AtmosphereState) -> (f64, f64) {
    let fraction = n2_fraction(&config.spool, n2);
    let power_hp = config.max_shaft_hp * atmosphere.sigma * lerp(config.idle_power_fraction, 1.0, fraction);
    (power_hp, config.psfc * power_hp / 3600.0)
}
