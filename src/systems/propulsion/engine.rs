use nalgebra::Vector3;
use tracing::{debug, info};

use crate::components::{
    EngineConfig, EngineControls, EngineKind, EngineRunState, EngineState, PistonConfig,
    PropellerConfig, PropellerState, TurbineConfig, TurbopropConfig,
};
use crate::resources::environment::AtmosphereState;
use crate::utils::constants::HP_TO_FTLBS;

use super::piston::{can_fire, piston_output};
use super::propeller::{advance_propeller, settle_propeller};
use super::turbine::{
    advance_spool, dry_throttle, spool_targets, turbine_output, turboprop_output,
};

/// Ambient conditions seen by one engine
#[derive(Debug, Clone, Copy)]
pub struct EngineEnvironment {
    pub atmosphere: AtmosphereState,
    pub mach: f64,
    /// Inflow speed along the thrust line [ft/s]
    pub axial_airspeed: f64,
}

/// Apply the Off/Cranking/Running transitions for this frame
fn update_run_state(
    config: &EngineConfig,
    controls: &EngineControls,
    state: &mut EngineState,
    fuel_available: bool,
) {
    let previous = state.run_state;
    state.starved = !fuel_available;

    state.run_state = match (previous, &config.kind) {
        (EngineRunState::Off, _) if controls.starter => EngineRunState::Cranking,
        (EngineRunState::Off, _) => EngineRunState::Off,
        (EngineRunState::Cranking, _) if !controls.starter => EngineRunState::Off,
        (EngineRunState::Cranking, EngineKind::Piston(piston)) => {
            if fuel_available && can_fire(controls) && state.rpm >= piston.catch_rpm {
                EngineRunState::Running
            } else {
                EngineRunState::Cranking
            }
        }
        (EngineRunState::Cranking, EngineKind::Turbine(TurbineConfig { spool, .. }))
        | (EngineRunState::Cranking, EngineKind::Turboprop(TurbopropConfig { spool, .. })) => {
            if fuel_available && !controls.cutoff && state.n2 >= spool.light_off_n2 {
                EngineRunState::Running
            } else {
                EngineRunState::Cranking
            }
        }
        (EngineRunState::Running, _) if !fuel_available => EngineRunState::Off,
        (EngineRunState::Running, EngineKind::Piston(_)) if !can_fire(controls) => {
            EngineRunState::Off
        }
        (EngineRunState::Running, EngineKind::Turbine(_) | EngineKind::Turboprop(_))
            if controls.cutoff =>
        {
            EngineRunState::Off
        }
        (EngineRunState::Running, _) => EngineRunState::Running,
    };

    if state.run_state != previous {
        if state.starved && previous == EngineRunState::Running {
            info!("Engine {} starved of fuel", config.name);
        } else {
            debug!(
                "Engine {} {:?} -> {:?}",
                config.name, previous, state.run_state
            );
        }
    }
}

fn piston_shaft_power<'a>(
    piston: &'a PistonConfig,
    controls: &EngineControls,
    run_state: EngineRunState,
    atmosphere: &AtmosphereState,
) -> impl Fn(f64) -> f64 + 'a {
    let controls = *controls;
    let atmosphere = *atmosphere;
    move |prop_rpm: f64| {
        piston_output(
            piston,
            &controls,
            run_state,
            prop_rpm * piston.propeller.gear_ratio,
            &atmosphere,
        )
        .power_hp
            * HP_TO_FTLBS
    }
}

fn record_piston(
    piston: &PistonConfig,
    controls: &EngineControls,
    state: &mut EngineState,
    atmosphere: &AtmosphereState,
) {
    state.rpm = state.propeller.rpm * piston.propeller.gear_ratio;
    let output = piston_output(piston, controls, state.run_state, state.rpm, atmosphere);
    state.power_hp = output.power_hp;
    state.map_inhg = output.map_inhg;
    state.fuel_flow = output.fuel_flow;
    state.thrust = running_thrust(state.run_state, &state.propeller);
}

fn running_thrust(run_state: EngineRunState, propeller: &PropellerState) -> f64 {
    if run_state == EngineRunState::Running {
        propeller.thrust
    } else {
        0.0
    }
}

fn turboprop_power(
    turboprop: &TurbopropConfig,
    run_state: EngineRunState,
    n2: f64,
    atmosphere: &AtmosphereState,
) -> (f64, f64) {
    if run_state == EngineRunState::Running {
        turboprop_output(turboprop, n2, atmosphere)
    } else {
        (0.0, 0.0)
    }
}

fn record_turbine(
    turbine: &TurbineConfig,
    controls: &EngineControls,
    state: &mut EngineState,
    env: &EngineEnvironment,
) {
    let output = if state.run_state == EngineRunState::Running {
        turbine_output(turbine, controls, state.n2, env.mach, &env.atmosphere)
    } else {
        Default::default()
    };
    state.thrust = output.thrust;
    state.fuel_flow = output.fuel_flow;
    state.augmentation = output.augmentation;
}

fn propeller_rpm_limit(propeller: &PropellerConfig, rated_engine_rpm: f64) -> f64 {
    let governed = propeller.governor.map_or(0.0, |g| g.target_rpm);
    1.5 * governed.max(rated_engine_rpm / propeller.gear_ratio)
}

/// Advance one engine by a frame: run state, spools or shaft, outputs
pub fn advance_engine(
    config: &EngineConfig,
    controls: &EngineControls,
    state: &mut EngineState,
    env: &EngineEnvironment,
    fuel_available: bool,
    dt: f64,
) {
    update_run_state(config, controls, state, fuel_available);
    let density = env.atmosphere.density;

    match &config.kind {
        EngineKind::Piston(piston) => {
            let power = piston_shaft_power(piston, controls, state.run_state, &env.atmosphere);
            let shaft = power(state.propeller.rpm);
            advance_propeller(
                &piston.propeller,
                &mut state.propeller,
                shaft,
                env.axial_airspeed,
                density,
                dt,
            );
            record_piston(piston, controls, state, &env.atmosphere);
        }
        EngineKind::Turbine(turbine) => {
            let targets = spool_targets(
                &turbine.spool,
                state.run_state,
                dry_throttle(turbine, controls.throttle),
            );
            advance_spool(&turbine.spool, &mut state.n1, &mut state.n2, targets, dt);
            record_turbine(turbine, controls, state, env);
        }
        EngineKind::Turboprop(turboprop) => {
            let targets = spool_targets(&turboprop.spool, state.run_state, controls.throttle);
            advance_spool(&turboprop.spool, &mut state.n1, &mut state.n2, targets, dt);
            let (power_hp, fuel_flow) =
                turboprop_power(turboprop, state.run_state, state.n2, &env.atmosphere);
            advance_propeller(
                &turboprop.propeller,
                &mut state.propeller,
                power_hp * HP_TO_FTLBS,
                env.axial_airspeed,
                density,
                dt,
            );
            record_turboprop(turboprop, state, power_hp, fuel_flow);
        }
    }
}

fn record_turboprop(turboprop: &TurbopropConfig, state: &mut EngineState, power_hp: f64, fuel_flow: f64) {
    state.power_hp = power_hp;
    state.fuel_flow = fuel_flow;
    state.rpm = state.n2 / 100.0 * turboprop.core_rpm;
    state.thrust = running_thrust(state.run_state, &state.propeller);
}

/// Put the engine at the steady state for its current run state and inputs.
///
/// Spools sit at their targets and propellers at their torque balance; no time
/// passes and no fuel is drawn.
pub fn settle_engine(
    config: &EngineConfig,
    controls: &EngineControls,
    state: &mut EngineState,
    env: &EngineEnvironment,
    fuel_available: bool,
) {
    state.starved = !fuel_available;
    if !fuel_available && state.run_state == EngineRunState::Running {
        state.run_state = EngineRunState::Off;
    }
    let density = env.atmosphere.density;

    match &config.kind {
        EngineKind::Piston(piston) => {
            let power = piston_shaft_power(piston, controls, state.run_state, &env.atmosphere);
            settle_propeller(
                &piston.propeller,
                &mut state.propeller,
                &power,
                env.axial_airspeed,
                density,
                propeller_rpm_limit(&piston.propeller, piston.max_rpm),
            );
            record_piston(piston, controls, state, &env.atmosphere);
        }
        EngineKind::Turbine(turbine) => {
            let (n1, n2) = spool_targets(
                &turbine.spool,
                state.run_state,
                dry_throttle(turbine, controls.throttle),
            );
            state.n1 = n1;
            state.n2 = n2;
            record_turbine(turbine, controls, state, env);
        }
        EngineKind::Turboprop(turboprop) => {
            let (n1, n2) = spool_targets(&turboprop.spool, state.run_state, controls.throttle);
            state.n1 = n1;
            state.n2 = n2;
            let (power_hp, fuel_flow) =
                turboprop_power(turboprop, state.run_state, state.n2, &env.atmosphere);
            let shaft = power_hp * HP_TO_FTLBS;
            let rated_rpm = turboprop.propeller.governor.map_or(2000.0, |g| g.target_rpm)
                * turboprop.propeller.gear_ratio;
            settle_propeller(
                &turboprop.propeller,
                &mut state.propeller,
                &|_| shaft,
                env.axial_airspeed,
                density,
                propeller_rpm_limit(&turboprop.propeller, rated_rpm),
            );
            record_turboprop(turboprop, state, power_hp, fuel_flow);
        }
    }
}

/// Jump straight to a settled running engine
pub fn start_engine(
    config: &EngineConfig,
    controls: &EngineControls,
    state: &mut EngineState,
    env: &EngineEnvironment,
    fuel_available: bool,
) {
    if !fuel_available {
        debug!("Engine {} cannot be set running without fuel", config.name);
    }
    state.run_state = EngineRunState::Running;
    if let Some(propeller) = config.kind.propeller() {
        if propeller.is_variable_pitch() && state.propeller.blade_angle == 0.0 {
            state.propeller.blade_angle = propeller
                .governor
                .map_or(propeller.fixed_pitch, |g| 0.5 * (g.min_pitch + g.max_pitch));
        }
    }
    settle_engine(config, controls, state, env, fuel_available);
}

/// Body-axis force and moment about the CG from one engine's outputs
pub fn engine_loads(config: &EngineConfig, state: &EngineState, cg: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let axis = config.thrust_axis();
    let force = axis * state.thrust;
    let mut moment = (config.location - cg).cross(&force);
    if let Some(propeller) = config.kind.propeller() {
        moment -= axis * (propeller.sense.sign() * state.propeller.torque);
    }
    (force, moment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AircraftConfig;
    use crate::resources::environment::AtmosphereModel;
    use approx::assert_relative_eq;

    fn sea_level(airspeed: f64) -> EngineEnvironment {
        let atmosphere = AtmosphereModel::default().state_at(0.0);
        EngineEnvironment {
            atmosphere,
            mach: airspeed / atmosphere.speed_of_sound,
            axial_airspeed: airspeed,
        }
    }

    fn light_single_engine() -> EngineConfig {
        AircraftConfig::light_single()
            .expect("preset")
            .propulsion
            .engines
            .remove(0)
    }

    fn jet_engine() -> EngineConfig {
        AircraftConfig::jet().expect("preset").propulsion.engines.remove(0)
    }

    #[test]
    fn test_piston_start_sequence() {
        let config = light_single_engine();
        let env = sea_level(0.0);
        let mut state = EngineState::default();
        let mut controls = EngineControls {
            throttle: 0.2,
            magnetos: 3,
            starter: true,
            ..Default::default()
        };

        let dt = 1.0 / 120.0;
        let mut cranked = false;
        for _ in 0..1200 {
            advance_engine(&config, &controls, &mut state, &env, true, dt);
            cranked |= state.run_state == EngineRunState::Cranking;
            if state.is_running() {
                break;
            }
        }
        assert!(cranked);
        assert!(state.is_running());

        controls.starter = false;
        for _ in 0..600 {
            advance_engine(&config, &controls, &mut state, &env, true, dt);
        }
        assert!(state.is_running());
        assert!(state.rpm > 600.0);
        assert!(state.thrust > 0.0);

        controls.magnetos = 0;
        advance_engine(&config, &controls, &mut state, &env, true, dt);
        assert_eq!(state.run_state, EngineRunState::Off);
        assert_eq!(state.thrust, 0.0);
        assert_eq!(state.fuel_flow, 0.0);
    }

    #[test]
    fn test_starter_released_before_catch() {
        let config = light_single_engine();
        let env = sea_level(0.0);
        let mut state = EngineState::default();
        let mut controls = EngineControls {
            starter: true,
            magnetos: 0,
            ..Default::default()
        };
        for _ in 0..120 {
            advance_engine(&config, &controls, &mut state, &env, true, 1.0 / 120.0);
        }
        assert_eq!(state.run_state, EngineRunState::Cranking);
        controls.starter = false;
        advance_engine(&config, &controls, &mut state, &env, true, 1.0 / 120.0);
        assert_eq!(state.run_state, EngineRunState::Off);
    }

    #[test]
    fn test_starvation_stops_engine_in_same_frame() {
        let config = light_single_engine();
        let env = sea_level(100.0);
        let controls = EngineControls {
            throttle: 1.0,
            magnetos: 3,
            ..Default::default()
        };
        let mut state = EngineState::default();
        start_engine(&config, &controls, &mut state, &env, true);
        assert!(state.thrust > 0.0);
        advance_engine(&config, &controls, &mut state, &env, false, 1.0 / 120.0);
        assert_eq!(state.run_state, EngineRunState::Off);
        assert!(state.starved);
        assert_eq!(state.thrust, 0.0);
        assert_eq!(state.fuel_flow, 0.0);
    }

    #[test]
    fn test_piston_throttle_monotonic_when_settled() {
        let config = light_single_engine();
        let env = sea_level(170.0);
        let mut last = f64::NEG_INFINITY;
        for throttle in [0.2, 0.4, 0.6, 0.8, 1.0] {
            let controls = EngineControls {
                throttle,
                magnetos: 3,
                ..Default::default()
            };
            let mut state = EngineState::default();
            start_engine(&config, &controls, &mut state, &env, true);
            assert!(state.thrust > last);
            last = state.thrust;
        }
    }

    #[test]
    fn test_settled_piston_is_steady() {
        let config = light_single_engine();
        let env = sea_level(150.0);
        let controls = EngineControls {
            throttle: 0.7,
            magnetos: 3,
            ..Default::default()
        };
        let mut state = EngineState::default();
        start_engine(&config, &controls, &mut state, &env, true);
        let settled_rpm = state.rpm;
        for _ in 0..240 {
            advance_engine(&config, &controls, &mut state, &env, true, 1.0 / 120.0);
        }
        assert_relative_eq!(state.rpm, settled_rpm, max_relative = 1e-3);
    }

    #[test]
    fn test_turbine_light_off() {
        let config = jet_engine();
        let env = sea_level(0.0);
        let mut state = EngineState::default();
        let mut controls = EngineControls {
            starter: true,
            cutoff: true,
            ..Default::default()
        };
        let dt = 1.0 / 120.0;
        for _ in 0..1200 {
            advance_engine(&config, &controls, &mut state, &env, true, dt);
        }
        // Cutoff closed keeps the engine cranking at starter speed
        assert_eq!(state.run_state, EngineRunState::Cranking);
        assert_eq!(state.thrust, 0.0);

        controls.cutoff = false;
        advance_engine(&config, &controls, &mut state, &env, true, dt);
        assert!(state.is_running());
        controls.starter = false;
        for _ in 0..3600 {
            advance_engine(&config, &controls, &mut state, &env, true, dt);
        }
        let EngineKind::Turbine(turbine) = &config.kind else {
            panic!("jet preset has a turbine");
        };
        assert_relative_eq!(state.n2, turbine.spool.idle_n2, max_relative = 1e-3);
        assert!(state.thrust > 0.0);

        controls.cutoff = true;
        advance_engine(&config, &controls, &mut state, &env, true, dt);
        assert_eq!(state.run_state, EngineRunState::Off);
        assert_eq!(state.thrust, 0.0);
    }

    #[test]
    fn test_reaction_torque_opposes_rotation() {
        let config = light_single_engine();
        let env = sea_level(150.0);
        let controls = EngineControls {
            throttle: 1.0,
            magnetos: 3,
            ..Default::default()
        };
        let mut state = EngineState::default();
        start_engine(&config, &controls, &mut state, &env, true);
        let (force, moment) = engine_loads(&config, &state, &config.location);
        assert_relative_eq!(force.norm(), state.thrust, epsilon = 1e-9);
        // Clockwise propeller viewed from behind rolls the airframe left
        assert!(moment.x < 0.0);
        assert_relative_eq!(moment.x, -state.propeller.torque, epsilon = 1e-9);
    }
}
