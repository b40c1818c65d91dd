mod engine;
mod fuel;
mod piston;
mod propeller;
mod turbine;

pub use engine::{advance_engine, engine_loads, settle_engine, start_engine, EngineEnvironment};
pub use fuel::{draw_fuel, feed_available};
pub use piston::{equivalence_ratio, magneto_factor, mixture_efficiency, piston_output, PistonOutput};
pub use propeller::{
    advance_propeller, calculate_propeller_loads, propeller_coefficients, settle_propeller,
};
pub use turbine::{spool_targets, turbine_output, turboprop_output, TurbineOutput};

use nalgebra::Vector3;

use crate::components::{
    AirData, EngineControls, EngineState, ForceMoment, FuelTank, PropulsionConfig,
};

/// How the propulsion model treats time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropulsionMode {
    /// Advance spools and shafts by `dt` and burn fuel
    Run { dt: f64 },
    /// Hold every engine at its steady state without burning fuel
    Trim,
}

fn engine_environment(air_data: &AirData, thrust_axis: &Vector3<f64>) -> EngineEnvironment {
    EngineEnvironment {
        atmosphere: air_data.atmosphere,
        mach: air_data.mach,
        axial_airspeed: air_data.air_velocity.dot(thrust_axis).max(0.0),
    }
}

/// Advance every engine, draw fuel and sum the propulsive loads about the CG.
///
/// # Arguments
/// * `config` - Engines and tanks of the aircraft
/// * `controls` - Per-engine commands, indexed like `config.engines`
/// * `engines` - Engine states, updated in place
/// * `tanks` - Tank contents, drawn down in [`PropulsionMode::Run`]
/// * `air_data` - Air data of the current frame
/// * `cg` - Current centre of gravity [ft]
pub fn calculate_propulsion(
    config: &PropulsionConfig,
    controls: &[EngineControls],
    engines: &mut [EngineState],
    tanks: &mut [FuelTank],
    air_data: &AirData,
    cg: &Vector3<f64>,
    mode: PropulsionMode,
) -> ForceMoment {
    let mut total = ForceMoment::default();

    for ((engine_config, state), engine_controls) in
        config.engines.iter().zip(engines.iter_mut()).zip(controls)
    {
        let env = engine_environment(air_data, &engine_config.thrust_axis());
        let fuel = feed_available(tanks, &engine_config.feed_tanks);

        match mode {
            PropulsionMode::Run { dt } => {
                advance_engine(engine_config, engine_controls, state, &env, fuel, dt);
                if state.fuel_flow > 0.0 {
                    draw_fuel(tanks, &engine_config.feed_tanks, state.fuel_flow * dt);
                }
            }
            PropulsionMode::Trim => {
                settle_engine(engine_config, engine_controls, state, &env, fuel);
            }
        }

        let (force, moment) = engine_loads(engine_config, state, cg);
        state.force = force;
        state.moment = moment;
        total += ForceMoment::new(force, moment);
    }
    total
}

/// Set an engine running at a settled spool state
pub fn set_engine_running(
    config: &PropulsionConfig,
    index: usize,
    controls: &EngineControls,
    engines: &mut [EngineState],
    tanks: &[FuelTank],
    air_data: &AirData,
) {
    let (Some(engine_config), Some(state)) = (config.engines.get(index), engines.get_mut(index))
    else {
        return;
    };
    let env = engine_environment(air_data, &engine_config.thrust_axis());
    let fuel = feed_available(tanks, &engine_config.feed_tanks);
    start_engine(engine_config, controls, state, &env, fuel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AircraftConfig, EngineRunState};
    use crate::resources::environment::AtmosphereModel;
    use crate::utils::body_velocity_from_air_data;
    use approx::assert_relative_eq;

    fn air_data(airspeed: f64) -> AirData {
        let atmosphere = AtmosphereModel::default().state_at(0.0);
        AirData {
            atmosphere,
            air_velocity: body_velocity_from_air_data(airspeed, 0.0, 0.0),
            true_airspeed: airspeed,
            mach: airspeed / atmosphere.speed_of_sound,
            ..Default::default()
        }
    }

    fn running_twin() -> (AircraftConfig, Vec<EngineControls>, Vec<EngineState>) {
        let config = AircraftConfig::turboprop_twin().expect("preset");
        let mut controls = vec![EngineControls::default(); 2];
        for c in &mut controls {
            c.throttle = 0.8;
        }
        let mut engines = vec![EngineState::default(); 2];
        let air = air_data(250.0);
        for i in 0..2 {
            set_engine_running(
                &config.propulsion,
                i,
                &controls[i],
                &mut engines,
                &config.propulsion.tanks,
                &air,
            );
        }
        (config, controls, engines)
    }

    #[test]
    fn test_symmetric_twin_has_no_yaw() {
        let (config, controls, mut engines) = running_twin();
        let mut tanks = config.propulsion.tanks.clone();
        let loads = calculate_propulsion(
            &config.propulsion,
            &controls,
            &mut engines,
            &mut tanks,
            &air_data(250.0),
            &Vector3::zeros(),
            PropulsionMode::Trim,
        );
        assert!(loads.force.x > 0.0);
        assert_relative_eq!(loads.moment.z, 0.0, epsilon = 1e-6);
        assert_eq!(tanks, config.propulsion.tanks);
    }

    #[test]
    fn test_run_mode_burns_fuel_evenly() {
        let (config, controls, mut engines) = running_twin();
        let mut tanks = config.propulsion.tanks.clone();
        let start = config.propulsion.total_fuel();
        let dt = 1.0 / 120.0;
        let mut burned = 0.0;
        for _ in 0..1200 {
            calculate_propulsion(
                &config.propulsion,
                &controls,
                &mut engines,
                &mut tanks,
                &air_data(250.0),
                &Vector3::zeros(),
                PropulsionMode::Run { dt },
            );
            burned += engines.iter().map(|e| e.fuel_flow * dt).sum::<f64>();
        }
        let remaining: f64 = tanks.iter().map(|t| t.contents).sum();
        assert_relative_eq!(start - remaining, burned, max_relative = 1e-9);
        let used: Vec<f64> = tanks
            .iter()
            .zip(&config.propulsion.tanks)
            .map(|(now, before)| before.contents - now.contents)
            .collect();
        let mean = used.iter().sum::<f64>() / used.len() as f64;
        for u in used {
            assert!((u - mean).abs() <= 0.2 * mean);
        }
    }

    #[test]
    fn test_engine_loses_thrust_when_tanks_run_dry() {
        let (config, controls, mut engines) = running_twin();
        let mut tanks = config.propulsion.tanks.clone();
        for tank in &mut tanks {
            tank.set_contents(0.01);
        }
        let dt = 1.0 / 120.0;
        let mut stopped_frame = None;
        for frame in 0..600 {
            calculate_propulsion(
                &config.propulsion,
                &controls,
                &mut engines,
                &mut tanks,
                &air_data(250.0),
                &Vector3::zeros(),
                PropulsionMode::Run { dt },
            );
            if engines[0].run_state == EngineRunState::Off {
                stopped_frame = Some(frame);
                assert_eq!(engines[0].thrust, 0.0);
                assert_eq!(engines[0].fuel_flow, 0.0);
                break;
            }
        }
        assert!(stopped_frame.is_some());
        assert!(tanks.iter().all(|t| t.contents >= 0.0));
        assert!(engines[0].starved);
    }
}
