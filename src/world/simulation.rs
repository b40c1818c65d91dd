use tracing::{debug, error, info, warn};

use super::initial_conditions::InitialConditions;
use crate::components::{
    AircraftConfig, AircraftState, FlightControls, GearState, TrimCondition, TrimError,
    TrimSolution,
};
use crate::resources::config::SimulationConfig;
use crate::resources::environment::{EnvironmentModel, GravityModel};
use crate::systems::aerodynamics::calculate_air_data;
use crate::systems::physics::{evaluate_derivatives, propagate, IntegratorHistory, ModelContext};
use crate::systems::propulsion::{set_engine_running, PropulsionMode};
use crate::systems::trim::{TrimProblem, TrimSolver};
use crate::utils::errors::SimError;

/// One aircraft flying through one environment.
///
/// Owns the configuration, the frame-to-frame state and the integrator
/// history. Separate instances share nothing and may run on separate threads.
#[derive(Debug, Clone)]
pub struct Simulation {
    aircraft: AircraftConfig,
    config: SimulationConfig,
    pub(super) environment: EnvironmentModel,
    pub(super) state: AircraftState,
    history: IntegratorHistory,
    pub(super) ic: InitialConditions,
    time: f64,
    frame: u64,
    pub(super) terrain_elevation: f64,
    /// Set once a frame has run since the last initial conditions or trim
    primed: bool,
    pub(super) trim_completed: bool,
}

impl Simulation {
    /// Validate both configurations and settle the aircraft at default
    /// initial conditions
    pub fn new(aircraft: AircraftConfig, config: SimulationConfig) -> Result<Self, SimError> {
        if let Err(e) = aircraft.validate().and_then(|_| config.physics.validate()) {
            error!("Rejected configuration for {}: {}", aircraft.name, e);
            return Err(e.into());
        }
        let environment = EnvironmentModel::new(&config.environment);
        let state = AircraftState::new(&aircraft);
        let mut sim = Self {
            aircraft,
            config,
            environment,
            state,
            history: IntegratorHistory::default(),
            ic: InitialConditions::default(),
            time: 0.0,
            frame: 0,
            terrain_elevation: 0.0,
            primed: false,
            trim_completed: false,
        };
        sim.apply_ic(&InitialConditions::default())?;
        Ok(sim)
    }

    pub fn aircraft(&self) -> &AircraftConfig {
        &self.aircraft
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn environment(&self) -> &EnvironmentModel {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut EnvironmentModel {
        &mut self.environment
    }

    pub fn state(&self) -> &AircraftState {
        &self.state
    }

    pub fn controls(&self) -> &FlightControls {
        &self.state.controls
    }

    pub fn controls_mut(&mut self) -> &mut FlightControls {
        &mut self.state.controls
    }

    pub fn initial_conditions(&self) -> &InitialConditions {
        &self.ic
    }

    pub fn initial_conditions_mut(&mut self) -> &mut InitialConditions {
        &mut self.ic
    }

    /// Simulated time since the last initial conditions [s]
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn timestep(&self) -> f64 {
        self.config.physics.timestep
    }

    pub fn terrain_elevation(&self) -> f64 {
        self.terrain_elevation
    }

    pub fn trim_completed(&self) -> bool {
        self.trim_completed
    }

    pub(super) fn context(&self, previous_dt: Option<f64>) -> ModelContext<'_> {
        ModelContext {
            aircraft: &self.aircraft,
            environment: &self.environment,
            terrain_elevation: self.terrain_elevation,
            previous_dt,
        }
    }

    /// Reset to `ic`: time, gear, engines and integrator history start over
    /// and every model is evaluated once so telemetry is valid before the
    /// first frame.
    pub fn apply_ic(&mut self, ic: &InitialConditions) -> Result<(), SimError> {
        let vehicle = ic.vehicle_state(&self.environment)?;
        self.ic = ic.clone();
        self.terrain_elevation = ic.terrain_elevation;

        let state = &mut self.state;
        state.vehicle = vehicle;
        state.gear = vec![GearState::default(); self.aircraft.ground.units.len()];
        state.engines = vec![Default::default(); self.aircraft.engine_count()];
        state.surfaces.settle(&state.controls, &self.aircraft.limits);
        state.air_data = calculate_air_data(
            &state.vehicle,
            &self.environment,
            self.terrain_elevation,
            None,
        );

        self.history.reset();
        self.time = 0.0;
        self.frame = 0;
        self.primed = false;
        self.trim_completed = false;

        if ic.engines_running {
            self.set_running(None);
        }
        self.refresh();

        let location = self.state.vehicle.location;
        info!(
            "Initial conditions applied: lat {:.4} deg, lon {:.4} deg, h {:.1} ft, vt {:.1} ft/s",
            location.latitude.to_degrees(),
            location.longitude.to_degrees(),
            location.altitude,
            self.state.air_data.true_airspeed
        );
        Ok(())
    }

    /// Re-apply the stored initial conditions
    pub fn reset(&mut self) -> Result<(), SimError> {
        let ic = self.ic.clone();
        self.apply_ic(&ic)
    }

    /// Evaluate every model at the current state without advancing time
    fn refresh(&mut self) {
        let ctx = ModelContext {
            aircraft: &self.aircraft,
            environment: &self.environment,
            terrain_elevation: self.terrain_elevation,
            previous_dt: None,
        };
        evaluate_derivatives(&ctx, &mut self.state, PropulsionMode::Trim);
    }

    /// Jump one engine, or all of them, straight to a settled running state.
    ///
    /// The starter is released, fuel cutoff cleared and both magnetos
    /// selected if they were off, so the next frame keeps the engine running.
    pub fn set_running(&mut self, engine: Option<usize>) {
        let count = self.aircraft.engine_count();
        let indices: Vec<usize> = match engine {
            Some(index) if index < count => vec![index],
            Some(index) => {
                warn!("No engine {} to set running", index);
                return;
            }
            None => (0..count).collect(),
        };
        let state = &mut self.state;
        for index in indices {
            let Some(controls) = state.controls.engines.get_mut(index) else {
                continue;
            };
            controls.starter = false;
            controls.cutoff = false;
            if controls.magnetos == 0 {
                controls.magnetos = 3;
            }
            set_engine_running(
                &self.aircraft.propulsion,
                index,
                controls,
                &mut state.engines,
                &state.tanks,
                &state.air_data,
            );
        }
    }

    /// Switch the Earth model, keeping the geodetic position
    pub fn set_gravity_model(&mut self, model: GravityModel) {
        self.environment.gravity = model;
        self.state.vehicle.sync_ecef(model);
        debug!("Gravity model set to {:?}", model);
    }

    /// Advance the simulation by one fixed step
    pub fn run(&mut self) -> Result<(), SimError> {
        let dt = self.config.physics.timestep;
        let previous_dt = self.primed.then_some(dt);
        let state = &mut self.state;

        state.surfaces.deflect(&state.controls, &self.aircraft.limits);
        state.surfaces.actuate(
            &state.controls,
            &self.aircraft.limits,
            self.aircraft.ground.transition_time,
            dt,
        );

        let ctx = ModelContext {
            aircraft: &self.aircraft,
            environment: &self.environment,
            terrain_elevation: self.terrain_elevation,
            previous_dt,
        };
        let accelerations = evaluate_derivatives(&ctx, state, PropulsionMode::Run { dt });
        let check = self.config.physics.check_integrity;
        if check && !(accelerations.is_finite() && state.loads.net_force.iter().all(|f| f.is_finite())) {
            error!("Non-finite accelerations at t = {:.3} s", self.time);
            return Err(SimError::Integrity {
                stage: "accelerations",
                detail: format!("{:?}", accelerations),
            });
        }

        propagate(
            &mut state.vehicle,
            &accelerations,
            &mut self.history,
            self.environment.gravity,
            self.config.physics.rate_integrator,
            dt,
        );
        if check && !state.vehicle.is_finite() {
            error!("Non-finite state after propagation at t = {:.3} s", self.time);
            return Err(SimError::Integrity {
                stage: "propagate",
                detail: format!("{:?}", state.vehicle),
            });
        }

        self.time += dt;
        self.frame += 1;
        self.primed = true;
        Ok(())
    }

    /// Run whole frames covering `duration` seconds
    pub fn run_for(&mut self, duration: f64) -> Result<(), SimError> {
        let frames = (duration / self.config.physics.timestep).round().max(0.0) as u64;
        for _ in 0..frames {
            self.run()?;
        }
        Ok(())
    }

    /// Search for `condition` about the current state and adopt the result.
    ///
    /// Flight conditions hold the current altitude, heading and true
    /// airspeed. On failure the state is left untouched.
    pub fn do_trim(&mut self, condition: TrimCondition) -> Result<TrimSolution, TrimError> {
        let result = {
            let problem = TrimProblem {
                context: self.context(None),
                base: self.state.clone(),
                condition,
                airspeed: self.state.air_data.true_airspeed,
                bounds: self.config.trim.bounds,
            };
            TrimSolver::new(problem, self.config.trim).solve()
        };

        match result {
            Ok((solution, state)) => {
                self.state = state;
                self.history.reset();
                self.primed = false;
                self.trim_completed = true;
                Ok(solution)
            }
            Err(e) => {
                self.trim_completed = false;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flying() -> Simulation {
        let mut sim =
            Simulation::new(AircraftConfig::light_single().unwrap(), SimulationConfig::default())
                .unwrap();
        sim.apply_ic(&InitialConditions::flying(4000.0, 160.0)).unwrap();
        sim
    }

    #[test]
    fn test_simulation_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Simulation>();
    }

    #[test]
    fn test_run_advances_time_and_frame() {
        let mut sim = flying();
        let dt = sim.timestep();
        sim.run().unwrap();
        sim.run().unwrap();
        assert_relative_eq!(sim.time(), 2.0 * dt, epsilon = 1e-15);
        assert_eq!(sim.frame(), 2);
    }

    #[test]
    fn test_apply_ic_resets_clock() {
        let mut sim = flying();
        sim.run_for(0.5).unwrap();
        assert!(sim.time() > 0.0);
        sim.reset().unwrap();
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.frame(), 0);
        assert_relative_eq!(sim.state().vehicle.altitude(), 4000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ic_running_starts_engines() {
        let mut sim = flying();
        assert!(sim.state().engines.iter().all(|e| e.is_running()));
        assert_eq!(sim.controls().engines[0].magnetos, 3);

        sim.controls_mut().set_throttle(0.8);
        sim.reset().unwrap();
        assert!(sim.state().engines[0].thrust > 0.0);
        sim.run_for(0.5).unwrap();
        assert!(sim.state().engines[0].is_running());
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let mut config = SimulationConfig::default();
        config.physics.timestep = 1.0;
        assert!(matches!(
            Simulation::new(AircraftConfig::light_single().unwrap(), config),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_integrity_violation_is_reported() {
        let mut sim = flying();
        sim.state.vehicle.velocity.x = f64::NAN;
        assert!(matches!(sim.run(), Err(SimError::Integrity { .. })));
    }

    #[test]
    fn test_gravity_model_switch_keeps_position() {
        let mut sim = flying();
        let location = sim.state().vehicle.location;
        sim.set_gravity_model(GravityModel::Standard);
        assert_eq!(sim.state().vehicle.location, location);
        assert_relative_eq!(
            sim.state().vehicle.ecef,
            GravityModel::Standard.geodetic_to_ecef(&location),
            epsilon = 1e-6
        );
    }
}
