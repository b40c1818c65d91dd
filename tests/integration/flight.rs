use approx::assert_relative_eq;
use fdm6::components::TrimCondition;
use fdm6::resources::{RateIntegrator, SimulationConfig};
use fdm6::world::{InitialConditions, Simulation};

use crate::common::{
    assert_quaternion_normalised, assert_state_valid, assert_telemetry_finite, assert_trimmed,
    flying, light_single,
};

fn trimmed_light_single() -> Simulation {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    let solution = sim.do_trim(TrimCondition::Level).unwrap();
    assert_trimmed(&sim, &solution);
    sim
}

#[test]
fn test_trimmed_level_flight_holds() {
    let mut sim = trimmed_light_single();
    sim.run_for(5.0).unwrap();

    assert_state_valid(sim.state());
    assert_telemetry_finite(&sim);
    assert_relative_eq!(sim.get_property("position/h-sl-ft").unwrap(), 4000.0, epsilon = 10.0);
    assert_relative_eq!(sim.get_property("velocities/vt-fps").unwrap(), 150.0, epsilon = 2.0);
    assert_relative_eq!(sim.get_property("accelerations/Nz").unwrap(), 1.0, epsilon = 0.02);
    assert!(sim.get_property("attitude/phi-deg").unwrap().abs() < 1.0);
}

#[test]
fn test_load_factor_matches_net_force() {
    let mut sim = trimmed_light_single();
    sim.run().unwrap();
    let weight = sim.get_property("inertia/weight-lbs").unwrap();
    let fz = sim.get_property("forces/fbz-total-lbs").unwrap();
    let nz = sim.get_property("accelerations/Nz").unwrap();
    assert_relative_eq!(nz, -fz / weight, max_relative = 1e-9);

    let sum: f64 = ["aero", "prop", "gear"]
        .iter()
        .map(|source| sim.get_property(&format!("forces/fbz-{}-lbs", source)).unwrap())
        .sum();
    assert_relative_eq!(sum, fz, max_relative = 1e-9);
}

#[test]
fn test_northbound_flight_advances_latitude() {
    let mut sim = trimmed_light_single();
    let start = sim.get_property("position/lat-geod-deg").unwrap();
    sim.run_for(10.0).unwrap();
    let travelled = sim.get_property("position/lat-geod-deg").unwrap() - start;
    // Roughly 1500 ft of a 364,000 ft degree
    assert!(travelled > 0.003 && travelled < 0.005, "travelled {}", travelled);
    assert!(sim.get_property("position/long-gc-deg").unwrap().abs() < 1e-4);
}

#[test]
fn test_aileron_rolls_the_aircraft() {
    let mut sim = trimmed_light_single();
    let aileron = sim.get_property("fcs/aileron-cmd-norm").unwrap();
    sim.set_property("fcs/aileron-cmd-norm", aileron + 0.5).unwrap();
    sim.run_for(1.0).unwrap();
    assert!(sim.get_property("velocities/p-rad_sec").unwrap().abs() > 0.01);
    assert!(sim.get_property("attitude/phi-deg").unwrap().abs() > 1.0);
    assert_state_valid(sim.state());
}

#[test]
fn test_power_off_descends() {
    let mut sim = trimmed_light_single();
    let trimmed_thrust = sim.get_property("propulsion/engine[0]/thrust-lbs").unwrap();
    sim.set_property("fcs/throttle-cmd-norm", 0.0).unwrap();
    sim.run_for(10.0).unwrap();
    assert!(sim.get_property("position/h-sl-ft").unwrap() < 4000.0);
    // Idle still turns the propeller, so some thrust remains
    let idle_thrust = sim.get_property("propulsion/engine[0]/thrust-lbs").unwrap();
    assert!(idle_thrust > 0.0);
    assert!(idle_thrust < 0.4 * trimmed_thrust, "idle {} trim {}", idle_thrust, trimmed_thrust);
}

#[test]
fn test_integrators_agree_over_short_run() {
    let run = |integrator| {
        let mut config = SimulationConfig::default();
        config.physics.rate_integrator = integrator;
        let mut sim = Simulation::new(light_single(), config).unwrap();
        sim.apply_ic(&InitialConditions::flying(4000.0, 150.0)).unwrap();
        sim.do_trim(TrimCondition::Level).unwrap();
        sim.run_for(2.0).unwrap();
        sim.state().vehicle.altitude()
    };
    let euler = run(RateIntegrator::Euler);
    let adams = run(RateIntegrator::AdamsBashforth2);
    assert_relative_eq!(euler, adams, epsilon = 1.0);
}

#[test]
fn test_run_for_counts_whole_frames() {
    let mut sim = trimmed_light_single();
    sim.run_for(1.0).unwrap();
    assert_eq!(sim.frame(), 120);
    assert_relative_eq!(sim.get_property("simulation/sim-time-sec").unwrap(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_attitude_stays_normalised_while_manoeuvring() {
    let mut sim = trimmed_light_single();
    let aileron = sim.get_property("fcs/aileron-cmd-norm").unwrap();
    sim.set_property("fcs/aileron-cmd-norm", aileron + 0.2).unwrap();
    sim.run_for(2.0).unwrap();
    sim.set_property("fcs/aileron-cmd-norm", aileron).unwrap();
    for _ in 0..20 {
        sim.run_for(1.0).unwrap();
        assert_quaternion_normalised(sim.state());
    }
    assert_state_valid(sim.state());
}
