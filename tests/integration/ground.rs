use approx::assert_relative_eq;
use fdm6::world::{InitialConditions, InitialSpeed, Simulation};

use crate::common::{assert_state_valid, create_simulation, jet, light_single, parked};

/// Rolling straight down the runway at `speed` [ft/s] with the engine off,
/// starting from the settled ground attitude
fn rolling(speed: f64) -> Simulation {
    let mut sim = parked(light_single(), 0.0);
    let (_, theta, _) = sim.state().vehicle.euler_angles();
    let mut ic = InitialConditions::parked(0.0, sim.state().vehicle.altitude());
    ic.theta = theta;
    ic.speed = InitialSpeed::Ground(speed);
    sim.apply_ic(&ic).unwrap();
    sim
}

/// Heading in (-180, 180] degrees
fn heading(sim: &Simulation) -> f64 {
    sim.state().vehicle.euler_angles().2.to_degrees()
}

fn ground_speed(sim: &Simulation) -> f64 {
    sim.get_property("velocities/vg-fps").unwrap()
}

#[test]
fn test_parked_aircraft_stays_put() {
    let mut sim = parked(light_single(), 120.0);
    let height = sim.get_property("position/h-agl-ft").unwrap();
    sim.run_for(3.0).unwrap();

    assert_state_valid(sim.state());
    for i in 0..3 {
        assert_eq!(
            sim.get_property(&format!("gear/unit[{}]/WOW", i)).unwrap(),
            1.0,
            "unit {} left the ground",
            i
        );
    }
    assert_relative_eq!(sim.get_property("position/h-agl-ft").unwrap(), height, epsilon = 0.1);
    assert!(ground_speed(&sim) < 0.5);
}

#[test]
fn test_airborne_aircraft_has_no_contact() {
    let mut sim = create_simulation(light_single());
    sim.apply_ic(&InitialConditions::flying(1000.0, 150.0)).unwrap();
    assert_eq!(sim.get_property("gear/wow").unwrap(), 0.0);
    assert_eq!(sim.get_property("forces/fbz-gear-lbs").unwrap(), 0.0);
}

#[test]
fn test_brakes_slow_the_roll() {
    let mut coasting = rolling(40.0);
    let mut braking = rolling(40.0);
    braking.set_property("fcs/left-brake-cmd-norm", 1.0).unwrap();
    braking.set_property("fcs/right-brake-cmd-norm", 1.0).unwrap();

    coasting.run_for(5.0).unwrap();
    braking.run_for(5.0).unwrap();

    assert_eq!(coasting.get_property("gear/wow").unwrap(), 1.0);
    assert!(ground_speed(&coasting) > 30.0);
    assert!(ground_speed(&braking) < ground_speed(&coasting) - 5.0);
    assert_state_valid(braking.state());
}

#[test]
fn test_nose_wheel_steering_turns() {
    let mut sim = rolling(40.0);
    sim.set_property("fcs/steer-cmd-norm", 1.0).unwrap();
    sim.run_for(1.0).unwrap();
    assert!(sim.get_property("gear/unit[0]/steering-angle-deg").unwrap().abs() > 5.0);
    assert!(sim.get_property("gear/unit[1]/steering-angle-deg").unwrap() == 0.0);
    assert!(heading(&sim) > 1.0, "heading {}", heading(&sim));
}

#[test]
fn test_differential_braking_yaws() {
    let mut sim = rolling(40.0);
    sim.set_property("fcs/right-brake-cmd-norm", 1.0).unwrap();
    sim.run_for(1.0).unwrap();
    // Braking the right main pulls the nose right
    assert!(heading(&sim) > 0.5, "heading {}", heading(&sim));
}

#[test]
fn test_gear_retraction_removes_contact() {
    let mut sim = parked(jet(), 0.0);
    assert_eq!(sim.get_property("gear/wow").unwrap(), 1.0);

    sim.set_property("gear/gear-cmd-norm", 0.0).unwrap();
    sim.run().unwrap();
    assert!(sim.get_property("gear/gear-pos-norm").unwrap() < 1.0);
    assert_eq!(sim.get_property("gear/wow").unwrap(), 0.0);

    sim.run_for(2.0).unwrap();
    assert_relative_eq!(
        sim.get_property("gear/gear-pos-norm").unwrap(),
        0.5,
        epsilon = 0.01
    );
}

#[test]
fn test_fixed_gear_ignores_retraction() {
    let mut sim = parked(light_single(), 0.0);
    sim.set_property("gear/gear-cmd-norm", 0.0).unwrap();
    sim.run_for(1.0).unwrap();
    assert_eq!(sim.get_property("gear/wow").unwrap(), 1.0);
}
