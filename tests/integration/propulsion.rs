use approx::assert_relative_eq;
use fdm6::components::TrimCondition;
use fdm6::world::{InitialConditions, Simulation};

use crate::common::{
    assert_state_valid, create_simulation, flying, jet, light_single, parked, turboprop_twin,
};

const OFF: f64 = 0.0;
const CRANKING: f64 = 1.0;
const RUNNING: f64 = 2.0;

fn engine(sim: &Simulation, index: usize, field: &str) -> f64 {
    sim.get_property(&format!("propulsion/engine[{}]/{}", index, field))
        .unwrap()
}

/// Flying with the throttle set before the engines are brought up
fn flying_at_throttle(sim: &mut Simulation, altitude: f64, speed: f64, throttle: f64) {
    sim.controls_mut().set_throttle(throttle);
    sim.apply_ic(&InitialConditions::flying(altitude, speed))
        .unwrap();
}

#[test]
fn test_piston_start_sequence() {
    let mut sim = parked(light_single(), 0.0);
    assert_eq!(engine(&sim, 0, "state"), OFF);

    for (name, value) in [
        ("fcs/throttle-cmd-norm", 0.2),
        ("fcs/left-brake-cmd-norm", 1.0),
        ("fcs/right-brake-cmd-norm", 1.0),
        ("propulsion/magneto_cmd", 3.0),
        ("propulsion/starter_cmd", 1.0),
    ] {
        sim.set_property(name, value).unwrap();
    }

    let mut cranked = false;
    for _ in 0..1200 {
        sim.run().unwrap();
        cranked |= engine(&sim, 0, "state") == CRANKING;
        if engine(&sim, 0, "state") == RUNNING {
            break;
        }
    }
    assert!(cranked, "engine never cranked");
    assert_eq!(engine(&sim, 0, "state"), RUNNING);

    sim.set_property("propulsion/starter_cmd", 0.0).unwrap();
    sim.run_for(5.0).unwrap();
    assert_eq!(engine(&sim, 0, "state"), RUNNING);
    assert!(engine(&sim, 0, "engine-rpm") > 600.0);
    assert!(engine(&sim, 0, "fuel-flow-rate-pps") > 0.0);
    assert_state_valid(sim.state());

    // Both magnetos off kills the engine on the next frame
    sim.set_property("propulsion/engine[0]/magneto_cmd", 0.0).unwrap();
    sim.run().unwrap();
    assert_eq!(engine(&sim, 0, "state"), OFF);
    assert_eq!(engine(&sim, 0, "thrust-lbs"), 0.0);
    assert_eq!(engine(&sim, 0, "fuel-flow-rate-pps"), 0.0);
}

#[test]
fn test_starter_without_ignition_never_catches() {
    let mut sim = parked(light_single(), 0.0);
    sim.set_property("propulsion/starter_cmd", 1.0).unwrap();
    sim.run_for(3.0).unwrap();
    assert_eq!(engine(&sim, 0, "state"), CRANKING);

    sim.set_property("propulsion/starter_cmd", 0.0).unwrap();
    sim.run().unwrap();
    assert_eq!(engine(&sim, 0, "state"), OFF);
}

#[test]
fn test_set_running_property() {
    let mut sim = parked(light_single(), 0.0);
    sim.set_property("propulsion/set-running", -1.0).unwrap();
    assert_eq!(engine(&sim, 0, "state"), RUNNING);
    assert_eq!(engine(&sim, 0, "set-running"), 1.0);
    sim.run_for(1.0).unwrap();
    assert_eq!(engine(&sim, 0, "state"), RUNNING);
}

#[test]
fn test_turbine_spool_lag() {
    let mut sim = parked(jet(), 0.0);
    sim.set_property("propulsion/engine[0]/set-running", 1.0).unwrap();
    sim.set_property("fcs/left-brake-cmd-norm", 1.0).unwrap();
    sim.set_property("fcs/right-brake-cmd-norm", 1.0).unwrap();
    let idle = engine(&sim, 0, "n2");
    assert_relative_eq!(idle, 60.0, epsilon = 1e-6);
    let idle_thrust = engine(&sim, 0, "thrust-lbs");

    sim.set_property("fcs/throttle-cmd-norm", 0.6).unwrap();
    sim.run().unwrap();
    let first = engine(&sim, 0, "n2");
    assert!(first > idle && first < idle + 1.0);

    sim.run_for(1.0).unwrap();
    let one_second = engine(&sim, 0, "n2");
    assert!(one_second > first);
    assert!(engine(&sim, 0, "thrust-lbs") > idle_thrust);

    sim.run_for(1.0).unwrap();
    let two_seconds = engine(&sim, 0, "n2");
    // First-order lag: each second closes less ground than the one before
    assert!(two_seconds - one_second < one_second - idle);
}

#[test]
fn test_afterburner_fuel_flow() {
    let mut sim = create_simulation(jet());
    flying_at_throttle(&mut sim, 20000.0, 700.0, 1.0);
    assert_eq!(engine(&sim, 0, "augmentation"), 1.0);
    let augmented_thrust = engine(&sim, 0, "thrust-lbs");
    let augmented_flow = engine(&sim, 0, "fuel-flow-rate-pps");

    sim.set_property("propulsion/engine[0]/augmentation_cmd", 0.0)
        .unwrap();
    sim.run().unwrap();
    assert_eq!(engine(&sim, 0, "augmentation"), 0.0);
    let dry_thrust = engine(&sim, 0, "thrust-lbs");
    let dry_flow = engine(&sim, 0, "fuel-flow-rate-pps");

    // Reheat buys thrust at a disproportionate price in fuel
    assert!(dry_thrust < augmented_thrust);
    assert!(augmented_flow / dry_flow > 2.0 * augmented_thrust / dry_thrust);
}

#[test]
fn test_fuel_cutoff_stops_turbine() {
    let mut sim = parked(jet(), 0.0);
    sim.set_property("propulsion/set-running", -1.0).unwrap();
    sim.set_property("propulsion/cutoff_cmd", 1.0).unwrap();
    sim.run().unwrap();
    assert_eq!(engine(&sim, 0, "state"), OFF);
    assert_eq!(engine(&sim, 0, "thrust-lbs"), 0.0);

    // The spools wind down rather than stop
    let n2 = engine(&sim, 0, "n2");
    assert!(n2 > 50.0);
    sim.run_for(2.0).unwrap();
    assert!(engine(&sim, 0, "n2") < n2);
}

#[test]
fn test_governor_holds_propeller_rpm() {
    let mut sim = create_simulation(turboprop_twin());
    flying_at_throttle(&mut sim, 8000.0, 280.0, 0.8);
    for i in 0..2 {
        assert_relative_eq!(engine(&sim, i, "propeller-rpm"), 1700.0, max_relative = 0.02);
    }
    sim.run_for(2.0).unwrap();
    for i in 0..2 {
        assert_relative_eq!(engine(&sim, i, "propeller-rpm"), 1700.0, max_relative = 0.03);
        assert!(engine(&sim, i, "thrust-lbs") > 0.0);
    }
}

#[test]
fn test_asymmetric_power_yaws() {
    let mut sim = create_simulation(turboprop_twin());
    flying_at_throttle(&mut sim, 8000.0, 280.0, 0.8);
    assert!(sim.get_property("moments/n-prop-lbsft").unwrap().abs() < 1.0);

    sim.set_property("fcs/throttle-cmd-norm[1]", 0.1).unwrap();
    sim.run_for(3.0).unwrap();
    assert!(engine(&sim, 0, "power-hp") > engine(&sim, 1, "power-hp"));
    assert!(sim.get_property("moments/n-prop-lbsft").unwrap().abs() > 100.0);
}

#[test]
fn test_fuel_burn_matches_flow() {
    let mut sim = create_simulation(light_single());
    flying_at_throttle(&mut sim, 4000.0, 150.0, 0.8);
    sim.do_trim(TrimCondition::Level).unwrap();
    let start = sim.get_property("propulsion/total-fuel-lbs").unwrap();
    let flow = engine(&sim, 0, "fuel-flow-rate-pps");
    assert!(flow > 0.0);

    sim.run_for(10.0).unwrap();
    let burned = start - sim.get_property("propulsion/total-fuel-lbs").unwrap();
    assert_relative_eq!(burned, 10.0 * flow, max_relative = 0.1);
    assert_relative_eq!(
        sim.get_property("propulsion/tank[0]/contents-lbs").unwrap(),
        sim.get_property("propulsion/tank[1]/contents-lbs").unwrap(),
        epsilon = 1e-9
    );
}

#[test]
fn test_fuel_exhaustion_stops_engine() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    sim.set_property("fcs/throttle-cmd-norm", 1.0).unwrap();
    sim.set_property("propulsion/tank[0]/contents-lbs", 0.01).unwrap();
    sim.set_property("propulsion/tank[1]/contents-lbs", 0.01).unwrap();

    sim.run_for(5.0).unwrap();
    assert_eq!(engine(&sim, 0, "state"), OFF);
    assert_eq!(engine(&sim, 0, "starved"), 1.0);
    assert_eq!(engine(&sim, 0, "thrust-lbs"), 0.0);
    assert!(sim.get_property("propulsion/total-fuel-lbs").unwrap() < 1e-9);
}
