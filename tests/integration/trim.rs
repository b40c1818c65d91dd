use approx::assert_relative_eq;
use fdm6::components::{TrimCondition, TrimError};
use fdm6::SimError;

use crate::common::{assert_trimmed, flying, jet, light_single, parked, turboprop_twin};

#[test]
fn test_level_trim() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    let solution = sim.do_trim(TrimCondition::Level).unwrap();
    assert_trimmed(&sim, &solution);

    assert!(solution.alpha > 0.0 && solution.alpha < 10f64.to_radians());
    assert!(solution.throttle > 0.0 && solution.throttle < 1.0);
    assert!(solution.beta.abs() < 1f64.to_radians());
    assert_relative_eq!(solution.theta, solution.alpha, epsilon = 1e-3);
    assert_relative_eq!(solution.altitude, 4000.0, epsilon = 1e-6);
    assert_eq!(sim.get_property("simulation/trim-completed").unwrap(), 1.0);
    assert_relative_eq!(sim.get_property("velocities/vt-fps").unwrap(), 150.0, epsilon = 1e-6);
}

#[test]
fn test_climb_needs_more_power() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    let level = sim.do_trim(TrimCondition::Level).unwrap();

    let gamma = 2f64.to_radians();
    let climb = sim.do_trim(TrimCondition::Climb { gamma }).unwrap();
    assert_trimmed(&sim, &climb);
    assert!(climb.throttle > level.throttle);
    assert_relative_eq!(climb.theta - climb.alpha, gamma, epsilon = 2e-3);
    assert_relative_eq!(
        sim.get_property("flight-path/gamma-rad").unwrap(),
        gamma,
        epsilon = 1e-6
    );

    sim.run_for(1.0).unwrap();
    let climb_rate = sim.get_property("velocities/h-dot-fps").unwrap();
    assert_relative_eq!(climb_rate, 150.0 * gamma.sin(), epsilon = 0.5);
}

#[test]
fn test_coordinated_turn() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    let bank = 30f64.to_radians();
    let solution = sim.do_trim(TrimCondition::Turn { bank }).unwrap();
    assert_trimmed(&sim, &solution);

    assert_relative_eq!(solution.phi, bank, epsilon = 1e-9);
    assert_relative_eq!(
        sim.get_property("accelerations/Nz").unwrap(),
        1.0 / bank.cos(),
        epsilon = 0.02
    );
    assert!(sim.get_property("velocities/r-rad_sec").unwrap() > 0.0);

    // A right turn swings the heading clockwise
    let (_, _, heading) = sim.state().vehicle.euler_angles();
    sim.run_for(2.0).unwrap();
    let (_, _, turned) = sim.state().vehicle.euler_angles();
    assert!(turned > heading + 1f64.to_radians());
}

#[test]
fn test_ground_trim_settles_on_gear() {
    let sim = parked(light_single(), 250.0);
    assert!(sim.trim_completed());
    assert_eq!(sim.get_property("gear/wow").unwrap(), 1.0);

    let weight = sim.get_property("inertia/weight-lbs").unwrap();
    let supported: f64 = (0..3)
        .map(|i| {
            sim.get_property(&format!("gear/unit[{}]/normal-force-lbs", i))
                .unwrap()
        })
        .sum();
    assert_relative_eq!(supported, weight, max_relative = 0.02);
    assert!(sim.get_property("position/h-agl-ft").unwrap() > 0.0);
    assert!(sim.get_property("attitude/theta-deg").unwrap().abs() < 10.0);
}

#[test]
fn test_ground_trim_loads_every_unit() {
    for aircraft in [light_single(), jet(), turboprop_twin()] {
        let name = aircraft.name.clone();
        let units = aircraft.ground.units.len();
        let mut sim = parked(aircraft, 0.0);
        for i in 0..units {
            let wow = sim.get_property(&format!("gear/unit[{}]/WOW", i)).unwrap();
            let load = sim
                .get_property(&format!("gear/unit[{}]/normal-force-lbs", i))
                .unwrap();
            assert_eq!(wow, 1.0, "{} unit {} off the ground", name, i);
            assert!(load > 0.0, "{} unit {} carries no load", name, i);
        }
        assert!(sim.get_property("attitude/theta-deg").unwrap().abs() < 10.0, "{}", name);

        // The attitude is a resting one, not a balance point
        sim.run_for(2.0).unwrap();
        assert!(sim.get_property("attitude/theta-deg").unwrap().abs() < 10.0, "{}", name);
        assert_eq!(sim.get_property("gear/wow").unwrap(), 1.0);
    }
}

#[test]
fn test_invalid_conditions_rejected() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    let before = sim.state().vehicle.clone();

    let steep_bank = sim.do_trim(TrimCondition::Turn {
        bank: 85f64.to_radians(),
    });
    assert!(matches!(steep_bank, Err(TrimError::InvalidCondition(_))));
    let steep_climb = sim.do_trim(TrimCondition::Climb {
        gamma: 70f64.to_radians(),
    });
    assert!(matches!(steep_climb, Err(TrimError::InvalidCondition(_))));

    assert!(!sim.trim_completed());
    assert_eq!(sim.state().vehicle, before);
}

#[test]
fn test_flight_trim_needs_airspeed() {
    let mut sim = parked(light_single(), 0.0);
    assert!(matches!(
        sim.do_trim(TrimCondition::Level),
        Err(TrimError::InvalidCondition(_))
    ));
}

#[test]
fn test_unreachable_speed_fails_cleanly() {
    let mut sim = flying(light_single(), 4000.0, 450.0);
    let before = sim.state().vehicle.clone();
    assert!(sim.do_trim(TrimCondition::Level).is_err());
    assert!(!sim.trim_completed());
    assert_eq!(sim.state().vehicle, before);
}

#[test]
fn test_simple_trim_through_properties() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    sim.set_property("simulation/do_simple_trim", 1.0).unwrap();
    assert_eq!(sim.get_property("simulation/trim-completed").unwrap(), 1.0);

    sim.set_property("ic/gamma-deg", 2.0).unwrap();
    sim.set_property("simulation/do_simple_trim", 0.0).unwrap();
    assert_relative_eq!(
        sim.get_property("flight-path/gamma-deg").unwrap(),
        2.0,
        epsilon = 1e-4
    );

    assert!(matches!(
        sim.set_property("simulation/do_simple_trim", 3.0),
        Err(SimError::InvalidControl(_))
    ));
}
