use std::thread;

use fdm6::components::TrimCondition;
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::{flying, light_single, turboprop_twin};

const CONTROLS: [&str; 4] = [
    "fcs/elevator-cmd-norm",
    "fcs/aileron-cmd-norm",
    "fcs/rudder-cmd-norm",
    "fcs/throttle-cmd-norm",
];

/// Fly two seconds of seeded random stick inputs and return the final telemetry
fn fly_sequence(seed: u64, twin: bool) -> Vec<(String, f64)> {
    let mut sim = if twin {
        flying(turboprop_twin(), 8000.0, 280.0)
    } else {
        let mut sim = flying(light_single(), 4000.0, 150.0);
        sim.do_trim(TrimCondition::Level).unwrap();
        sim
    };

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..20 {
        for name in CONTROLS {
            let current = sim.get_property(name).unwrap();
            let nudge: f64 = rng.gen_range(-0.05..0.05);
            sim.set_property(name, current + nudge).unwrap();
        }
        sim.run_for(0.1).unwrap();
    }
    sim.telemetry().into_iter().collect()
}

#[test]
fn test_identical_inputs_are_bit_identical() {
    assert_eq!(fly_sequence(7, false), fly_sequence(7, false));
}

#[test]
fn test_instances_on_threads_do_not_interact() {
    let reference = [fly_sequence(1, false), fly_sequence(2, true)];

    let handles: Vec<_> = (0..4u64)
        .map(|i| thread::spawn(move || fly_sequence(1 + i % 2, i % 2 == 1)))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let telemetry = handle.join().unwrap();
        assert_eq!(telemetry, reference[i % 2], "thread {}", i);
    }
}

#[test]
fn test_different_inputs_diverge() {
    assert_ne!(fly_sequence(3, false), fly_sequence(4, false));
}
