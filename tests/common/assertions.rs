use approx::assert_relative_eq;
use fdm6::components::{AircraftState, TrimSolution};
use fdm6::world::Simulation;

/// Assert that every integrated quantity is finite and the mass is physical
#[track_caller]
pub fn assert_state_valid(state: &AircraftState) {
    let vehicle = &state.vehicle;
    assert!(vehicle.is_finite(), "Vehicle state is not finite: {:?}", vehicle);
    assert!(
        vehicle.location.latitude.abs() <= std::f64::consts::FRAC_PI_2,
        "Latitude out of range"
    );
    assert!(state.mass.mass > 0.0, "Mass must be positive");
    assert!(state.accelerations.is_finite(), "Accelerations are not finite");
    assert_quaternion_normalised(state);
}

#[track_caller]
pub fn assert_quaternion_normalised(state: &AircraftState) {
    assert_relative_eq!(state.vehicle.attitude.quaternion().norm(), 1.0, epsilon = 1e-12);
}

/// Assert that every published property reads as a finite number
#[track_caller]
pub fn assert_telemetry_finite(sim: &Simulation) {
    for (name, value) in sim.telemetry() {
        assert!(value.is_finite(), "{} is not finite: {}", name, value);
    }
}

/// Assert that a trim converged to a small residual
#[track_caller]
pub fn assert_trimmed(sim: &Simulation, solution: &TrimSolution) {
    assert!(sim.trim_completed(), "Trim not marked complete");
    assert!(solution.cost < 1e-3, "Trim cost too high: {:.3e}", solution.cost);
    let a = &sim.state().accelerations;
    assert!(a.linear.norm() < 0.1, "Residual linear acceleration {:?}", a.linear);
    assert!(a.angular.norm() < 0.01, "Residual angular acceleration {:?}", a.angular);
}
