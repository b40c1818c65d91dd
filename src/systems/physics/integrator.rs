use std::f64::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};

use crate::components::{Accelerations, VehicleState};
use crate::resources::config::RateIntegrator;
use crate::resources::environment::{Geodetic, GravityModel};

/// Rate derivatives carried between steps by the multi-step integrator.
///
/// Cleared whenever initial conditions are applied so the first step after
/// them falls back to Euler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegratorHistory {
    previous: Option<(Vector3<f64>, Vector3<f64>)>,
}

impl IntegratorHistory {
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }
}

/// Latitude, longitude and altitude rates for an NED velocity
fn geodetic_rates(model: GravityModel, location: &Geodetic, velocity_ned: &Vector3<f64>) -> Vector3<f64> {
    let rm = model.meridian_radius(location.latitude) + location.altitude;
    let rn = model.prime_vertical_radius(location.latitude) + location.altitude;
    let cos_lat = location.latitude.cos().abs().max(1e-9);
    Vector3::new(
        velocity_ned.x / rm,
        velocity_ned.y / (rn * cos_lat),
        -velocity_ned.z,
    )
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-PI..=PI).contains(&longitude) {
        longitude
    } else {
        (longitude + PI).rem_euclid(2.0 * PI) - PI
    }
}

/// Advance the state by one step of `dt`.
///
/// Rates first (Adams-Bashforth 2 once primed), then geodetic position by the
/// trapezoidal rule on the old and new NED velocity, then attitude by the
/// exponential map of the mean body rate relative to the local frame.
pub fn propagate(
    state: &mut VehicleState,
    accelerations: &Accelerations,
    history: &mut IntegratorHistory,
    model: GravityModel,
    scheme: RateIntegrator,
    dt: f64,
) {
    let linear = accelerations.linear;
    let angular = accelerations.angular;
    let (dv, dw) = match (scheme, history.previous) {
        (RateIntegrator::AdamsBashforth2, Some((prev_linear, prev_angular))) => (
            (1.5 * linear - 0.5 * prev_linear) * dt,
            (1.5 * angular - 0.5 * prev_angular) * dt,
        ),
        _ => (linear * dt, angular * dt),
    };
    history.previous = Some((linear, angular));

    let old_velocity_ned = state.velocity_ned();
    let old_local_rates = state.rates_relative_to_local(model);
    let old_location = state.location;

    state.velocity += dv;
    state.angular_velocity += dw;

    let new_velocity_ned = state.attitude * state.velocity;
    let rates = 0.5
        * (geodetic_rates(model, &old_location, &old_velocity_ned)
            + geodetic_rates(model, &old_location, &new_velocity_ned));
    state.location = Geodetic {
        latitude: (old_location.latitude + rates.x * dt).clamp(-PI / 2.0, PI / 2.0),
        longitude: wrap_longitude(old_location.longitude + rates.y * dt),
        altitude: old_location.altitude + rates.z * dt,
    };
    state.sync_ecef(model);

    let mean_rate = 0.5 * (old_local_rates + state.rates_relative_to_local(model));
    let mut attitude = state.attitude * UnitQuaternion::from_scaled_axis(mean_rate * dt);
    attitude.renormalize();
    state.attitude = attitude;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DT: f64 = 1.0 / 120.0;

    fn state(velocity: Vector3<f64>) -> VehicleState {
        VehicleState::new(
            GravityModel::Wgs84,
            Geodetic {
                latitude: 0.7,
                longitude: 0.2,
                altitude: 3000.0,
            },
            velocity,
            UnitQuaternion::identity(),
            Vector3::zeros(),
        )
    }

    fn linear(accel: Vector3<f64>) -> Accelerations {
        Accelerations {
            linear: accel,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_step_is_euler_then_adams_bashforth() {
        let mut state = state(Vector3::zeros());
        let mut history = IntegratorHistory::default();
        let model = GravityModel::Wgs84;
        let scheme = RateIntegrator::AdamsBashforth2;

        propagate(&mut state, &linear(Vector3::new(2.0, 0.0, 0.0)), &mut history, model, scheme, DT);
        assert_relative_eq!(state.velocity.x, 2.0 * DT, epsilon = 1e-12);
        assert!(history.is_primed());

        propagate(&mut state, &linear(Vector3::new(4.0, 0.0, 0.0)), &mut history, model, scheme, DT);
        assert_relative_eq!(state.velocity.x, 2.0 * DT + (1.5 * 4.0 - 0.5 * 2.0) * DT, epsilon = 1e-12);

        history.reset();
        let before = state.velocity.x;
        propagate(&mut state, &linear(Vector3::new(4.0, 0.0, 0.0)), &mut history, model, scheme, DT);
        assert_relative_eq!(state.velocity.x - before, 4.0 * DT, epsilon = 1e-12);
    }

    #[test]
    fn test_descent_lowers_altitude() {
        let mut state = state(Vector3::new(0.0, 0.0, 12.0));
        state.angular_velocity = state.local_frame_rate_body(GravityModel::Wgs84);
        let mut history = IntegratorHistory::default();
        for _ in 0..120 {
            propagate(
                &mut state,
                &Accelerations::default(),
                &mut history,
                GravityModel::Wgs84,
                RateIntegrator::AdamsBashforth2,
                DT,
            );
        }
        assert_relative_eq!(state.altitude(), 3000.0 - 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_northward_flight_advances_latitude() {
        let model = GravityModel::Wgs84;
        let mut state = state(Vector3::new(200.0, 0.0, 0.0));
        let mut history = IntegratorHistory::default();
        let start = state.location;
        propagate(&mut state, &Accelerations::default(), &mut history, model, RateIntegrator::Euler, DT);
        let expected = 200.0 * DT / (model.meridian_radius(start.latitude) + start.altitude);
        assert_relative_eq!(state.location.latitude - start.latitude, expected, max_relative = 1e-9);
        assert_eq!(state.location.longitude, start.longitude);
        // ECEF follows the geodetic position
        assert_relative_eq!(state.ecef, model.geodetic_to_ecef(&state.location), epsilon = 1e-6);
    }

    #[test]
    fn test_roll_rate_rolls_and_stays_normalised() {
        let model = GravityModel::Wgs84;
        let mut state = state(Vector3::zeros());
        state.angular_velocity = state.local_frame_rate_body(model) + Vector3::new(0.2, 0.0, 0.0);
        let mut history = IntegratorHistory::default();
        for _ in 0..120 {
            propagate(&mut state, &Accelerations::default(), &mut history, model, RateIntegrator::AdamsBashforth2, DT);
            assert_relative_eq!(state.attitude.as_ref().norm(), 1.0, epsilon = 1e-12);
        }
        let (roll, pitch, _) = state.euler_angles();
        assert_relative_eq!(roll, 0.2, epsilon = 1e-3);
        assert_relative_eq!(pitch, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_longitude_wraps() {
        assert_relative_eq!(wrap_longitude(PI + 0.1), -PI + 0.1, epsilon = 1e-12);
        assert_relative_eq!(wrap_longitude(-PI - 0.1), PI - 0.1, epsilon = 1e-12);
        assert_eq!(wrap_longitude(0.5), 0.5);
    }

    #[test]
    fn test_identical_inputs_are_bit_identical() {
        let accel = Accelerations {
            linear: Vector3::new(1.0, -0.3, 0.2),
            angular: Vector3::new(0.01, 0.02, -0.03),
            ..Default::default()
        };
        let run = || {
            let mut state = state(Vector3::new(150.0, 2.0, 5.0));
            let mut history = IntegratorHistory::default();
            for _ in 0..240 {
                propagate(&mut state, &accel, &mut history, GravityModel::Wgs84, RateIntegrator::AdamsBashforth2, DT);
            }
            state
        };
        assert_eq!(run(), run());
    }
}
