use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Calculate the flight path angle from a NED velocity vector
pub fn flight_path_angle(velocity_ned: &Vector3<f64>) -> f64 {
    let horizontal = (velocity_ned.x.powi(2) + velocity_ned.y.powi(2)).sqrt();
    if horizontal < 1e-9 && velocity_ned.z.abs() < 1e-9 {
        return 0.0;
    }
    (-velocity_ned.z).atan2(horizontal)
}

/// Calculate the track angle from a NED velocity vector, wrapped to [0, 2π)
pub fn heading_from_velocity(velocity_ned: &Vector3<f64>) -> f64 {
    wrap_two_pi(velocity_ned.y.atan2(velocity_ned.x))
}

/// Body-axis velocity for a given airspeed, angle of attack and sideslip
pub fn body_velocity_from_air_data(true_airspeed: f64, alpha: f64, beta: f64) -> Vector3<f64> {
    Vector3::new(
        true_airspeed * alpha.cos() * beta.cos(),
        true_airspeed * beta.sin(),
        true_airspeed * alpha.sin() * beta.cos(),
    )
}

/// Rotation matrix taking wind (stability) axis vectors into body axes
pub fn wind_to_body(alpha: f64, beta: f64) -> Matrix3<f64> {
    let (sa, ca) = alpha.sin_cos();
    let (sb, cb) = beta.sin_cos();
    Matrix3::new(
        ca * cb, -ca * sb, -sa, //
        sb, cb, 0.0, //
        sa * cb, -sa * sb, ca,
    )
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

/// First-order lag factor for a time constant, safe for a zero time constant
#[inline]
pub fn lag_factor(dt: f64, time_constant: f64) -> f64 {
    if time_constant <= 0.0 {
        1.0
    } else {
        1.0 - (-dt / time_constant).exp()
    }
}

/// Wrap an angle to [0, 2π)
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    if wrapped >= 2.0 * PI {
        0.0
    } else {
        wrapped
    }
}
