use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::resources::environment::AtmosphereState;

/// Air-relative and derived flight parameters for the current frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirData {
    pub atmosphere: AtmosphereState,
    /// Wind velocity, NED [ft/s]
    pub wind_ned: Vector3<f64>,
    /// Body-axis velocity relative to the air mass [ft/s]
    pub air_velocity: Vector3<f64>,
    /// True airspeed [ft/s]
    pub true_airspeed: f64,
    /// Calibrated airspeed [ft/s]
    pub calibrated_airspeed: f64,
    /// Equivalent airspeed [ft/s]
    pub equivalent_airspeed: f64,
    /// [rad]
    pub alpha: f64,
    pub beta: f64,
    /// [rad/s]
    pub alpha_dot: f64,
    pub beta_dot: f64,
    pub mach: f64,
    /// Dynamic pressure [psf]
    pub qbar: f64,
    /// Impact pressure [psf]
    pub impact_pressure: f64,
    /// Climb rate [ft/s]
    pub climb_rate: f64,
    /// Flight path angle [rad]
    pub gamma: f64,
    /// [ft/s]
    pub ground_speed: f64,
    /// Ground track, clockwise from north [rad]
    pub ground_track: f64,
    /// Height above terrain [ft]
    pub height_agl: f64,
}
