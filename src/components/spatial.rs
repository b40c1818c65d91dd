use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::resources::environment::{Geodetic, GravityModel};

/// Rigid-body state of the vehicle.
///
/// `attitude` rotates body-axis vectors into the local NED frame.
/// `velocity` is the velocity relative to the Earth, resolved in body axes.
/// `angular_velocity` is the inertial body rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub location: Geodetic,
    /// Earth-centred, Earth-fixed position [ft]
    pub ecef: Vector3<f64>,
    /// Body-axis velocity relative to the Earth (u, v, w) [ft/s]
    pub velocity: Vector3<f64>,
    pub attitude: UnitQuaternion<f64>,
    /// Inertial body rates (p, q, r) [rad/s]
    pub angular_velocity: Vector3<f64>,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new(
            GravityModel::default(),
            Geodetic::default(),
            Vector3::zeros(),
            UnitQuaternion::identity(),
            Vector3::zeros(),
        )
    }
}

impl VehicleState {
    pub fn new(
        model: GravityModel,
        location: Geodetic,
        velocity: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            location,
            ecef: model.geodetic_to_ecef(&location),
            velocity,
            attitude,
            angular_velocity,
        }
    }

    /// Recompute the ECEF position from the geodetic location
    pub fn sync_ecef(&mut self, model: GravityModel) {
        self.ecef = model.geodetic_to_ecef(&self.location);
    }

    /// Recompute the geodetic location from the ECEF position
    pub fn sync_geodetic(&mut self, model: GravityModel) {
        self.location = model.ecef_to_geodetic(&self.ecef);
    }

    pub fn altitude(&self) -> f64 {
        self.location.altitude
    }

    pub fn body_to_ned(&self) -> Matrix3<f64> {
        self.attitude.to_rotation_matrix().into_inner()
    }

    pub fn ned_to_body(&self) -> Matrix3<f64> {
        self.body_to_ned().transpose()
    }

    pub fn velocity_ned(&self) -> Vector3<f64> {
        self.attitude * self.velocity
    }

    /// Euler angles (roll, pitch, yaw) [rad]
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        self.attitude.euler_angles()
    }

    pub fn earth_rate_body(&self, model: GravityModel) -> Vector3<f64> {
        self.attitude.inverse_transform_vector(&model.earth_rate_ned(self.location.latitude))
    }

    /// Body rates relative to the Earth-fixed frame
    pub fn rates_relative_to_earth(&self, model: GravityModel) -> Vector3<f64> {
        self.angular_velocity - self.earth_rate_body(model)
    }

    /// Rotation rate of the local NED frame relative to inertial space, body axes
    pub fn local_frame_rate_body(&self, model: GravityModel) -> Vector3<f64> {
        let velocity_ned = self.velocity_ned();
        let frame_rate = model.earth_rate_ned(self.location.latitude)
            + model.transport_rate_ned(&self.location, &velocity_ned);
        self.attitude.inverse_transform_vector(&frame_rate)
    }

    /// Body rates relative to the local NED frame
    pub fn rates_relative_to_local(&self, model: GravityModel) -> Vector3<f64> {
        self.angular_velocity - self.local_frame_rate_body(model)
    }

    pub fn is_finite(&self) -> bool {
        let location = [
            self.location.latitude,
            self.location.longitude,
            self.location.altitude,
        ];
        location.iter().all(|v| v.is_finite())
            && self.ecef.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.attitude.coords.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
    }
}
