use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    EARTH_GM, EARTH_J2, EARTH_ROTATION_RATE, EARTH_SEMIMAJOR, EARTH_SEMIMINOR,
};

/// Gravity and Earth-shape model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityModel {
    /// Spherical Earth, inverse-square gravitation
    Standard,
    /// Oblate WGS84 ellipsoid with J2 gravitation and centrifugal relief
    #[default]
    Wgs84,
}

/// Geodetic coordinates on the active Earth shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    /// Geodetic latitude [rad]
    pub latitude: f64,
    /// Longitude [rad]
    pub longitude: f64,
    /// Height above the reference surface [ft]
    pub altitude: f64,
}

impl GravityModel {
    pub fn from_index(index: f64) -> Option<Self> {
        match index.round() as i64 {
            0 => Some(GravityModel::Standard),
            1 => Some(GravityModel::Wgs84),
            _ => None,
        }
    }

    pub fn index(&self) -> f64 {
        match self {
            GravityModel::Standard => 0.0,
            GravityModel::Wgs84 => 1.0,
        }
    }

    pub fn semimajor(&self) -> f64 {
        EARTH_SEMIMAJOR
    }

    pub fn semiminor(&self) -> f64 {
        match self {
            GravityModel::Standard => EARTH_SEMIMAJOR,
            GravityModel::Wgs84 => EARTH_SEMIMINOR,
        }
    }

    /// First eccentricity squared of the reference surface
    pub fn eccentricity_squared(&self) -> f64 {
        let a = self.semimajor();
        let b = self.semiminor();
        1.0 - (b * b) / (a * a)
    }

    /// Prime vertical radius of curvature at a geodetic latitude
    pub fn prime_vertical_radius(&self, latitude: f64) -> f64 {
        let e2 = self.eccentricity_squared();
        self.semimajor() / (1.0 - e2 * latitude.sin().powi(2)).sqrt()
    }

    /// Meridian radius of curvature at a geodetic latitude
    pub fn meridian_radius(&self, latitude: f64) -> f64 {
        let e2 = self.eccentricity_squared();
        self.semimajor() * (1.0 - e2) / (1.0 - e2 * latitude.sin().powi(2)).powf(1.5)
    }

    /// Distance from the Earth center to the reference surface at a geodetic latitude
    pub fn reference_radius(&self, latitude: f64) -> f64 {
        self.geodetic_to_ecef(&Geodetic {
            latitude,
            longitude: 0.0,
            altitude: 0.0,
        })
        .norm()
    }

    pub fn geodetic_to_ecef(&self, position: &Geodetic) -> Vector3<f64> {
        let e2 = self.eccentricity_squared();
        let n = self.prime_vertical_radius(position.latitude);
        let (slat, clat) = position.latitude.sin_cos();
        let (slon, clon) = position.longitude.sin_cos();
        let h = position.altitude;
        Vector3::new(
            (n + h) * clat * clon,
            (n + h) * clat * slon,
            (n * (1.0 - e2) + h) * slat,
        )
    }

    pub fn ecef_to_geodetic(&self, ecef: &Vector3<f64>) -> Geodetic {
        let a = self.semimajor();
        let e2 = self.eccentricity_squared();
        let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
        let longitude = ecef.y.atan2(ecef.x);

        let mut latitude = ecef.z.atan2(p * (1.0 - e2));
        for _ in 0..10 {
            let (slat, clat) = latitude.sin_cos();
            let n = a / (1.0 - e2 * slat * slat).sqrt();
            let altitude = p * clat + ecef.z * slat - a * a / n;
            let next = ecef.z.atan2(p * (1.0 - e2 * n / (n + altitude)));
            let converged = (next - latitude).abs() < 1e-15;
            latitude = next;
            if converged {
                break;
            }
        }
        let (slat, clat) = latitude.sin_cos();
        let n = a / (1.0 - e2 * slat * slat).sqrt();
        let altitude = p * clat + ecef.z * slat - a * a / n;

        Geodetic {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Rotation taking ECEF vectors into the local NED frame
    pub fn ecef_to_ned(&self, latitude: f64, longitude: f64) -> Matrix3<f64> {
        let (slat, clat) = latitude.sin_cos();
        let (slon, clon) = longitude.sin_cos();
        Matrix3::new(
            -slat * clon, -slat * slon, clat, //
            -slon, clon, 0.0, //
            -clat * clon, -clat * slon, -slat,
        )
    }

    /// Gravitational acceleration (no rotation effects) in ECEF [ft/s^2]
    pub fn gravitation_ecef(&self, ecef: &Vector3<f64>) -> Vector3<f64> {
        let r = ecef.norm().max(1.0);
        let base = EARTH_GM / (r * r);
        match self {
            GravityModel::Standard => -base * ecef / r,
            GravityModel::Wgs84 => {
                let sin_lat = ecef.z / r;
                let pre = 1.5 * EARTH_J2 * (self.semimajor() / r).powi(2);
                let xy = 1.0 + pre * (1.0 - 5.0 * sin_lat * sin_lat);
                let z = 1.0 + pre * (3.0 - 5.0 * sin_lat * sin_lat);
                Vector3::new(
                    -base * xy * ecef.x / r,
                    -base * xy * ecef.y / r,
                    -base * z * ecef.z / r,
                )
            }
        }
    }

    /// Centrifugal acceleration of the rotating Earth frame in ECEF [ft/s^2]
    pub fn centrifugal_ecef(&self, ecef: &Vector3<f64>) -> Vector3<f64> {
        let w2 = EARTH_ROTATION_RATE * EARTH_ROTATION_RATE;
        Vector3::new(w2 * ecef.x, w2 * ecef.y, 0.0)
    }

    /// Gravity magnitude reported for a location [ft/s^2].
    ///
    /// The spherical model reports pure gravitation; the WGS84 model includes
    /// the centrifugal relief of Earth rotation.
    pub fn gravity_magnitude(&self, position: &Geodetic) -> f64 {
        let ecef = self.geodetic_to_ecef(position);
        match self {
            GravityModel::Standard => {
                let r = ecef.norm().max(1.0);
                EARTH_GM / (r * r)
            }
            GravityModel::Wgs84 => {
                (self.gravitation_ecef(&ecef) + self.centrifugal_ecef(&ecef)).norm()
            }
        }
    }

    /// Gravitation plus centrifugal acceleration resolved in local NED axes
    pub fn effective_gravity_ned(&self, position: &Geodetic) -> Vector3<f64> {
        let ecef = self.geodetic_to_ecef(position);
        let g_ecef = self.gravitation_ecef(&ecef) + self.centrifugal_ecef(&ecef);
        self.ecef_to_ned(position.latitude, position.longitude) * g_ecef
    }

    /// Earth rotation rate resolved in local NED axes [rad/s]
    pub fn earth_rate_ned(&self, latitude: f64) -> Vector3<f64> {
        Vector3::new(
            EARTH_ROTATION_RATE * latitude.cos(),
            0.0,
            -EARTH_ROTATION_RATE * latitude.sin(),
        )
    }

    /// Rotation rate of the local NED frame relative to the Earth [rad/s]
    pub fn transport_rate_ned(
        &self,
        position: &Geodetic,
        velocity_ned: &Vector3<f64>,
    ) -> Vector3<f64> {
        let rn = self.prime_vertical_radius(position.latitude) + position.altitude;
        let rm = self.meridian_radius(position.latitude) + position.altitude;
        Vector3::new(
            velocity_ned.y / rn,
            -velocity_ned.x / rm,
            -velocity_ned.y * position.latitude.tan() / rn,
        )
    }

    /// Geocentric latitude of a position [rad]
    pub fn geocentric_latitude(&self, position: &Geodetic) -> f64 {
        let ecef = self.geodetic_to_ecef(position);
        ecef.z.atan2((ecef.x * ecef.x + ecef.y * ecef.y).sqrt())
    }
}
