use std::path::Path;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::components::{AirData, VehicleState};
use crate::resources::environment::{EnvironmentModel, Geodetic};
use crate::systems::aerodynamics::{true_airspeed_from_calibrated, true_airspeed_from_equivalent};
use crate::systems::trim::pitch_for_flight_path;
use crate::utils::constants::{FPS_TO_KTS, KTS_TO_FPS};
use crate::utils::errors::{ConfigError, SimError};
use crate::utils::{body_velocity_from_air_data, deg_to_rad, rad_to_deg};

/// How the initial velocity is specified. Speeds in ft/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InitialSpeed {
    Calibrated(f64),
    Equivalent(f64),
    True(f64),
    Mach(f64),
    /// Horizontal speed over the ground along the heading
    Ground(f64),
    /// Earth-relative body-axis velocity
    Body(Vector3<f64>),
    Ned(Vector3<f64>),
}

impl Default for InitialSpeed {
    fn default() -> Self {
        InitialSpeed::True(0.0)
    }
}

impl InitialSpeed {
    /// Speeds that are resolved through alpha and beta
    pub fn is_air_relative(&self) -> bool {
        matches!(
            self,
            InitialSpeed::Calibrated(_)
                | InitialSpeed::Equivalent(_)
                | InitialSpeed::True(_)
                | InitialSpeed::Mach(_)
        )
    }
}

/// Starting point of a run. Angles in radians, distances in feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    /// Geodetic latitude
    pub latitude: f64,
    pub longitude: f64,
    /// Height above sea level
    pub altitude: f64,
    pub terrain_elevation: f64,
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
    pub speed: InitialSpeed,
    pub alpha: f64,
    pub beta: f64,
    /// Flight path angle. With an air-relative speed it replaces `theta`.
    pub gamma: Option<f64>,
    /// Body rates relative to the local level frame [rad/s]
    pub rates: Vector3<f64>,
    /// Start every engine at a settled running state
    pub engines_running: bool,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            terrain_elevation: 0.0,
            phi: 0.0,
            theta: 0.0,
            psi: 0.0,
            speed: InitialSpeed::default(),
            alpha: 0.0,
            beta: 0.0,
            gamma: None,
            rates: Vector3::zeros(),
            engines_running: false,
        }
    }
}

impl InitialConditions {
    /// Level flight at `altitude` [ft] and true airspeed `speed` [ft/s]
    pub fn flying(altitude: f64, speed: f64) -> Self {
        Self {
            altitude,
            speed: InitialSpeed::True(speed),
            engines_running: true,
            ..Default::default()
        }
    }

    /// At rest with the CG `height` [ft] above the terrain
    pub fn parked(terrain_elevation: f64, height: f64) -> Self {
        Self {
            altitude: terrain_elevation + height,
            terrain_elevation,
            ..Default::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let scalars = [
            self.latitude,
            self.longitude,
            self.altitude,
            self.terrain_elevation,
            self.phi,
            self.theta,
            self.psi,
            self.alpha,
            self.beta,
            self.gamma.unwrap_or(0.0),
        ];
        let speed_finite = match self.speed {
            InitialSpeed::Body(v) | InitialSpeed::Ned(v) => v.iter().all(|c| c.is_finite()),
            InitialSpeed::Calibrated(s)
            | InitialSpeed::Equivalent(s)
            | InitialSpeed::True(s)
            | InitialSpeed::Mach(s)
            | InitialSpeed::Ground(s) => s.is_finite(),
        };
        if !scalars.iter().all(|v| v.is_finite())
            || !speed_finite
            || !self.rates.iter().all(|v| v.is_finite())
        {
            return Err(SimError::InvalidInitialCondition(
                "initial conditions must be finite".to_string(),
            ));
        }
        if self.latitude.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(SimError::InvalidInitialCondition(format!(
                "latitude {:.2} deg outside [-90, 90]",
                rad_to_deg(self.latitude)
            )));
        }
        Ok(())
    }

    /// Pitch attitude the conditions resolve to
    pub fn pitch(&self) -> f64 {
        match self.gamma {
            Some(gamma) if self.speed.is_air_relative() => {
                pitch_for_flight_path(self.alpha, self.beta, self.phi, gamma)
            }
            _ => self.theta,
        }
    }

    /// Vehicle state described by these conditions in `environment`
    pub fn vehicle_state(&self, environment: &EnvironmentModel) -> Result<VehicleState, SimError> {
        self.validate()?;
        let model = environment.gravity;
        let location = Geodetic {
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
        };
        let attitude = UnitQuaternion::from_euler_angles(self.phi, self.pitch(), self.psi);
        let atmosphere = environment.atmosphere.state_at(self.altitude);
        let wind_body = attitude
            .inverse_transform_vector(&environment.wind_at(self.altitude - self.terrain_elevation));
        let air = |true_airspeed: f64| {
            body_velocity_from_air_data(true_airspeed, self.alpha, self.beta) + wind_body
        };

        let velocity = match self.speed {
            InitialSpeed::Calibrated(vc) => air(true_airspeed_from_calibrated(vc, &atmosphere)),
            InitialSpeed::Equivalent(ve) => air(true_airspeed_from_equivalent(ve, &atmosphere)),
            InitialSpeed::True(vt) => air(vt),
            InitialSpeed::Mach(mach) => air(mach * atmosphere.speed_of_sound),
            InitialSpeed::Ground(vg) => {
                let gamma = self.gamma.unwrap_or(0.0);
                let ned = Vector3::new(vg * self.psi.cos(), vg * self.psi.sin(), -vg * gamma.tan());
                attitude.inverse_transform_vector(&ned)
            }
            InitialSpeed::Body(velocity) => velocity,
            InitialSpeed::Ned(velocity) => attitude.inverse_transform_vector(&velocity),
        };

        let mut vehicle = VehicleState::new(model, location, velocity, attitude, Vector3::zeros());
        vehicle.angular_velocity = self.rates + vehicle.local_frame_rate_body(model);
        Ok(vehicle)
    }

    /// Read an `ic/` property that does not need the environment to resolve
    pub fn get_property(&self, name: &str) -> Option<f64> {
        let value = match name {
            "h-sl-ft" => self.altitude,
            "h-agl-ft" => self.altitude - self.terrain_elevation,
            "terrain-elevation-ft" => self.terrain_elevation,
            "lat-geod-deg" => rad_to_deg(self.latitude),
            "lat-geod-rad" => self.latitude,
            "long-gc-deg" => rad_to_deg(self.longitude),
            "long-gc-rad" => self.longitude,
            "phi-deg" => rad_to_deg(self.phi),
            "phi-rad" => self.phi,
            "theta-deg" => rad_to_deg(self.pitch()),
            "theta-rad" => self.pitch(),
            "psi-true-deg" => rad_to_deg(self.psi),
            "psi-true-rad" => self.psi,
            "alpha-deg" => rad_to_deg(self.alpha),
            "alpha-rad" => self.alpha,
            "beta-deg" => rad_to_deg(self.beta),
            "beta-rad" => self.beta,
            "gamma-deg" => rad_to_deg(self.gamma.unwrap_or(0.0)),
            "gamma-rad" => self.gamma.unwrap_or(0.0),
            "p-rad_sec" => self.rates.x,
            "q-rad_sec" => self.rates.y,
            "r-rad_sec" => self.rates.z,
            "running" => f64::from(u8::from(self.engines_running)),
            _ => return None,
        };
        Some(value)
    }

    /// Write an `ic/` property. Returns false for an unknown name.
    pub fn set_property(&mut self, name: &str, value: f64) -> bool {
        match name {
            "h-sl-ft" => self.altitude = value,
            "h-agl-ft" => self.altitude = self.terrain_elevation + value,
            "terrain-elevation-ft" => self.terrain_elevation = value,
            "lat-geod-deg" => self.latitude = deg_to_rad(value),
            "lat-geod-rad" => self.latitude = value,
            "long-gc-deg" => self.longitude = deg_to_rad(value),
            "long-gc-rad" => self.longitude = value,
            "phi-deg" => self.phi = deg_to_rad(value),
            "phi-rad" => self.phi = value,
            "theta-deg" => self.set_theta(deg_to_rad(value)),
            "theta-rad" => self.set_theta(value),
            "psi-true-deg" => self.psi = deg_to_rad(value),
            "psi-true-rad" => self.psi = value,
            "alpha-deg" => self.alpha = deg_to_rad(value),
            "alpha-rad" => self.alpha = value,
            "beta-deg" => self.beta = deg_to_rad(value),
            "beta-rad" => self.beta = value,
            "gamma-deg" => self.gamma = Some(deg_to_rad(value)),
            "gamma-rad" => self.gamma = Some(value),
            "p-rad_sec" => self.rates.x = value,
            "q-rad_sec" => self.rates.y = value,
            "r-rad_sec" => self.rates.z = value,
            "running" => self.engines_running = value >= 0.5,
            "vc-kts" => self.speed = InitialSpeed::Calibrated(value * KTS_TO_FPS),
            "vc-fps" => self.speed = InitialSpeed::Calibrated(value),
            "ve-kts" => self.speed = InitialSpeed::Equivalent(value * KTS_TO_FPS),
            "vt-kts" => self.speed = InitialSpeed::True(value * KTS_TO_FPS),
            "vt-fps" => self.speed = InitialSpeed::True(value),
            "mach" => self.speed = InitialSpeed::Mach(value),
            "vg-kts" => self.speed = InitialSpeed::Ground(value * KTS_TO_FPS),
            "vg-fps" => self.speed = InitialSpeed::Ground(value),
            "u-fps" => self.set_body_component(0, value),
            "v-fps" => self.set_body_component(1, value),
            "w-fps" => self.set_body_component(2, value),
            "vn-fps" => self.set_ned_component(0, value),
            "ve-fps" => self.set_ned_component(1, value),
            "vd-fps" => self.set_ned_component(2, value),
            _ => return false,
        }
        true
    }

    /// An explicit pitch attitude drops any flight path constraint
    fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
        self.gamma = None;
    }

    fn set_body_component(&mut self, axis: usize, value: f64) {
        let mut velocity = match self.speed {
            InitialSpeed::Body(v) => v,
            _ => Vector3::zeros(),
        };
        velocity[axis] = value;
        self.speed = InitialSpeed::Body(velocity);
    }

    fn set_ned_component(&mut self, axis: usize, value: f64) {
        let mut velocity = match self.speed {
            InitialSpeed::Ned(v) => v,
            _ => Vector3::zeros(),
        };
        velocity[axis] = value;
        self.speed = InitialSpeed::Ned(velocity);
    }
}

/// Speeds reported for `ic/` names once the conditions are resolved
pub(crate) fn resolved_speed(name: &str, vehicle: &VehicleState, air: &AirData) -> Option<f64> {
    let ned = vehicle.velocity_ned();
    let value = match name {
        "vc-kts" => air.calibrated_airspeed * FPS_TO_KTS,
        "vc-fps" => air.calibrated_airspeed,
        "ve-kts" => air.equivalent_airspeed * FPS_TO_KTS,
        "vt-kts" => air.true_airspeed * FPS_TO_KTS,
        "vt-fps" => air.true_airspeed,
        "mach" => air.mach,
        "vg-kts" => air.ground_speed * FPS_TO_KTS,
        "vg-fps" => air.ground_speed,
        "u-fps" => vehicle.velocity.x,
        "v-fps" => vehicle.velocity.y,
        "w-fps" => vehicle.velocity.z,
        "vn-fps" => ned.x,
        "ve-fps" => ned.y,
        "vd-fps" => ned.z,
        _ => return None,
    };
    Some(value)
}
