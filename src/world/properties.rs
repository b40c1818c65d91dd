//! Named access to the simulation.
//!
//! Names follow the `group/name-units` convention: `ic/` for initial
//! conditions, `fcs/` and `propulsion/` for control intake and the remaining
//! groups for telemetry. Indexed items use `engine[i]`, `tank[i]` and
//! `unit[i]`; per-engine commands append `[i]` to the command name.

use std::collections::BTreeMap;

use nalgebra::Vector3;
use tracing::debug;

use super::initial_conditions::resolved_speed;
use super::simulation::Simulation;
use crate::components::{ForceCategory, ForceMoment, TrimCondition};
use crate::resources::environment::GravityModel;
use crate::systems::aerodynamics::calculate_air_data;
use crate::utils::constants::FPS_TO_KTS;
use crate::utils::errors::SimError;
use crate::utils::{rad_to_deg, wrap_two_pi};

const SIMULATION_PROPERTIES: &[&str] = &[
    "simulation/sim-time-sec",
    "simulation/frame",
    "simulation/dt-sec",
    "simulation/trim-completed",
    "simulation/gravity-model",
];

const IC_PROPERTIES: &[&str] = &[
    "ic/h-sl-ft",
    "ic/h-agl-ft",
    "ic/terrain-elevation-ft",
    "ic/lat-geod-deg",
    "ic/long-gc-deg",
    "ic/phi-deg",
    "ic/theta-deg",
    "ic/psi-true-deg",
    "ic/alpha-deg",
    "ic/beta-deg",
    "ic/gamma-deg",
    "ic/p-rad_sec",
    "ic/q-rad_sec",
    "ic/r-rad_sec",
    "ic/running",
    "ic/vc-kts",
    "ic/ve-kts",
    "ic/vt-kts",
    "ic/vt-fps",
    "ic/mach",
    "ic/vg-fps",
    "ic/u-fps",
    "ic/v-fps",
    "ic/w-fps",
    "ic/vn-fps",
    "ic/ve-fps",
    "ic/vd-fps",
];

const STATE_PROPERTIES: &[&str] = &[
    "position/h-sl-ft",
    "position/h-agl-ft",
    "position/lat-geod-deg",
    "position/lat-geod-rad",
    "position/lat-gc-deg",
    "position/long-gc-deg",
    "position/long-gc-rad",
    "position/radius-to-vehicle-ft",
    "position/terrain-elevation-asl-ft",
    "position/ecef-x-ft",
    "position/ecef-y-ft",
    "position/ecef-z-ft",
    "attitude/phi-rad",
    "attitude/phi-deg",
    "attitude/theta-rad",
    "attitude/theta-deg",
    "attitude/psi-rad",
    "attitude/psi-deg",
    "velocities/u-fps",
    "velocities/v-fps",
    "velocities/w-fps",
    "velocities/v-north-fps",
    "velocities/v-east-fps",
    "velocities/v-down-fps",
    "velocities/p-rad_sec",
    "velocities/q-rad_sec",
    "velocities/r-rad_sec",
    "velocities/p-aero-rad_sec",
    "velocities/q-aero-rad_sec",
    "velocities/r-aero-rad_sec",
    "velocities/u-aero-fps",
    "velocities/v-aero-fps",
    "velocities/w-aero-fps",
    "velocities/vt-fps",
    "velocities/vc-fps",
    "velocities/vc-kts",
    "velocities/ve-fps",
    "velocities/ve-kts",
    "velocities/vtrue-kts",
    "velocities/mach",
    "velocities/h-dot-fps",
    "velocities/vg-fps",
    "flight-path/gamma-rad",
    "flight-path/gamma-deg",
    "flight-path/psi-gt-rad",
    "flight-path/psi-gt-deg",
    "aero/alpha-rad",
    "aero/alpha-deg",
    "aero/beta-rad",
    "aero/beta-deg",
    "aero/alphadot-rad_sec",
    "aero/betadot-rad_sec",
    "aero/qbar-psf",
    "aero/qc-psf",
    "aero/cl-squared",
    "forces/fbx-aero-lbs",
    "forces/fby-aero-lbs",
    "forces/fbz-aero-lbs",
    "forces/fwx-aero-lbs",
    "forces/fwy-aero-lbs",
    "forces/fwz-aero-lbs",
    "forces/fbx-prop-lbs",
    "forces/fby-prop-lbs",
    "forces/fbz-prop-lbs",
    "forces/fbx-gear-lbs",
    "forces/fby-gear-lbs",
    "forces/fbz-gear-lbs",
    "forces/fbx-total-lbs",
    "forces/fby-total-lbs",
    "forces/fbz-total-lbs",
    "moments/l-aero-lbsft",
    "moments/m-aero-lbsft",
    "moments/n-aero-lbsft",
    "moments/l-prop-lbsft",
    "moments/m-prop-lbsft",
    "moments/n-prop-lbsft",
    "moments/l-gear-lbsft",
    "moments/m-gear-lbsft",
    "moments/n-gear-lbsft",
    "moments/l-total-lbsft",
    "moments/m-total-lbsft",
    "moments/n-total-lbsft",
    "accelerations/udot-ft_sec2",
    "accelerations/vdot-ft_sec2",
    "accelerations/wdot-ft_sec2",
    "accelerations/pdot-rad_sec2",
    "accelerations/qdot-rad_sec2",
    "accelerations/rdot-rad_sec2",
    "accelerations/Nx",
    "accelerations/Ny",
    "accelerations/Nz",
    "accelerations/a-pilot-x-ft_sec2",
    "accelerations/a-pilot-y-ft_sec2",
    "accelerations/a-pilot-z-ft_sec2",
    "accelerations/n-pilot-x-norm",
    "accelerations/n-pilot-y-norm",
    "accelerations/n-pilot-z-norm",
    "accelerations/gravity-ft_sec2",
    "inertia/mass-slugs",
    "inertia/weight-lbs",
    "inertia/empty-weight-lbs",
    "inertia/cg-x-ft",
    "inertia/cg-y-ft",
    "inertia/cg-z-ft",
    "inertia/ixx-slugs_ft2",
    "inertia/iyy-slugs_ft2",
    "inertia/izz-slugs_ft2",
    "inertia/ixy-slugs_ft2",
    "inertia/ixz-slugs_ft2",
    "inertia/iyz-slugs_ft2",
    "atmosphere/T-R",
    "atmosphere/P-psf",
    "atmosphere/rho-slugs_ft3",
    "atmosphere/a-fps",
    "atmosphere/theta",
    "atmosphere/sigma",
    "atmosphere/delta",
    "atmosphere/pressure-altitude",
    "atmosphere/density-altitude",
    "atmosphere/delta-T",
    "atmosphere/P-sl-psf",
    "atmosphere/wind-north-fps",
    "atmosphere/wind-east-fps",
    "atmosphere/wind-down-fps",
    "fcs/elevator-cmd-norm",
    "fcs/aileron-cmd-norm",
    "fcs/rudder-cmd-norm",
    "fcs/pitch-trim-cmd-norm",
    "fcs/roll-trim-cmd-norm",
    "fcs/yaw-trim-cmd-norm",
    "fcs/flap-cmd-norm",
    "fcs/speedbrake-cmd-norm",
    "fcs/steer-cmd-norm",
    "fcs/left-brake-cmd-norm",
    "fcs/right-brake-cmd-norm",
    "fcs/center-brake-cmd-norm",
    "fcs/elevator-pos-rad",
    "fcs/aileron-pos-rad",
    "fcs/rudder-pos-rad",
    "fcs/elevator-pos-deg",
    "fcs/aileron-pos-deg",
    "fcs/rudder-pos-deg",
    "fcs/flap-pos-norm",
    "fcs/speedbrake-pos-norm",
    "gear/gear-cmd-norm",
    "gear/gear-pos-norm",
    "gear/wow",
    "propulsion/total-fuel-lbs",
    "propulsion/starter_cmd",
    "propulsion/magneto_cmd",
    "propulsion/cutoff_cmd",
];

const ENGINE_PROPERTIES: &[&str] = &[
    "thrust-lbs",
    "fuel-flow-rate-pps",
    "engine-rpm",
    "propeller-rpm",
    "power-hp",
    "map-inhg",
    "n1",
    "n2",
    "state",
    "set-running",
    "blade-angle",
    "advance-ratio",
    "efficiency",
    "torque-lbsft",
    "augmentation",
    "starved",
    "starter_cmd",
    "magneto_cmd",
    "cutoff_cmd",
    "augmentation_cmd",
];

const TANK_PROPERTIES: &[&str] = &["contents-lbs", "pct-full", "capacity-lbs"];

const GEAR_PROPERTIES: &[&str] = &[
    "compression-ft",
    "compression-velocity-fps",
    "WOW",
    "normal-force-lbs",
    "steering-angle-deg",
    "wheel-speed-fps",
    "rolling-friction-lbs",
    "side-friction-lbs",
];

/// `stem[i]/field` or `stem[i]` to `(i, field)`
fn indexed<'a>(name: &'a str, stem: &str) -> Option<(usize, &'a str)> {
    let rest = name.strip_prefix(stem)?.strip_prefix('[')?;
    let (index, rest) = rest.split_once(']')?;
    let index = index.parse().ok()?;
    Some((index, rest.strip_prefix('/').unwrap_or(rest)))
}

fn axis(name: &str) -> Option<usize> {
    match name {
        "x" | "l" | "p" | "u" => Some(0),
        "y" | "m" | "q" | "v" => Some(1),
        "z" | "n" | "r" | "w" => Some(2),
        _ => None,
    }
}

fn flag(on: bool) -> f64 {
    f64::from(u8::from(on))
}

impl Simulation {
    /// Every readable property name, engines, tanks, gear and aerodynamic
    /// terms included
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = SIMULATION_PROPERTIES
            .iter()
            .chain(IC_PROPERTIES)
            .chain(STATE_PROPERTIES)
            .map(|s| s.to_string())
            .collect();
        for i in 0..self.state.controls.engines.len() {
            names.push(format!("fcs/throttle-cmd-norm[{i}]"));
            names.push(format!("fcs/mixture-cmd-norm[{i}]"));
        }
        for i in 0..self.state.engines.len() {
            names.extend(ENGINE_PROPERTIES.iter().map(|f| format!("propulsion/engine[{i}]/{f}")));
        }
        for i in 0..self.state.tanks.len() {
            names.extend(TANK_PROPERTIES.iter().map(|f| format!("propulsion/tank[{i}]/{f}")));
        }
        for i in 0..self.state.gear.len() {
            names.extend(GEAR_PROPERTIES.iter().map(|f| format!("gear/unit[{i}]/{f}")));
        }
        names.extend(
            self.state
                .aero
                .coefficients
                .keys()
                .map(|term| format!("aero/coefficient/{term}")),
        );
        names
    }

    /// Current value of every readable property
    pub fn telemetry(&self) -> BTreeMap<String, f64> {
        self.property_names()
            .into_iter()
            .filter_map(|name| self.get_property(&name).ok().map(|value| (name, value)))
            .collect()
    }

    pub fn telemetry_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(&self.telemetry())?)
    }

    pub fn get_property(&self, name: &str) -> Result<f64, SimError> {
        let unknown = || SimError::UnknownProperty(name.to_string());
        let (group, key) = name.split_once('/').ok_or_else(unknown)?;
        let value = match group {
            "simulation" => self.simulation_property(key),
            "ic" => return self.ic_property(key).ok_or_else(unknown)?,
            "position" => self.position_property(key),
            "attitude" => self.attitude_property(key),
            "velocities" => self.velocity_property(key),
            "flight-path" => self.flight_path_property(key),
            "aero" => self.aero_property(key),
            "forces" => self.force_property(key),
            "moments" => self.moment_property(key),
            "accelerations" => self.acceleration_property(key),
            "inertia" => self.inertia_property(key),
            "atmosphere" => self.atmosphere_property(key),
            "fcs" => self.fcs_property(key),
            "gear" => self.gear_property(key),
            "propulsion" => self.propulsion_property(key),
            _ => None,
        };
        value.ok_or_else(unknown)
    }

    pub fn set_property(&mut self, name: &str, value: f64) -> Result<(), SimError> {
        let (group, key) = name
            .split_once('/')
            .ok_or_else(|| SimError::UnknownProperty(name.to_string()))?;
        let handled = match group {
            "simulation" => return self.set_simulation_property(name, key, value),
            "ic" => self.ic.set_property(key, value),
            "fcs" => self.set_fcs_property(key, value),
            "gear" => self.set_gear_property(key, value),
            "propulsion" => self.set_propulsion_property(key, value),
            "atmosphere" => self.set_atmosphere_property(key, value),
            "position" if key == "terrain-elevation-asl-ft" => {
                self.terrain_elevation = value;
                true
            }
            _ => false,
        };
        if handled {
            debug!("Set {} = {}", name, value);
            Ok(())
        } else if self.get_property(name).is_ok() {
            Err(SimError::ReadOnlyProperty(name.to_string()))
        } else {
            Err(SimError::UnknownProperty(name.to_string()))
        }
    }

    fn simulation_property(&self, key: &str) -> Option<f64> {
        let value = match key {
            "sim-time-sec" => self.time(),
            "frame" => self.frame() as f64,
            "dt-sec" => self.timestep(),
            "trim-completed" => flag(self.trim_completed),
            "gravity-model" => self.environment.gravity.index(),
            _ => return None,
        };
        Some(value)
    }

    fn set_simulation_property(&mut self, name: &str, key: &str, value: f64) -> Result<(), SimError> {
        match key {
            "do_simple_trim" => {
                let condition = match value.round() as i64 {
                    0 | 1 => match self.ic.gamma {
                        Some(gamma) if gamma != 0.0 => TrimCondition::Climb { gamma },
                        _ => TrimCondition::Level,
                    },
                    2 => TrimCondition::Ground,
                    5 => TrimCondition::Turn { bank: self.ic.phi },
                    mode => {
                        return Err(SimError::InvalidControl(format!("unsupported trim mode {mode}")))
                    }
                };
                self.do_trim(condition)?;
                Ok(())
            }
            "gravity-model" => {
                let model = GravityModel::from_index(value).ok_or_else(|| {
                    SimError::InvalidControl(format!("unknown gravity model {value}"))
                })?;
                self.set_gravity_model(model);
                Ok(())
            }
            "reset" => self.reset(),
            _ if self.simulation_property(key).is_some() => {
                Err(SimError::ReadOnlyProperty(name.to_string()))
            }
            _ => Err(SimError::UnknownProperty(name.to_string())),
        }
    }

    fn ic_property(&self, key: &str) -> Option<Result<f64, SimError>> {
        if let Some(value) = self.ic.get_property(key) {
            return Some(Ok(value));
        }
        let vehicle = match self.ic.vehicle_state(&self.environment) {
            Ok(vehicle) => vehicle,
            Err(e) => return Some(Err(e)),
        };
        let air = calculate_air_data(&vehicle, &self.environment, self.ic.terrain_elevation, None);
        resolved_speed(key, &vehicle, &air).map(Ok)
    }

    fn position_property(&self, key: &str) -> Option<f64> {
        let vehicle = &self.state.vehicle;
        let location = vehicle.location;
        let value = match key {
            "h-sl-ft" => location.altitude,
            "h-agl-ft" => location.altitude - self.terrain_elevation,
            "lat-geod-deg" => rad_to_deg(location.latitude),
            "lat-geod-rad" => location.latitude,
            "lat-gc-deg" => rad_to_deg(self.environment.gravity.geocentric_latitude(&location)),
            "long-gc-deg" => rad_to_deg(location.longitude),
            "long-gc-rad" => location.longitude,
            "radius-to-vehicle-ft" => vehicle.ecef.norm(),
            "terrain-elevation-asl-ft" => self.terrain_elevation,
            "ecef-x-ft" => vehicle.ecef.x,
            "ecef-y-ft" => vehicle.ecef.y,
            "ecef-z-ft" => vehicle.ecef.z,
            _ => return None,
        };
        Some(value)
    }

    fn attitude_property(&self, key: &str) -> Option<f64> {
        let (phi, theta, psi) = self.state.vehicle.euler_angles();
        let value = match key {
            "phi-rad" => phi,
            "phi-deg" => rad_to_deg(phi),
            "theta-rad" => theta,
            "theta-deg" => rad_to_deg(theta),
            "psi-rad" => wrap_two_pi(psi),
            "psi-deg" => rad_to_deg(wrap_two_pi(psi)),
            _ => return None,
        };
        Some(value)
    }

    fn velocity_property(&self, key: &str) -> Option<f64> {
        let vehicle = &self.state.vehicle;
        let air = &self.state.air_data;
        if let Some(rest) = key.strip_suffix("-aero-rad_sec") {
            return Some(vehicle.rates_relative_to_earth(self.environment.gravity)[axis(rest)?]);
        }
        if let Some(rest) = key.strip_suffix("-aero-fps") {
            return Some(air.air_velocity[axis(rest)?]);
        }
        if let Some(rest) = key.strip_suffix("-rad_sec") {
            return Some(vehicle.angular_velocity[axis(rest)?]);
        }
        let ned = vehicle.velocity_ned();
        let value = match key {
            "u-fps" => vehicle.velocity.x,
            "v-fps" => vehicle.velocity.y,
            "w-fps" => vehicle.velocity.z,
            "v-north-fps" => ned.x,
            "v-east-fps" => ned.y,
            "v-down-fps" => ned.z,
            "vt-fps" => air.true_airspeed,
            "vc-fps" => air.calibrated_airspeed,
            "vc-kts" => air.calibrated_airspeed * FPS_TO_KTS,
            "ve-fps" => air.equivalent_airspeed,
            "ve-kts" => air.equivalent_airspeed * FPS_TO_KTS,
            "vtrue-kts" => air.true_airspeed * FPS_TO_KTS,
            "mach" => air.mach,
            "h-dot-fps" => air.climb_rate,
            "vg-fps" => air.ground_speed,
            _ => return None,
        };
        Some(value)
    }

    fn flight_path_property(&self, key: &str) -> Option<f64> {
        let air = &self.state.air_data;
        let value = match key {
            "gamma-rad" => air.gamma,
            "gamma-deg" => rad_to_deg(air.gamma),
            "psi-gt-rad" => air.ground_track,
            "psi-gt-deg" => rad_to_deg(air.ground_track),
            _ => return None,
        };
        Some(value)
    }

    fn aero_property(&self, key: &str) -> Option<f64> {
        if let Some(term) = key.strip_prefix("coefficient/") {
            return self.state.aero.coefficients.get(term).copied();
        }
        let air = &self.state.air_data;
        let value = match key {
            "alpha-rad" => air.alpha,
            "alpha-deg" => rad_to_deg(air.alpha),
            "beta-rad" => air.beta,
            "beta-deg" => rad_to_deg(air.beta),
            "alphadot-rad_sec" => air.alpha_dot,
            "betadot-rad_sec" => air.beta_dot,
            "qbar-psf" => air.qbar,
            "qc-psf" => air.impact_pressure,
            "cl-squared" => self.state.aero.lift_coefficient.powi(2),
            _ => return None,
        };
        Some(value)
    }

    /// Load of one source about the current CG
    fn load_source(&self, source: &str) -> Option<ForceMoment> {
        let loads = &self.state.loads;
        let cg = self.state.mass.cg;
        let category = match source {
            "aero" => ForceCategory::Aerodynamic,
            "prop" => ForceCategory::Propulsive,
            "gear" => ForceCategory::Ground,
            "total" => return Some(ForceMoment::new(loads.net_force, loads.net_moment)),
            _ => return None,
        };
        Some(loads.category_total(category, &cg))
    }

    fn force_property(&self, key: &str) -> Option<f64> {
        let (component, source) = key.strip_suffix("-lbs")?.split_once('-')?;
        if let Some(wind_axis) = component.strip_prefix("fw") {
            return match source {
                "aero" => Some(self.state.aero.force_wind[axis(wind_axis)?]),
                _ => None,
            };
        }
        let body_axis = component.strip_prefix("fb")?;
        Some(self.load_source(source)?.force[axis(body_axis)?])
    }

    fn moment_property(&self, key: &str) -> Option<f64> {
        let (component, source) = key.strip_suffix("-lbsft")?.split_once('-')?;
        Some(self.load_source(source)?.moment[axis(component)?])
    }

    fn acceleration_property(&self, key: &str) -> Option<f64> {
        let a = &self.state.accelerations;
        if let Some(rest) = key.strip_suffix("dot-ft_sec2") {
            return Some(a.linear[axis(rest)?]);
        }
        if let Some(rest) = key.strip_suffix("dot-rad_sec2") {
            return Some(a.angular[axis(rest)?]);
        }
        if let Some(rest) = key.strip_prefix("a-pilot-") {
            return Some(a.pilot[axis(rest.strip_suffix("-ft_sec2")?)?]);
        }
        if let Some(rest) = key.strip_prefix("n-pilot-") {
            return Some(a.pilot_load_factor[axis(rest.strip_suffix("-norm")?)?]);
        }
        let value = match key {
            "Nx" => a.load_factor.x,
            "Ny" => a.load_factor.y,
            "Nz" => a.load_factor.z,
            "gravity-ft_sec2" => a.gravity,
            _ => return None,
        };
        Some(value)
    }

    fn inertia_property(&self, key: &str) -> Option<f64> {
        let mass = &self.state.mass;
        let i = &mass.inertia;
        let value = match key {
            "mass-slugs" => mass.mass,
            "weight-lbs" => mass.weight,
            "empty-weight-lbs" => mass.empty_weight,
            "cg-x-ft" => mass.cg.x,
            "cg-y-ft" => mass.cg.y,
            "cg-z-ft" => mass.cg.z,
            "ixx-slugs_ft2" => i[(0, 0)],
            "iyy-slugs_ft2" => i[(1, 1)],
            "izz-slugs_ft2" => i[(2, 2)],
            // The tensor carries products of inertia negated
            "ixy-slugs_ft2" => -i[(0, 1)],
            "ixz-slugs_ft2" => -i[(0, 2)],
            "iyz-slugs_ft2" => -i[(1, 2)],
            _ => return None,
        };
        Some(value)
    }

    fn atmosphere_property(&self, key: &str) -> Option<f64> {
        let atmosphere = &self.state.air_data.atmosphere;
        let config = self.environment.atmosphere.config();
        let value = match key {
            "T-R" => atmosphere.temperature,
            "P-psf" => atmosphere.pressure,
            "rho-slugs_ft3" => atmosphere.density,
            "a-fps" => atmosphere.speed_of_sound,
            "theta" => atmosphere.theta,
            "sigma" => atmosphere.sigma,
            "delta" => atmosphere.delta,
            "pressure-altitude" => atmosphere.pressure_altitude,
            "density-altitude" => atmosphere.density_altitude,
            "delta-T" => config.temperature_offset,
            "P-sl-psf" => config.sea_level_pressure,
            "wind-north-fps" => self.current_wind()[0],
            "wind-east-fps" => self.current_wind()[1],
            "wind-down-fps" => self.current_wind()[2],
            _ => return None,
        };
        Some(value)
    }

    fn current_wind(&self) -> Vector3<f64> {
        self.environment
            .wind_at(self.state.vehicle.altitude() - self.terrain_elevation)
    }

    fn set_atmosphere_property(&mut self, key: &str, value: f64) -> bool {
        let height_agl = self.state.vehicle.altitude() - self.terrain_elevation;
        match key {
            "delta-T" => self.environment.atmosphere.set_temperature_offset(value),
            "P-sl-psf" => self.environment.atmosphere.set_sea_level_pressure(value),
            "wind-north-fps" => self.environment.wind.set_component(0, value, height_agl),
            "wind-east-fps" => self.environment.wind.set_component(1, value, height_agl),
            "wind-down-fps" => self.environment.wind.set_component(2, value, height_agl),
            _ => return false,
        }
        true
    }

    fn fcs_property(&self, key: &str) -> Option<f64> {
        let controls = &self.state.controls;
        let surfaces = &self.state.surfaces;
        if let Some((index, _)) = indexed(key, "throttle-cmd-norm") {
            return controls.engines.get(index).map(|e| e.throttle);
        }
        if let Some((index, _)) = indexed(key, "mixture-cmd-norm") {
            return controls.engines.get(index).map(|e| e.mixture);
        }
        let value = match key {
            "throttle-cmd-norm" => controls.engines.first()?.throttle,
            "mixture-cmd-norm" => controls.engines.first()?.mixture,
            "elevator-cmd-norm" => controls.elevator,
            "aileron-cmd-norm" => controls.aileron,
            "rudder-cmd-norm" => controls.rudder,
            "pitch-trim-cmd-norm" => controls.pitch_trim,
            "roll-trim-cmd-norm" => controls.roll_trim,
            "yaw-trim-cmd-norm" => controls.yaw_trim,
            "flap-cmd-norm" => controls.flaps,
            "speedbrake-cmd-norm" => controls.speedbrake,
            "steer-cmd-norm" => controls.steering,
            "left-brake-cmd-norm" => controls.left_brake,
            "right-brake-cmd-norm" => controls.right_brake,
            "center-brake-cmd-norm" => controls.center_brake,
            "gear-cmd-norm" => controls.gear,
            "elevator-pos-rad" => surfaces.elevator,
            "aileron-pos-rad" => surfaces.aileron,
            "rudder-pos-rad" => surfaces.rudder,
            "elevator-pos-deg" => rad_to_deg(surfaces.elevator),
            "aileron-pos-deg" => rad_to_deg(surfaces.aileron),
            "rudder-pos-deg" => rad_to_deg(surfaces.rudder),
            "flap-pos-norm" => surfaces.flaps,
            "speedbrake-pos-norm" => surfaces.speedbrake,
            _ => return None,
        };
        Some(value)
    }

    fn set_fcs_property(&mut self, key: &str, value: f64) -> bool {
        let controls = &mut self.state.controls;
        if let Some((index, _)) = indexed(key, "throttle-cmd-norm") {
            controls.set_engine_throttle(index, value);
            return index < controls.engines.len();
        }
        if let Some((index, _)) = indexed(key, "mixture-cmd-norm") {
            return match controls.engines.get_mut(index) {
                Some(engine) => {
                    engine.mixture = value.clamp(0.0, 1.0);
                    true
                }
                None => false,
            };
        }
        match key {
            "throttle-cmd-norm" => controls.set_throttle(value),
            "mixture-cmd-norm" => controls.set_mixture(value),
            "elevator-cmd-norm" => controls.elevator = value.clamp(-1.0, 1.0),
            "aileron-cmd-norm" => controls.aileron = value.clamp(-1.0, 1.0),
            "rudder-cmd-norm" => controls.rudder = value.clamp(-1.0, 1.0),
            "pitch-trim-cmd-norm" => controls.pitch_trim = value.clamp(-1.0, 1.0),
            "roll-trim-cmd-norm" => controls.roll_trim = value.clamp(-1.0, 1.0),
            "yaw-trim-cmd-norm" => controls.yaw_trim = value.clamp(-1.0, 1.0),
            "flap-cmd-norm" => controls.flaps = value.clamp(0.0, 1.0),
            "speedbrake-cmd-norm" => controls.speedbrake = value.clamp(0.0, 1.0),
            "steer-cmd-norm" => controls.steering = value.clamp(-1.0, 1.0),
            "left-brake-cmd-norm" => controls.left_brake = value.clamp(0.0, 1.0),
            "right-brake-cmd-norm" => controls.right_brake = value.clamp(0.0, 1.0),
            "center-brake-cmd-norm" => controls.center_brake = value.clamp(0.0, 1.0),
            "gear-cmd-norm" => controls.gear = value.clamp(0.0, 1.0),
            _ => return false,
        }
        true
    }

    fn gear_property(&self, key: &str) -> Option<f64> {
        if let Some((index, field)) = indexed(key, "unit") {
            let gear = self.state.gear.get(index)?;
            let value = match field {
                "compression-ft" => gear.compression,
                "compression-velocity-fps" => gear.compression_rate,
                "WOW" => flag(gear.wow),
                "normal-force-lbs" => gear.normal_force,
                "steering-angle-deg" => rad_to_deg(gear.steer_angle),
                "wheel-speed-fps" => gear.wheel_speed,
                "rolling-friction-lbs" => gear.friction.0,
                "side-friction-lbs" => gear.friction.1,
                _ => return None,
            };
            return Some(value);
        }
        let value = match key {
            "gear-cmd-norm" => self.state.controls.gear,
            "gear-pos-norm" => self.state.surfaces.gear,
            "wow" => flag(self.state.weight_on_wheels()),
            _ => return None,
        };
        Some(value)
    }

    fn set_gear_property(&mut self, key: &str, value: f64) -> bool {
        match key {
            "gear-cmd-norm" => {
                if !self.aircraft().ground.has_retractable_gear() {
                    debug!("{} has fixed gear; gear command has no effect", self.aircraft().name);
                }
                self.state.controls.gear = value.clamp(0.0, 1.0);
                true
            }
            _ => false,
        }
    }

    fn propulsion_property(&self, key: &str) -> Option<f64> {
        if let Some((index, field)) = indexed(key, "engine") {
            let engine = self.state.engines.get(index)?;
            let controls = self.state.controls.engines.get(index)?;
            let propeller = &engine.propeller;
            let value = match field {
                "thrust-lbs" => engine.thrust,
                "fuel-flow-rate-pps" => engine.fuel_flow,
                "engine-rpm" => engine.rpm,
                "propeller-rpm" => propeller.rpm,
                "power-hp" => engine.power_hp,
                "map-inhg" => engine.map_inhg,
                "n1" => engine.n1,
                "n2" => engine.n2,
                "state" => engine.run_state.index(),
                "set-running" => flag(engine.is_running()),
                "blade-angle" => propeller.blade_angle,
                "advance-ratio" => propeller.advance_ratio,
                "efficiency" => propeller.efficiency,
                "torque-lbsft" => propeller.torque,
                "augmentation" => flag(engine.augmentation),
                "starved" => flag(engine.starved),
                "starter_cmd" => flag(controls.starter),
                "magneto_cmd" => f64::from(controls.magnetos),
                "cutoff_cmd" => flag(controls.cutoff),
                "augmentation_cmd" => flag(controls.augmentation),
                _ => return None,
            };
            return Some(value);
        }
        if let Some((index, field)) = indexed(key, "tank") {
            let tank = self.state.tanks.get(index)?;
            let value = match field {
                "contents-lbs" => tank.contents,
                "pct-full" => tank.pct_full(),
                "capacity-lbs" => tank.capacity,
                _ => return None,
            };
            return Some(value);
        }
        let first = self.state.controls.engines.first();
        let value = match key {
            "total-fuel-lbs" => self.state.total_fuel(),
            "starter_cmd" => flag(first?.starter),
            "magneto_cmd" => f64::from(first?.magnetos),
            "cutoff_cmd" => flag(first?.cutoff),
            _ => return None,
        };
        Some(value)
    }

    fn set_propulsion_property(&mut self, key: &str, value: f64) -> bool {
        if let Some((index, field)) = indexed(key, "engine") {
            if field == "set-running" {
                if value >= 0.5 && index < self.state.engines.len() {
                    self.set_running(Some(index));
                }
                return index < self.state.engines.len();
            }
            let Some(controls) = self.state.controls.engines.get_mut(index) else {
                return false;
            };
            match field {
                "starter_cmd" => controls.starter = value >= 0.5,
                "magneto_cmd" => controls.magnetos = value.round().clamp(0.0, 3.0) as u8,
                "cutoff_cmd" => controls.cutoff = value >= 0.5,
                "augmentation_cmd" => controls.augmentation = value >= 0.5,
                _ => return false,
            }
            return true;
        }
        if let Some((index, field)) = indexed(key, "tank") {
            let Some(tank) = self.state.tanks.get_mut(index) else {
                return false;
            };
            match field {
                "contents-lbs" => tank.set_contents(value),
                "pct-full" => tank.set_pct_full(value),
                _ => return false,
            }
            return true;
        }
        // Negative starts every engine, otherwise the engine at that index
        if key == "set-running" {
            let engine = (value >= 0.0).then(|| value.round() as usize);
            self.set_running(engine);
            return true;
        }
        let controls = &mut self.state.controls;
        match key {
            "starter_cmd" => controls.set_starter(value >= 0.5),
            "magneto_cmd" => controls.set_magnetos(value.round().clamp(0.0, 3.0) as u8),
            "cutoff_cmd" => controls.set_cutoff(value >= 0.5),
            _ => return false,
        }
        true
    }
}
