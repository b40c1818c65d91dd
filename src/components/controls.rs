use serde::{Deserialize, Serialize};

use crate::utils::deg_to_rad;
use crate::utils::errors::ConfigError;

/// Per-engine pilot commands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineControls {
    /// [0, 1]
    pub throttle: f64,
    /// [0, 1]
    pub mixture: f64,
    pub starter: bool,
    /// 0 off, 1 left, 2 right, 3 both
    pub magnetos: u8,
    /// Fuel cutoff (turbines)
    pub cutoff: bool,
    /// Afterburner armed
    pub augmentation: bool,
}

impl Default for EngineControls {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            mixture: 1.0,
            starter: false,
            magnetos: 0,
            cutoff: false,
            augmentation: true,
        }
    }
}

/// Pilot commands, normalised
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightControls {
    /// Positive deflects the elevator trailing edge down [-1, 1]
    pub elevator: f64,
    /// Positive rolls right [-1, 1]
    pub aileron: f64,
    /// [-1, 1]
    pub rudder: f64,
    pub pitch_trim: f64,
    pub roll_trim: f64,
    pub yaw_trim: f64,
    /// [0, 1]
    pub flaps: f64,
    /// [0, 1]
    pub speedbrake: f64,
    /// Nosewheel steering [-1, 1]
    pub steering: f64,
    /// [0, 1]
    pub left_brake: f64,
    pub right_brake: f64,
    pub center_brake: f64,
    /// 1 down, 0 up
    pub gear: f64,
    pub engines: Vec<EngineControls>,
}

impl FlightControls {
    pub fn new(engine_count: usize) -> Self {
        Self {
            gear: 1.0,
            engines: vec![EngineControls::default(); engine_count],
            ..Default::default()
        }
    }

    pub fn set_throttle(&mut self, throttle: f64) {
        let throttle = throttle.clamp(0.0, 1.0);
        for engine in &mut self.engines {
            engine.throttle = throttle;
        }
    }

    pub fn set_engine_throttle(&mut self, index: usize, throttle: f64) {
        if let Some(engine) = self.engines.get_mut(index) {
            engine.throttle = throttle.clamp(0.0, 1.0);
        }
    }

    pub fn set_mixture(&mut self, mixture: f64) {
        let mixture = mixture.clamp(0.0, 1.0);
        for engine in &mut self.engines {
            engine.mixture = mixture;
        }
    }

    pub fn set_starter(&mut self, engaged: bool) {
        for engine in &mut self.engines {
            engine.starter = engaged;
        }
    }

    pub fn set_magnetos(&mut self, magnetos: u8) {
        for engine in &mut self.engines {
            engine.magnetos = magnetos.min(3);
        }
    }

    pub fn set_cutoff(&mut self, cutoff: bool) {
        for engine in &mut self.engines {
            engine.cutoff = cutoff;
        }
    }
}

/// Control surface travel and actuator rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Maximum deflections [deg]
    pub elevator_max: f64,
    pub aileron_max: f64,
    pub rudder_max: f64,
    /// Full-travel time of the flaps [s]
    pub flap_travel_time: f64,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            elevator_max: 25.0,
            aileron_max: 20.0,
            rudder_max: 20.0,
            flap_travel_time: 6.0,
        }
    }
}

impl ControlLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [self.elevator_max, self.aileron_max, self.rudder_max];
        if limits.iter().any(|l| *l <= 0.0) || self.flap_travel_time < 0.0 {
            return Err(ConfigError::invalid("control limits must be positive"));
        }
        Ok(())
    }
}

/// Actual surface positions for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacePositions {
    /// [rad]
    pub elevator: f64,
    pub aileron: f64,
    pub rudder: f64,
    /// Normalised
    pub flaps: f64,
    pub speedbrake: f64,
    /// Normalised gear extension, 1 fully down
    pub gear: f64,
}

impl SurfacePositions {
    /// Deflections of the primary surfaces for the given commands
    pub fn deflect(&mut self, controls: &FlightControls, limits: &ControlLimits) {
        let scaled = |cmd: f64, trim: f64, max_deg: f64| {
            (cmd + trim).clamp(-1.0, 1.0) * deg_to_rad(max_deg)
        };
        self.elevator = scaled(controls.elevator, controls.pitch_trim, limits.elevator_max);
        self.aileron = scaled(controls.aileron, controls.roll_trim, limits.aileron_max);
        self.rudder = scaled(controls.rudder, controls.yaw_trim, limits.rudder_max);
        self.speedbrake = controls.speedbrake.clamp(0.0, 1.0);
    }

    /// Move the flaps and gear toward their commands at finite rates
    pub fn actuate(
        &mut self,
        controls: &FlightControls,
        limits: &ControlLimits,
        gear_transition_time: f64,
        dt: f64,
    ) {
        self.flaps = slew(self.flaps, controls.flaps, limits.flap_travel_time, dt);
        self.gear = slew(self.gear, controls.gear, gear_transition_time, dt);
    }

    /// Snap every actuator to its command
    pub fn settle(&mut self, controls: &FlightControls, limits: &ControlLimits) {
        self.deflect(controls, limits);
        self.flaps = controls.flaps.clamp(0.0, 1.0);
        self.gear = controls.gear.clamp(0.0, 1.0);
    }
}

fn slew(position: f64, command: f64, travel_time: f64, dt: f64) -> f64 {
    let command = command.clamp(0.0, 1.0);
    if travel_time <= 0.0 {
        return command;
    }
    let step = dt / travel_time;
    position + (command - position).clamp(-step, step)
}
