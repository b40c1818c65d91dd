use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::errors::ConfigError;
use crate::utils::{deg_to_rad, CoefficientTable};

fn default_fuel_density() -> f64 {
    6.0
}

fn default_true() -> bool {
    true
}

/// A fuel tank, located in body axes relative to the reference point [ft]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTank {
    pub name: String,
    /// [lbs]
    pub capacity: f64,
    /// [lbs]
    pub contents: f64,
    pub location: Vector3<f64>,
    /// [lbs/gal]
    #[serde(default = "default_fuel_density")]
    pub density: f64,
    /// Whether the tank may feed engines
    #[serde(default = "default_true")]
    pub priority: bool,
}

impl FuelTank {
    pub fn new(name: &str, capacity: f64, contents: f64, location: Vector3<f64>) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            contents: contents.clamp(0.0, capacity),
            location,
            density: default_fuel_density(),
            priority: true,
        }
    }

    /// Set contents, clamped to [0, capacity]
    pub fn set_contents(&mut self, contents: f64) {
        self.contents = if contents.is_nan() {
            0.0
        } else {
            contents.clamp(0.0, self.capacity)
        };
    }

    pub fn pct_full(&self) -> f64 {
        if self.capacity > 0.0 {
            100.0 * self.contents / self.capacity
        } else {
            0.0
        }
    }

    pub fn set_pct_full(&mut self, pct: f64) {
        self.set_contents(pct / 100.0 * self.capacity);
    }

    pub fn contents_gallons(&self) -> f64 {
        self.contents / self.density
    }

    pub fn is_empty(&self) -> bool {
        self.contents <= 0.0
    }

    /// Remove up to `amount` lbs; returns what was actually removed
    pub fn draw(&mut self, amount: f64) -> f64 {
        let drawn = amount.clamp(0.0, self.contents);
        self.contents -= drawn;
        if self.contents < 1e-12 {
            self.contents = 0.0;
        }
        drawn
    }
}

/// Spin direction of a propeller viewed from behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationSense {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl RotationSense {
    /// Sign of the propeller angular velocity about body x
    pub fn sign(&self) -> f64 {
        match self {
            RotationSense::Clockwise => 1.0,
            RotationSense::CounterClockwise => -1.0,
        }
    }
}

/// Constant-speed governor holding propeller RPM with blade angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Propeller RPM the governor holds
    pub target_rpm: f64,
    /// Blade angle rate per RPM of error [deg/s/rpm]
    pub gain: f64,
    /// Blade angle limits [deg]
    pub min_pitch: f64,
    pub max_pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropellerConfig {
    /// [ft]
    pub diameter: f64,
    /// Engine RPM over propeller RPM
    #[serde(default = "unit")]
    pub gear_ratio: f64,
    /// Polar moment of inertia of propeller and drive train [slug·ft²]
    pub inertia: f64,
    #[serde(default = "default_blades")]
    pub blades: u32,
    #[serde(default)]
    pub sense: RotationSense,
    /// Thrust coefficient over advance ratio, or advance ratio and blade angle [deg]
    pub ct_table: CoefficientTable,
    /// Power coefficient over the same inputs as `ct_table`
    pub cp_table: CoefficientTable,
    /// Blade angle for fixed-pitch propellers [deg]
    #[serde(default)]
    pub fixed_pitch: f64,
    #[serde(default)]
    pub governor: Option<GovernorConfig>,
}

fn unit() -> f64 {
    1.0
}

fn default_blades() -> u32 {
    2
}

impl PropellerConfig {
    pub fn is_variable_pitch(&self) -> bool {
        self.ct_table.dimensions() == 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diameter <= 0.0 || self.inertia <= 0.0 || self.gear_ratio <= 0.0 {
            return Err(ConfigError::invalid(
                "propeller diameter, inertia and gear ratio must be positive",
            ));
        }
        if self.ct_table.dimensions() != self.cp_table.dimensions()
            || self.ct_table.dimensions() > 2
        {
            return Err(ConfigError::invalid(
                "propeller CT/CP tables must share 1 or 2 dimensions",
            ));
        }
        if let Some(governor) = &self.governor {
            if !self.is_variable_pitch() {
                return Err(ConfigError::invalid(
                    "a governor needs CT/CP tables indexed by blade angle",
                ));
            }
            if governor.min_pitch >= governor.max_pitch || governor.target_rpm <= 0.0 {
                return Err(ConfigError::invalid("invalid governor limits"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PistonConfig {
    /// Rated brake power [hp]
    pub max_hp: f64,
    /// Rated engine RPM
    pub max_rpm: f64,
    /// [in³]
    pub displacement: f64,
    #[serde(default = "default_volumetric_efficiency")]
    pub volumetric_efficiency: f64,
    /// Manifold pressure at closed throttle as a fraction of ambient
    #[serde(default = "default_idle_map_fraction")]
    pub idle_map_fraction: f64,
    /// Friction power at rated RPM as a fraction of rated power
    #[serde(default = "default_friction_fraction")]
    pub friction_fraction: f64,
    /// [hp]
    #[serde(default = "default_starter_hp")]
    pub starter_hp: f64,
    /// RPM above which a cranking engine catches
    #[serde(default = "default_catch_rpm")]
    pub catch_rpm: f64,
    pub propeller: PropellerConfig,
}

fn default_volumetric_efficiency() -> f64 {
    0.85
}

fn default_idle_map_fraction() -> f64 {
    0.3
}

fn default_friction_fraction() -> f64 {
    0.1
}

fn default_starter_hp() -> f64 {
    3.0
}

fn default_catch_rpm() -> f64 {
    400.0
}

/// Gas-generator spool settings shared by the turbine variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpoolConfig {
    /// [%]
    pub idle_n1: f64,
    pub idle_n2: f64,
    pub max_n1: f64,
    pub max_n2: f64,
    /// First-order lag time constants [s]
    pub spool_up_time: f64,
    pub spool_down_time: f64,
    /// N2 reached by the starter alone [%]
    #[serde(default = "default_starter_n2")]
    pub starter_n2: f64,
    /// N2 above which fuel lights off [%]
    #[serde(default = "default_light_off_n2")]
    pub light_off_n2: f64,
}

fn default_starter_n2() -> f64 {
    25.0
}

fn default_light_off_n2() -> f64 {
    15.0
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            idle_n1: 30.0,
            idle_n2: 60.0,
            max_n1: 100.0,
            max_n2: 100.0,
            spool_up_time: 2.5,
            spool_down_time: 1.5,
            starter_n2: default_starter_n2(),
            light_off_n2: default_light_off_n2(),
        }
    }
}

impl SpoolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_n2 >= self.max_n2 || self.idle_n1 >= self.max_n1 {
            return Err(ConfigError::invalid("spool idle must be below max"));
        }
        if self.light_off_n2 >= self.idle_n2 {
            return Err(ConfigError::invalid("light-off N2 must be below idle N2"));
        }
        if self.spool_up_time < 0.0 || self.spool_down_time < 0.0 {
            return Err(ConfigError::invalid("spool time constants must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineConfig {
    /// Sea-level static thrust at max dry power [lbf]
    pub mil_thrust: f64,
    /// Sea-level static thrust with full afterburner [lbf]
    #[serde(default)]
    pub max_thrust: f64,
    /// Idle thrust as a fraction of military thrust
    #[serde(default = "default_idle_thrust_fraction")]
    pub idle_thrust_fraction: f64,
    /// Thrust specific fuel consumption [lbm/hr/lbf]
    pub tsfc: f64,
    /// Afterburning thrust specific fuel consumption [lbm/hr/lbf]
    #[serde(default)]
    pub atsfc: f64,
    #[serde(default)]
    pub augmented: bool,
    /// Throttle above which the afterburner engages
    #[serde(default = "default_augmentation_threshold")]
    pub augmentation_threshold: f64,
    #[serde(default)]
    pub spool: SpoolConfig,
    /// Optional thrust lapse tables over Mach and altitude [ft]
    #[serde(default)]
    pub idle_lapse: Option<CoefficientTable>,
    #[serde(default)]
    pub mil_lapse: Option<CoefficientTable>,
    #[serde(default)]
    pub max_lapse: Option<CoefficientTable>,
}

fn default_idle_thrust_fraction() -> f64 {
    0.05
}

fn default_augmentation_threshold() -> f64 {
    0.95
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbopropConfig {
    /// Sea-level shaft power at max N2 [hp]
    pub max_shaft_hp: f64,
    /// Shaft power at idle as a fraction of max
    #[serde(default = "default_idle_power_fraction")]
    pub idle_power_fraction: f64,
    /// Power specific fuel consumption [lbm/hr/hp]
    pub psfc: f64,
    /// Gas-generator RPM at 100% N2, used for the shaft speed readout
    #[serde(default = "default_core_rpm")]
    pub core_rpm: f64,
    #[serde(default)]
    pub spool: SpoolConfig,
    pub propeller: PropellerConfig,
}

fn default_idle_power_fraction() -> f64 {
    0.08
}

fn default_core_rpm() -> f64 {
    37500.0
}

/// Closed set of engine variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineKind {
    Piston(PistonConfig),
    Turbine(TurbineConfig),
    Turboprop(TurbopropConfig),
}

impl EngineKind {
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Piston(_) => "piston",
            EngineKind::Turbine(_) => "turbine",
            EngineKind::Turboprop(_) => "turboprop",
        }
    }

    pub fn propeller(&self) -> Option<&PropellerConfig> {
        match self {
            EngineKind::Piston(piston) => Some(&piston.propeller),
            EngineKind::Turboprop(turboprop) => Some(&turboprop.propeller),
            EngineKind::Turbine(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    /// Thrust application point, body axes relative to the reference point [ft]
    pub location: Vector3<f64>,
    /// Thrust line mount angles [deg]
    #[serde(default)]
    pub pitch_angle: f64,
    #[serde(default)]
    pub yaw_angle: f64,
    /// Indices of the tanks feeding this engine
    pub feed_tanks: Vec<usize>,
    pub kind: EngineKind,
}

impl EngineConfig {
    /// Unit thrust direction in body axes
    pub fn thrust_axis(&self) -> Vector3<f64> {
        let pitch = deg_to_rad(self.pitch_angle);
        let yaw = deg_to_rad(self.yaw_angle);
        Vector3::new(
            pitch.cos() * yaw.cos(),
            pitch.cos() * yaw.sin(),
            -pitch.sin(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropulsionConfig {
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    #[serde(default)]
    pub tanks: Vec<FuelTank>,
}

impl PropulsionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tank in &self.tanks {
            if tank.capacity < 0.0 || !(0.0..=tank.capacity).contains(&tank.contents) {
                return Err(ConfigError::invalid(format!(
                    "tank {} contents outside [0, capacity]",
                    tank.name
                )));
            }
            if tank.density <= 0.0 {
                return Err(ConfigError::invalid(format!(
                    "tank {} fuel density must be positive",
                    tank.name
                )));
            }
        }
        for engine in &self.engines {
            if let Some(bad) = engine.feed_tanks.iter().find(|&&i| i >= self.tanks.len()) {
                return Err(ConfigError::invalid(format!(
                    "engine {} feeds from missing tank {bad}",
                    engine.name
                )));
            }
            match &engine.kind {
                EngineKind::Piston(piston) => {
                    if piston.max_hp <= 0.0 || piston.max_rpm <= 0.0 || piston.displacement <= 0.0
                    {
                        return Err(ConfigError::invalid(format!(
                            "piston engine {} needs positive power, RPM and displacement",
                            engine.name
                        )));
                    }
                    piston.propeller.validate()?;
                }
                EngineKind::Turbine(turbine) => {
                    turbine.spool.validate()?;
                    if turbine.mil_thrust <= 0.0 || turbine.tsfc < 0.0 {
                        return Err(ConfigError::invalid(format!(
                            "turbine engine {} needs positive military thrust",
                            engine.name
                        )));
                    }
                    if turbine.augmented && turbine.max_thrust <= turbine.mil_thrust {
                        return Err(ConfigError::invalid(format!(
                            "afterburning engine {} needs max thrust above military thrust",
                            engine.name
                        )));
                    }
                    for table in [&turbine.idle_lapse, &turbine.mil_lapse, &turbine.max_lapse]
                        .into_iter()
                        .flatten()
                    {
                        if table.dimensions() != 2 {
                            return Err(ConfigError::invalid(
                                "thrust lapse tables are indexed by Mach and altitude",
                            ));
                        }
                    }
                }
                EngineKind::Turboprop(turboprop) => {
                    turboprop.spool.validate()?;
                    if turboprop.max_shaft_hp <= 0.0 {
                        return Err(ConfigError::invalid(format!(
                            "turboprop engine {} needs positive shaft power",
                            engine.name
                        )));
                    }
                    turboprop.propeller.validate()?;
                }
            }
        }
        Ok(())
    }

    pub fn total_fuel(&self) -> f64 {
        self.tanks.iter().map(|t| t.contents).sum()
    }
}

/// Engine run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineRunState {
    #[default]
    Off,
    Cranking,
    Running,
}

impl EngineRunState {
    pub fn index(&self) -> f64 {
        match self {
            EngineRunState::Off => 0.0,
            EngineRunState::Cranking => 1.0,
            EngineRunState::Running => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropellerState {
    pub rpm: f64,
    /// [deg]
    pub blade_angle: f64,
    pub advance_ratio: f64,
    /// [lbf]
    pub thrust: f64,
    /// Power absorbed [ft·lbf/s]
    pub power: f64,
    /// Absorbed torque [lbf·ft]
    pub torque: f64,
    pub efficiency: f64,
    pub ct: f64,
    pub cp: f64,
}

/// Runtime state and outputs of one engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub run_state: EngineRunState,
    pub rpm: f64,
    /// [%]
    pub n1: f64,
    pub n2: f64,
    /// Manifold pressure [inHg]
    pub map_inhg: f64,
    /// Brake or shaft power [hp]
    pub power_hp: f64,
    /// [lbf]
    pub thrust: f64,
    /// [lbs/s]
    pub fuel_flow: f64,
    pub augmentation: bool,
    /// Set when every feed tank ran dry
    pub starved: bool,
    pub propeller: PropellerState,
    /// Body-axis force and moment about the CG of this engine
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

impl EngineState {
    pub fn is_running(&self) -> bool {
        self.run_state == EngineRunState::Running
    }
}
