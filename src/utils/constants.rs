// Standard gravity [ft/s^2]
pub const STANDARD_GRAVITY: f64 = 32.174049;
// Specific gas constant for dry air [ft·lbf/(slug·°R)]
pub const AIR_GAS_CONSTANT: f64 = 1716.56;
// Specific gas constant for dry air in pound-mass units [ft·lbf/(lbm·°R)]
pub const AIR_GAS_CONSTANT_LBM: f64 = 53.353;
pub const SPECIFIC_HEAT_RATIO: f64 = 1.4;

pub const ISA_SEA_LEVEL_TEMP: f64 = 518.67; // °R
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 2116.22; // psf
pub const ISA_LAPSE_RATE: f64 = -0.00356616; // °R/ft
pub const ISA_TROPOPAUSE: f64 = 36089.2388; // ft (geopotential)

// Earth model
pub const EARTH_GM: f64 = 14.0764417572e15; // ft^3/s^2
pub const EARTH_SEMIMAJOR: f64 = 20925646.3255; // ft
pub const EARTH_SEMIMINOR: f64 = 20855486.5951; // ft
pub const EARTH_J2: f64 = 1.08262982e-3;
pub const EARTH_ROTATION_RATE: f64 = 7.292115e-5; // rad/s
// Radius used for the geometric to geopotential conversion [ft]
pub const ATMOSPHERE_EARTH_RADIUS: f64 = 20855531.5;

// Conversions
pub const FT_TO_M: f64 = 0.3048;
pub const KTS_TO_FPS: f64 = 1.68780986;
pub const FPS_TO_KTS: f64 = 1.0 / KTS_TO_FPS;
pub const HP_TO_FTLBS: f64 = 550.0; // ft·lbf/s per hp
pub const INHG_TO_PSF: f64 = 70.7262;
pub const PSF_TO_INHG: f64 = 1.0 / INHG_TO_PSF;
pub const IN3_TO_FT3: f64 = 1.0 / 1728.0;
pub const RPM_TO_RADPS: f64 = std::f64::consts::PI / 30.0;

pub const MAX_TIMESTEP: f64 = 1.0 / 30.0; // Maximum physics timestep
pub const MIN_TIMESTEP: f64 = 1.0 / 2000.0; // Minimum physics timestep

// Below this airspeed aerodynamic angles are held at zero [ft/s]
pub const MIN_AIRSPEED_THRESHOLD: f64 = 1e-6;
