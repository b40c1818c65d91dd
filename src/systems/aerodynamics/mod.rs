mod air_data;
mod force_calculator;

pub use air_data::{
    calculate_air_data, calibrated_airspeed, impact_pressure, mach_from_impact_ratio,
    true_airspeed_from_calibrated, true_airspeed_from_equivalent,
};
pub use force_calculator::{calculate_aerodynamic_forces_moments, AeroInputs};
