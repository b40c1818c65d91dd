use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    AIR_GAS_CONSTANT, ATMOSPHERE_EARTH_RADIUS, ISA_SEA_LEVEL_PRESSURE, ISA_SEA_LEVEL_TEMP,
    SPECIFIC_HEAT_RATIO, STANDARD_GRAVITY,
};

// Geopotential altitude [ft] and standard temperature [°R] at each layer base.
const STANDARD_TEMPERATURE_PROFILE: [(f64, f64); 8] = [
    (0.0, 518.67),
    (36089.2388, 389.97),
    (65616.7979, 389.97),
    (104986.8766, 411.57),
    (154199.4751, 487.17),
    (167322.8346, 487.17),
    (232939.6325, 386.37),
    (278385.8268, 336.5028),
];

// Temperature never drops below this, whatever offset is applied [°R]
const MIN_TEMPERATURE: f64 = 1.0;
const MIN_PRESSURE: f64 = 1e-30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereConfig {
    /// Uniform temperature offset from standard [°R]
    pub temperature_offset: f64,
    /// Sea-level pressure [psf]
    pub sea_level_pressure: f64,
}

impl Default for AtmosphereConfig {
    fn default() -> Self {
        Self {
            temperature_offset: 0.0,
            sea_level_pressure: ISA_SEA_LEVEL_PRESSURE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Layer {
    base_altitude: f64,
    base_temperature: f64,
    lapse_rate: f64,
    base_pressure: f64,
}

impl Layer {
    fn temperature(&self, h_gp: f64) -> f64 {
        self.base_temperature + self.lapse_rate * (h_gp - self.base_altitude)
    }

    fn pressure(&self, h_gp: f64) -> f64 {
        let dh = h_gp - self.base_altitude;
        if self.lapse_rate == 0.0 {
            self.base_pressure
                * (-STANDARD_GRAVITY * dh / (AIR_GAS_CONSTANT * self.base_temperature)).exp()
        } else {
            let exponent = STANDARD_GRAVITY / (AIR_GAS_CONSTANT * self.lapse_rate);
            let ratio = (self.base_temperature / self.temperature(h_gp).max(MIN_TEMPERATURE))
                .max(0.0);
            self.base_pressure * ratio.powf(exponent)
        }
    }

    fn base_density(&self) -> f64 {
        self.base_pressure / (AIR_GAS_CONSTANT * self.base_temperature)
    }

    /// Geopotential altitude inside this layer with the given standard pressure
    fn altitude_for_pressure(&self, pressure: f64) -> f64 {
        let ratio = pressure / self.base_pressure;
        if self.lapse_rate == 0.0 {
            self.base_altitude
                - AIR_GAS_CONSTANT * self.base_temperature * ratio.ln() / STANDARD_GRAVITY
        } else {
            let t = self.base_temperature
                * ratio.powf(-AIR_GAS_CONSTANT * self.lapse_rate / STANDARD_GRAVITY);
            self.base_altitude + (t - self.base_temperature) / self.lapse_rate
        }
    }

    /// Geopotential altitude inside this layer with the given standard density
    fn altitude_for_density(&self, density: f64) -> f64 {
        let ratio = density / self.base_density();
        if self.lapse_rate == 0.0 {
            self.base_altitude
                - AIR_GAS_CONSTANT * self.base_temperature * ratio.ln() / STANDARD_GRAVITY
        } else {
            let exponent = STANDARD_GRAVITY / (AIR_GAS_CONSTANT * self.lapse_rate) + 1.0;
            let t = self.base_temperature * ratio.powf(-1.0 / exponent);
            self.base_altitude + (t - self.base_temperature) / self.lapse_rate
        }
    }
}

/// Atmospheric properties at one altitude
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereState {
    /// Geometric altitude [ft]
    pub altitude: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub density: f64,
    pub speed_of_sound: f64,
    pub theta: f64,
    pub sigma: f64,
    pub delta: f64,
    pub pressure_altitude: f64,
    pub density_altitude: f64,
}

/// Layered 1976 standard atmosphere with a non-standard day offset
#[derive(Debug, Clone)]
pub struct AtmosphereModel {
    config: AtmosphereConfig,
    layers: Vec<Layer>,
}

impl Default for AtmosphereModel {
    fn default() -> Self {
        Self::new(AtmosphereConfig::default())
    }
}

impl AtmosphereModel {
    pub fn new(config: AtmosphereConfig) -> Self {
        let mut layers: Vec<Layer> = Vec::with_capacity(STANDARD_TEMPERATURE_PROFILE.len());
        let mut pressure = ISA_SEA_LEVEL_PRESSURE;

        for (i, &(base, temperature)) in STANDARD_TEMPERATURE_PROFILE.iter().enumerate() {
            if let Some(previous) = layers.last() {
                pressure = previous.pressure(base);
            }
            let lapse_rate = match STANDARD_TEMPERATURE_PROFILE.get(i + 1) {
                Some(&(next_base, next_temperature)) => {
                    (next_temperature - temperature) / (next_base - base)
                }
                None => 0.0,
            };
            layers.push(Layer {
                base_altitude: base,
                base_temperature: temperature,
                lapse_rate,
                base_pressure: pressure,
            });
        }

        Self { config, layers }
    }

    pub fn config(&self) -> &AtmosphereConfig {
        &self.config
    }

    pub fn set_temperature_offset(&mut self, offset: f64) {
        self.config.temperature_offset = offset;
    }

    pub fn set_sea_level_pressure(&mut self, pressure: f64) {
        self.config.sea_level_pressure = pressure.max(MIN_PRESSURE);
    }

    fn layer(&self, h_gp: f64) -> &Layer {
        let index = self
            .layers
            .iter()
            .rposition(|layer| layer.base_altitude <= h_gp)
            .unwrap_or(0);
        &self.layers[index]
    }

    fn pressure_scale(&self) -> f64 {
        self.config.sea_level_pressure / ISA_SEA_LEVEL_PRESSURE
    }

    pub fn standard_temperature(&self, altitude: f64) -> f64 {
        let h_gp = geopotential_altitude(altitude);
        self.layer(h_gp).temperature(h_gp).max(MIN_TEMPERATURE)
    }

    pub fn standard_pressure(&self, altitude: f64) -> f64 {
        let h_gp = geopotential_altitude(altitude);
        self.layer(h_gp).pressure(h_gp).max(MIN_PRESSURE)
    }

    pub fn standard_density(&self, altitude: f64) -> f64 {
        self.standard_pressure(altitude) / (AIR_GAS_CONSTANT * self.standard_temperature(altitude))
    }

    pub fn temperature(&self, altitude: f64) -> f64 {
        (self.standard_temperature(altitude) + self.config.temperature_offset).max(MIN_TEMPERATURE)
    }

    pub fn pressure(&self, altitude: f64) -> f64 {
        self.standard_pressure(altitude) * self.pressure_scale()
    }

    pub fn density(&self, altitude: f64) -> f64 {
        self.pressure(altitude) / (AIR_GAS_CONSTANT * self.temperature(altitude))
    }

    pub fn speed_of_sound(&self, altitude: f64) -> f64 {
        (SPECIFIC_HEAT_RATIO * AIR_GAS_CONSTANT * self.temperature(altitude)).sqrt()
    }

    pub fn sea_level_temperature(&self) -> f64 {
        self.temperature(0.0)
    }

    pub fn sea_level_pressure(&self) -> f64 {
        self.pressure(0.0)
    }

    pub fn sea_level_density(&self) -> f64 {
        self.density(0.0)
    }

    /// Geometric altitude at which the standard atmosphere has `pressure`
    pub fn pressure_altitude(&self, pressure: f64) -> f64 {
        let pressure = pressure.max(MIN_PRESSURE);
        let layer = self
            .layers
            .iter()
            .rposition(|layer| layer.base_pressure >= pressure)
            .map_or(&self.layers[0], |i| &self.layers[i]);
        geometric_altitude(layer.altitude_for_pressure(pressure))
    }

    /// Geometric altitude at which the standard atmosphere has `density`
    pub fn density_altitude(&self, density: f64) -> f64 {
        let density = density.max(MIN_PRESSURE);
        let layer = self
            .layers
            .iter()
            .rposition(|layer| layer.base_density() >= density)
            .map_or(&self.layers[0], |i| &self.layers[i]);
        geometric_altitude(layer.altitude_for_density(density))
    }

    /// Full set of atmospheric properties at a geometric altitude
    pub fn state_at(&self, altitude: f64) -> AtmosphereState {
        let temperature = self.temperature(altitude);
        let pressure = self.pressure(altitude);
        let density = pressure / (AIR_GAS_CONSTANT * temperature);
        let sea_level_density = ISA_SEA_LEVEL_PRESSURE / (AIR_GAS_CONSTANT * ISA_SEA_LEVEL_TEMP);

        AtmosphereState {
            altitude,
            temperature,
            pressure,
            density,
            speed_of_sound: (SPECIFIC_HEAT_RATIO * AIR_GAS_CONSTANT * temperature).sqrt(),
            theta: temperature / ISA_SEA_LEVEL_TEMP,
            sigma: density / sea_level_density,
            delta: pressure / ISA_SEA_LEVEL_PRESSURE,
            pressure_altitude: self.pressure_altitude(pressure),
            density_altitude: self.density_altitude(density),
        }
    }
}

/// Geometric to geopotential altitude [ft]
pub fn geopotential_altitude(altitude: f64) -> f64 {
    ATMOSPHERE_EARTH_RADIUS * altitude / (ATMOSPHERE_EARTH_RADIUS + altitude)
}

/// Geopotential to geometric altitude [ft]
pub fn geometric_altitude(h_gp: f64) -> f64 {
    ATMOSPHERE_EARTH_RADIUS * h_gp / (ATMOSPHERE_EARTH_RADIUS - h_gp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sea_level_standard_values() {
        let atmosphere = AtmosphereModel::default();
        let state = atmosphere.state_at(0.0);

        assert_relative_eq!(state.temperature, 518.67, epsilon = 1e-9);
        assert_relative_eq!(state.pressure, 2116.22, epsilon = 1e-9);
        assert_relative_eq!(state.density, 0.002377, epsilon = 1e-6);
        assert_relative_eq!(state.speed_of_sound, 1116.45, epsilon = 0.01);
        assert_relative_eq!(state.theta, 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.sigma, 1.0, epsilon = 1e-12);
        assert_relative_eq!(state.delta, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_monotonic_with_altitude() {
        let atmosphere = AtmosphereModel::default();
        let mut previous = atmosphere.state_at(0.0);
        let mut h = 500.0;
        while h < 200_000.0 {
            let state = atmosphere.state_at(h);
            assert!(state.pressure < previous.pressure, "pressure at {h}");
            assert!(state.density < previous.density, "density at {h}");
            assert!(state.delta < previous.delta && state.sigma < previous.sigma);
            if h <= 36_000.0 {
                assert!(state.temperature < previous.temperature, "temperature at {h}");
            }
            previous = state;
            h += 500.0;
        }
    }

    #[test]
    fn test_tropopause_and_isothermal_layer() {
        let atmosphere = AtmosphereModel::default();
        let tropopause = geometric_altitude(36089.2388);
        assert_relative_eq!(atmosphere.temperature(tropopause), 389.97, epsilon = 1e-6);
        assert_relative_eq!(atmosphere.temperature(50_000.0), 389.97, epsilon = 1e-6);
        assert_relative_eq!(atmosphere.temperature(60_000.0), 389.97, epsilon = 1e-6);
        assert!(atmosphere.temperature(80_000.0) > 389.97);

        // Lapse rate in the troposphere
        let t1 = atmosphere.standard_temperature(geometric_altitude(1000.0));
        let t2 = atmosphere.standard_temperature(geometric_altitude(2000.0));
        assert_relative_eq!(t2 - t1, -3.56616, epsilon = 1e-3);
    }

    #[test]
    fn test_pressure_continuous_across_layers() {
        let atmosphere = AtmosphereModel::default();
        for &(base, _) in STANDARD_TEMPERATURE_PROFILE.iter().skip(1) {
            let h = geometric_altitude(base);
            let below = atmosphere.pressure(h - 1e-3);
            let above = atmosphere.pressure(h + 1e-3);
            assert_relative_eq!(below, above, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_known_altitude_values() {
        let atmosphere = AtmosphereModel::default();
        // 10,000 ft standard: 1455.6 psf, 483.0 °R, 0.0017556 slug/ft^3
        let state = atmosphere.state_at(10_000.0);
        assert_relative_eq!(state.pressure, 1455.6, epsilon = 1.0);
        assert_relative_eq!(state.temperature, 483.03, epsilon = 0.1);
        assert_relative_eq!(state.density, 0.0017556, epsilon = 2e-6);
    }

    #[test]
    fn test_pressure_altitude_matches_geometric_on_standard_day() {
        let atmosphere = AtmosphereModel::default();
        for h in [-1000.0, 0.0, 5000.0, 36_089.0, 45_000.0, 80_000.0, 160_000.0] {
            let state = atmosphere.state_at(h);
            assert_relative_eq!(state.pressure_altitude, h, epsilon = 1e-3);
            assert_relative_eq!(state.density_altitude, h, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_density_altitude_follows_temperature_offset() {
        let hot = AtmosphereModel::new(AtmosphereConfig {
            temperature_offset: 27.0,
            ..Default::default()
        });
        let cold = AtmosphereModel::new(AtmosphereConfig {
            temperature_offset: -27.0,
            ..Default::default()
        });

        let hot_state = hot.state_at(5000.0);
        let cold_state = cold.state_at(5000.0);

        assert_relative_eq!(hot.sea_level_temperature(), 518.67 + 27.0, epsilon = 1e-9);
        assert!(hot_state.density < hot.standard_density(5000.0));
        assert!(cold_state.density > cold.standard_density(5000.0));

        assert_relative_eq!(hot_state.pressure_altitude, 5000.0, epsilon = 1e-3);
        assert!(hot_state.density_altitude > hot_state.pressure_altitude + 1000.0);
        assert!(cold_state.density_altitude < cold_state.pressure_altitude - 1000.0);
        assert_relative_eq!(hot_state.temperature - cold_state.temperature, 54.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sea_level_pressure_override() {
        let mut atmosphere = AtmosphereModel::default();
        atmosphere.set_sea_level_pressure(2116.22 * 0.98);
        let state = atmosphere.state_at(0.0);
        assert!(state.delta < 1.0);
        assert!(state.pressure_altitude > 500.0);
    }

    #[test]
    fn test_outputs_finite_for_extreme_altitudes() {
        let atmosphere = AtmosphereModel::default();
        for h in [-10_000.0, 300_000.0, 1.0e6, 5.0e6] {
            let state = atmosphere.state_at(h);
            assert!(state.temperature.is_finite() && state.temperature > 0.0);
            assert!(state.pressure.is_finite() && state.pressure >= 0.0);
            assert!(state.density.is_finite() && state.density >= 0.0);
            assert!(state.speed_of_sound.is_finite());
            assert!(state.pressure_altitude.is_finite());
            assert!(state.density_altitude.is_finite());
        }
    }
}
