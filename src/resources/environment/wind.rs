use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

const VON_KARMAN: f64 = 0.41;

/// Wind field, all velocities in feet per second.
///
/// `bearing` is the direction the wind blows towards, radians clockwise from north.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WindConfig {
    Constant {
        /// Wind velocity in NED axes
        velocity: Vector3<f64>,
    },
    Logarithmic {
        /// Zero-plane displacement [ft]
        d: f64,
        /// Surface roughness length [ft]
        z0: f64,
        /// Friction velocity [ft/s]
        u_star: f64,
        bearing: f64,
    },
    PowerLaw {
        /// Reference wind speed [ft/s]
        u_r: f64,
        /// Reference height [ft]
        z_r: f64,
        bearing: f64,
        alpha: f64,
    },
}

impl Default for WindConfig {
    fn default() -> Self {
        WindConfig::Constant {
            velocity: Vector3::zeros(),
        }
    }
}

impl WindConfig {
    /// Wind velocity in NED axes at a height above ground level
    pub fn wind_at(&self, height_agl: f64) -> Vector3<f64> {
        match self {
            WindConfig::Constant { velocity } => *velocity,
            WindConfig::Logarithmic {
                d,
                z0,
                u_star,
                bearing,
            } => {
                let height = height_agl - d;
                if height <= *z0 || *z0 <= 0.0 {
                    return Vector3::zeros();
                }
                let speed = u_star / VON_KARMAN * (height / z0).ln();
                horizontal(speed, *bearing)
            }
            WindConfig::PowerLaw {
                u_r,
                z_r,
                bearing,
                alpha,
            } => {
                if height_agl <= 0.0 || *z_r <= 0.0 {
                    return Vector3::zeros();
                }
                let speed = u_r * (height_agl / z_r).powf(*alpha);
                horizontal(speed, *bearing)
            }
        }
    }

    /// Replace one NED component, converting the field to a constant wind
    pub fn set_component(&mut self, axis: usize, value: f64, height_agl: f64) {
        let mut velocity = self.wind_at(height_agl);
        if let Some(component) = velocity.get_mut(axis) {
            *component = value;
        }
        *self = WindConfig::Constant { velocity };
    }
}

fn horizontal(speed: f64, bearing: f64) -> Vector3<f64> {
    Vector3::new(speed * bearing.cos(), speed * bearing.sin(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_constant_wind() {
        let wind = WindConfig::Constant {
            velocity: Vector3::new(10.0, -5.0, 1.0),
        };
        assert_eq!(wind.wind_at(0.0), Vector3::new(10.0, -5.0, 1.0));
        assert_eq!(wind.wind_at(10_000.0), Vector3::new(10.0, -5.0, 1.0));
    }

    #[test]
    fn test_logarithmic_profile_grows_with_height() {
        let wind = WindConfig::Logarithmic {
            d: 0.0,
            z0: 0.1,
            u_star: 1.5,
            bearing: PI / 2.0,
        };
        let low = wind.wind_at(10.0);
        let high = wind.wind_at(500.0);
        assert!(high.norm() > low.norm());
        assert_relative_eq!(low.x, 0.0, epsilon = 1e-12);
        assert!(low.y > 0.0);
        assert_eq!(wind.wind_at(0.05), Vector3::zeros());
    }

    #[test]
    fn test_power_law_reference_height() {
        let wind = WindConfig::PowerLaw {
            u_r: 20.0,
            z_r: 33.0,
            bearing: 0.0,
            alpha: 0.143,
        };
        assert_relative_eq!(wind.wind_at(33.0).x, 20.0, epsilon = 1e-12);
        assert!(wind.wind_at(300.0).x > 20.0);
        assert_eq!(wind.wind_at(-1.0), Vector3::zeros());
    }

    #[test]
    fn test_set_component_converts_to_constant() {
        let mut wind = WindConfig::PowerLaw {
            u_r: 20.0,
            z_r: 33.0,
            bearing: 0.0,
            alpha: 0.143,
        };
        wind.set_component(1, 7.0, 33.0);
        assert_eq!(
            wind,
            WindConfig::Constant {
                velocity: Vector3::new(20.0, 7.0, 0.0)
            }
        );
    }
}
