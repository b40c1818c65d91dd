use approx::assert_relative_eq;
use fdm6::resources::{EnvironmentConfig, GravityModel, WindConfig};
use nalgebra::Vector3;

use crate::common::{assert_telemetry_finite, create_simulation_in, flying, light_single};

#[test]
fn test_standard_day_at_altitude() {
    let sim = flying(light_single(), 5000.0, 150.0);
    let temperature = sim.get_property("atmosphere/T-R").unwrap();
    assert_relative_eq!(temperature, 500.84, epsilon = 0.1);
    assert_relative_eq!(
        sim.get_property("atmosphere/theta").unwrap(),
        temperature / 518.67,
        epsilon = 1e-4
    );
    assert_relative_eq!(
        sim.get_property("atmosphere/pressure-altitude").unwrap(),
        5000.0,
        epsilon = 1.0
    );
    assert_relative_eq!(
        sim.get_property("atmosphere/density-altitude").unwrap(),
        5000.0,
        epsilon = 1.0
    );
    assert!(sim.get_property("atmosphere/sigma").unwrap() < 1.0);
}

#[test]
fn test_hot_day_raises_density_altitude() {
    let mut sim = flying(light_single(), 5000.0, 150.0);
    sim.set_property("atmosphere/delta-T", 20.0).unwrap();
    sim.run().unwrap();

    let altitude = sim.get_property("position/h-sl-ft").unwrap();
    let pressure_altitude = sim.get_property("atmosphere/pressure-altitude").unwrap();
    let density_altitude = sim.get_property("atmosphere/density-altitude").unwrap();
    assert_relative_eq!(pressure_altitude, altitude, epsilon = 1.0);
    assert!(density_altitude > altitude + 1000.0);

    sim.set_property("atmosphere/delta-T", -20.0).unwrap();
    sim.run().unwrap();
    assert!(sim.get_property("atmosphere/density-altitude").unwrap() < altitude - 1000.0);
}

#[test]
fn test_low_sea_level_pressure_raises_pressure_altitude() {
    let mut sim = flying(light_single(), 3000.0, 150.0);
    sim.set_property("atmosphere/P-sl-psf", 2050.0).unwrap();
    sim.run().unwrap();
    let altitude = sim.get_property("position/h-sl-ft").unwrap();
    assert!(sim.get_property("atmosphere/pressure-altitude").unwrap() > altitude + 500.0);
    assert_relative_eq!(sim.get_property("atmosphere/P-sl-psf").unwrap(), 2050.0);
}

#[test]
fn test_headwind_changes_airspeed_not_ground_speed() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    sim.set_property("atmosphere/wind-north-fps", -30.0).unwrap();
    sim.run().unwrap();

    assert_relative_eq!(sim.get_property("atmosphere/wind-north-fps").unwrap(), -30.0);
    assert_relative_eq!(sim.get_property("velocities/vt-fps").unwrap(), 180.0, epsilon = 1.0);
    assert_relative_eq!(sim.get_property("velocities/vg-fps").unwrap(), 150.0, epsilon = 1.0);
}

#[test]
fn test_wind_profile_from_configuration() {
    let environment = EnvironmentConfig {
        wind: WindConfig::Constant {
            velocity: Vector3::new(0.0, 25.0, 0.0),
        },
        ..Default::default()
    };
    let mut sim = create_simulation_in(light_single(), environment);
    sim.apply_ic(&fdm6::InitialConditions::flying(4000.0, 150.0))
        .unwrap();

    // Air-relative initial speed already includes the crosswind
    assert_relative_eq!(sim.get_property("velocities/vt-fps").unwrap(), 150.0, epsilon = 1e-6);
    assert_relative_eq!(sim.get_property("velocities/v-east-fps").unwrap(), 25.0, epsilon = 1e-6);
}

#[test]
fn test_gravity_model_switch_through_properties() {
    let mut sim = flying(light_single(), 4000.0, 150.0);
    sim.run().unwrap();
    let wgs84 = sim.get_property("accelerations/gravity-ft_sec2").unwrap();

    sim.set_property("simulation/gravity-model", GravityModel::Standard.index())
        .unwrap();
    sim.run().unwrap();
    let standard = sim.get_property("accelerations/gravity-ft_sec2").unwrap();

    assert_eq!(sim.environment().gravity, GravityModel::Standard);
    assert!(wgs84 > 32.0 && wgs84 < 32.3);
    assert!(standard > 32.0 && standard < 32.3);
    assert!((wgs84 - standard).abs() > 1e-6);
    assert_telemetry_finite(&sim);
}

#[test]
fn test_geodetic_round_trip_on_both_models() {
    for model in [GravityModel::Wgs84, GravityModel::Standard] {
        let position = fdm6::resources::Geodetic {
            latitude: 0.7,
            longitude: -2.1,
            altitude: 12000.0,
        };
        let back = model.ecef_to_geodetic(&model.geodetic_to_ecef(&position));
        assert_relative_eq!(back.latitude, position.latitude, epsilon = 1e-9);
        assert_relative_eq!(back.longitude, position.longitude, epsilon = 1e-12);
        assert_relative_eq!(back.altitude, position.altitude, epsilon = 1e-3);
    }
}
