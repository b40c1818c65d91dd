use fdm6::components::AircraftConfig;
use fdm6::resources::{EnvironmentConfig, SimulationConfig};
use fdm6::world::{InitialConditions, Simulation};

/// Creates a simulation with default physics for `aircraft`
pub fn create_simulation(aircraft: AircraftConfig) -> Simulation {
    Simulation::new(aircraft, SimulationConfig::default()).expect("valid configuration")
}

/// Creates a simulation with a custom environment
pub fn create_simulation_in(aircraft: AircraftConfig, environment: EnvironmentConfig) -> Simulation {
    let config = SimulationConfig {
        environment,
        ..Default::default()
    };
    Simulation::new(aircraft, config).expect("valid configuration")
}

pub fn light_single() -> AircraftConfig {
    AircraftConfig::light_single().expect("light single preset")
}

pub fn jet() -> AircraftConfig {
    AircraftConfig::jet().expect("jet preset")
}

pub fn turboprop_twin() -> AircraftConfig {
    AircraftConfig::turboprop_twin().expect("turboprop preset")
}

/// In level flight with the engines running
pub fn flying(aircraft: AircraftConfig, altitude: f64, speed: f64) -> Simulation {
    let mut sim = create_simulation(aircraft);
    sim.apply_ic(&InitialConditions::flying(altitude, speed))
        .expect("valid initial conditions");
    sim
}

/// At rest on the runway with the engines off, settled on the gear by a
/// ground trim
pub fn parked(aircraft: AircraftConfig, terrain_elevation: f64) -> Simulation {
    let mut sim = create_simulation(aircraft);
    sim.apply_ic(&InitialConditions::parked(terrain_elevation, 4.0))
        .expect("valid initial conditions");
    sim.do_trim(fdm6::components::TrimCondition::Ground)
        .expect("ground trim");
    sim
}
