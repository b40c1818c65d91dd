use serde::{Deserialize, Serialize};

use super::AircraftConfig;
use crate::components::{
    Accelerations, AeroState, AirData, EngineState, FlightControls, ForceAccumulator, FuelTank,
    GearState, MassAggregate, SurfacePositions, VehicleState,
};

/// Everything about one aircraft that changes from frame to frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AircraftState {
    pub vehicle: VehicleState,
    pub controls: FlightControls,
    pub surfaces: SurfacePositions,
    pub engines: Vec<EngineState>,
    pub tanks: Vec<FuelTank>,
    pub gear: Vec<GearState>,
    pub mass: MassAggregate,
    pub air_data: AirData,
    pub aero: AeroState,
    pub loads: ForceAccumulator,
    pub accelerations: Accelerations,
}

impl AircraftState {
    /// Fresh state for `config` with full tanks as configured and engines off
    pub fn new(config: &AircraftConfig) -> Self {
        let controls = FlightControls::new(config.engine_count());
        let mut surfaces = SurfacePositions::default();
        surfaces.settle(&controls, &config.limits);
        Self {
            controls,
            surfaces,
            engines: vec![EngineState::default(); config.engine_count()],
            tanks: config.propulsion.tanks.clone(),
            gear: vec![GearState::default(); config.ground.units.len()],
            ..Default::default()
        }
    }

    pub fn total_fuel(&self) -> f64 {
        self.tanks.iter().map(|t| t.contents).sum()
    }

    pub fn weight_on_wheels(&self) -> bool {
        self.gear.iter().any(|g| g.wow)
    }
}
