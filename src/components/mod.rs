pub mod aerodynamics;
pub mod air_data;
pub mod aircraft;
pub mod controls;
pub mod ground;
pub mod mass;
pub mod physics;
pub mod propulsion;
pub mod spatial;
pub mod trim;

pub use aerodynamics::{
    AeroAxis, AeroConfig, AeroGeometry, AeroState, AeroTerm, AeroVariable, TermTable,
};
pub use air_data::AirData;
pub use aircraft::{AircraftConfig, AircraftState};
pub use controls::{ControlLimits, EngineControls, FlightControls, SurfacePositions};
pub use ground::{BrakeGroup, GearConfig, GearState, GroundConfig};
pub use mass::{MassAggregate, MassConfig, PointMass};
pub use physics::{Accelerations, Force, ForceAccumulator, ForceCategory, ForceMoment, Moment};
pub use propulsion::{
    EngineConfig, EngineKind, EngineRunState, EngineState, FuelTank, GovernorConfig,
    PistonConfig, PropellerConfig, PropellerState, PropulsionConfig, RotationSense, SpoolConfig,
    TurbineConfig, TurbopropConfig,
};
pub use spatial::VehicleState;
pub use trim::{
    TrimBounds, TrimCondition, TrimError, TrimResiduals, TrimSolution, TrimSolverConfig,
};
