//! Six degree of freedom rigid-body flight dynamics.
//!
//! An [`world::Simulation`] owns one aircraft ([`components::AircraftConfig`]),
//! its environment and its state, and advances them at a fixed step with
//! [`world::Simulation::run`]. Each frame evaluates mass properties, air data,
//! aerodynamic, propulsive and ground loads, turns them into accelerations in
//! a rotating oblate-Earth frame and integrates the state. The same model
//! evaluation drives the trim solver behind [`world::Simulation::do_trim`].
//!
//! Units are feet, slugs, pounds-force, seconds, radians and degrees Rankine.
//! Body axes are x forward, y right, z down; the local frame is North-East-Down.
//!
//! ```no_run
//! use fdm6::components::{AircraftConfig, TrimCondition};
//! use fdm6::resources::SimulationConfig;
//! use fdm6::world::{InitialConditions, Simulation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sim = Simulation::new(AircraftConfig::light_single()?, SimulationConfig::default())?;
//! sim.apply_ic(&InitialConditions::flying(4000.0, 170.0))?;
//! sim.do_trim(TrimCondition::Level)?;
//! sim.run_for(10.0)?;
//! println!("Nz = {:.3}", sim.get_property("accelerations/Nz")?);
//! # Ok(())
//! # }
//! ```

pub mod components;
pub mod resources;
pub mod systems;
pub mod utils;
pub mod world;

pub use utils::errors::{ConfigError, SimError};
pub use world::{InitialConditions, Simulation};
