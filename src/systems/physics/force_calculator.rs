use nalgebra::Vector3;

use super::calculate_accelerations;
use crate::components::{
    Accelerations, AircraftConfig, AircraftState, ForceCategory, ForceMoment,
};
use crate::resources::environment::EnvironmentModel;
use crate::systems::aerodynamics::{
    calculate_aerodynamic_forces_moments, calculate_air_data, AeroInputs,
};
use crate::systems::ground::{calculate_ground_reactions, GroundInputs};
use crate::systems::mass::calculate_mass_properties;
use crate::systems::propulsion::{calculate_propulsion, PropulsionMode};

/// What one model evaluation sees of the world
#[derive(Debug, Clone, Copy)]
pub struct ModelContext<'a> {
    pub aircraft: &'a AircraftConfig,
    pub environment: &'a EnvironmentModel,
    /// [ft]
    pub terrain_elevation: f64,
    /// Time since the stored air data and loads were computed. `None` right
    /// after initial conditions and during trim, where nothing came before.
    pub previous_dt: Option<f64>,
}

/// Non-ground force of the stored loads plus the weight, body axes
fn applied_force(state: &AircraftState, gravity_body: &Vector3<f64>) -> Vector3<f64> {
    let cg = state.mass.cg;
    let aero = state.loads.category_total(ForceCategory::Aerodynamic, &cg);
    let propulsion = state.loads.category_total(ForceCategory::Propulsive, &cg);
    aero.force + propulsion.force + gravity_body * state.mass.mass
}

/// Run every force producer on `state` and accumulate the total about the CG.
///
/// Mass properties and air data come first, then aerodynamics, propulsion and
/// ground reactions. Static gear friction works against the non-ground force of
/// the previous evaluation, or of this one when there is none.
pub fn calculate_net_forces_moments(
    ctx: &ModelContext,
    state: &mut AircraftState,
    mode: PropulsionMode,
) -> ForceMoment {
    let gravity = ctx.environment.gravity;
    let gravity_body = state
        .vehicle
        .attitude
        .inverse_transform_vector(&gravity.effective_gravity_ned(&state.vehicle.location));
    let previous_applied = ctx
        .previous_dt
        .map(|_| applied_force(state, &gravity_body));

    state.mass = calculate_mass_properties(&ctx.aircraft.mass, &state.tanks);
    let cg = state.mass.cg;

    let air_data = calculate_air_data(
        &state.vehicle,
        ctx.environment,
        ctx.terrain_elevation,
        ctx.previous_dt.map(|dt| (&state.air_data, dt)),
    );
    state.air_data = air_data;

    state.aero = calculate_aerodynamic_forces_moments(
        &ctx.aircraft.aero,
        &AeroInputs {
            air_data: &state.air_data,
            surfaces: &state.surfaces,
            body_rates: state.vehicle.rates_relative_to_earth(gravity),
            cg,
        },
    );
    let aero = ForceMoment::new(state.aero.force_body, state.aero.moment);

    let propulsion = calculate_propulsion(
        &ctx.aircraft.propulsion,
        &state.controls.engines,
        &mut state.engines,
        &mut state.tanks,
        &state.air_data,
        &cg,
        mode,
    );

    let applied = previous_applied
        .unwrap_or_else(|| aero.force + propulsion.force + gravity_body * state.mass.mass);
    let ground = calculate_ground_reactions(
        &ctx.aircraft.ground,
        &mut state.gear,
        &GroundInputs {
            state: &state.vehicle,
            gravity,
            controls: &state.controls,
            cg,
            gear_position: state.surfaces.gear,
            terrain_elevation: ctx.terrain_elevation,
            applied_force: applied,
        },
    );

    state.loads.clear_forces();
    state.loads.add_load(&aero, ForceCategory::Aerodynamic);
    state.loads.add_load(&propulsion, ForceCategory::Propulsive);
    state.loads.add_load(&ground, ForceCategory::Ground);
    state.loads.calculate_net_forces_moments(&cg)
}

/// Evaluate the loads and store the resulting accelerations in `state`
pub fn evaluate_derivatives(
    ctx: &ModelContext,
    state: &mut AircraftState,
    mode: PropulsionMode,
) -> Accelerations {
    let total = calculate_net_forces_moments(ctx, state, mode);
    let pilot_arm = ctx.aircraft.pilot_eye - state.mass.cg;
    state.accelerations = calculate_accelerations(
        &state.vehicle,
        &state.mass,
        &total,
        ctx.environment.gravity,
        &pilot_arm,
    );
    state.accelerations
}
