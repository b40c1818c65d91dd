use nalgebra::Vector3;

use crate::components::{Accelerations, ForceMoment, MassAggregate, VehicleState};
use crate::resources::environment::GravityModel;
use crate::utils::constants::STANDARD_GRAVITY;

fn load_factor(specific_force: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(specific_force.x, specific_force.y, -specific_force.z) / STANDARD_GRAVITY
}

/// Newton-Euler accelerations about the CG in a rotating Earth frame.
///
/// `loads` is the total non-gravitational force and moment about the CG in body
/// axes; `pilot_arm` is the pilot eye point relative to the CG.
pub fn calculate_accelerations(
    state: &VehicleState,
    mass: &MassAggregate,
    loads: &ForceMoment,
    model: GravityModel,
    pilot_arm: &Vector3<f64>,
) -> Accelerations {
    let omega = state.angular_velocity;
    let earth_rate = state.earth_rate_body(model);
    let gravity_body = state
        .attitude
        .inverse_transform_vector(&model.effective_gravity_ned(&state.location));

    let specific_force = loads.force / mass.mass;
    let linear = specific_force + gravity_body - (omega + earth_rate).cross(&state.velocity);

    let angular = mass.inertia_inv * (loads.moment - omega.cross(&(mass.inertia * omega)));

    let pilot = specific_force + angular.cross(pilot_arm) + omega.cross(&omega.cross(pilot_arm));

    Accelerations {
        linear,
        angular,
        load_factor: load_factor(&specific_force),
        pilot,
        pilot_load_factor: load_factor(&pilot),
        gravity_body,
        gravity: model.gravity_magnitude(&state.location),
    }
}
