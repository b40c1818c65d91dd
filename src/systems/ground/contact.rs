use nalgebra::Vector3;
use tracing::debug;

use crate::components::{
    BrakeGroup, FlightControls, ForceMoment, GearConfig, GearState, GroundConfig, VehicleState,
};
use crate::resources::environment::GravityModel;
use crate::utils::constants::STANDARD_GRAVITY;
use crate::utils::{deg_to_rad, lerp};

/// Time constant of the stiction damper holding a contact point at rest [s]
const STICTION_TIME_CONSTANT: f64 = 0.1;

/// Inputs to one ground reaction evaluation
#[derive(Debug, Clone, Copy)]
pub struct GroundInputs<'a> {
    pub state: &'a VehicleState,
    pub gravity: GravityModel,
    pub controls: &'a FlightControls,
    /// Centre of gravity, body axes relative to the reference point [ft]
    pub cg: Vector3<f64>,
    /// Normalised gear extension, 1 fully down
    pub gear_position: f64,
    /// [ft]
    pub terrain_elevation: f64,
    /// Net non-ground body-axis force of the previous frame [lbf]
    pub applied_force: Vector3<f64>,
}

/// Brake command acting on a unit of the given group
pub fn brake_command(group: BrakeGroup, controls: &FlightControls) -> f64 {
    let command = match group {
        BrakeGroup::None => 0.0,
        BrakeGroup::Left => controls.left_brake,
        BrakeGroup::Right => controls.right_brake,
        BrakeGroup::Center => controls.left_brake.max(controls.right_brake),
        BrakeGroup::Nose | BrakeGroup::Tail => controls.center_brake,
    };
    command.clamp(0.0, 1.0)
}

struct ContactKinematics {
    /// Contact point relative to the CG, body axes
    arm: Vector3<f64>,
    compression: f64,
    /// NED velocity of the contact point
    velocity_ned: Vector3<f64>,
}

fn contact_kinematics(unit: &GearConfig, inputs: &GroundInputs) -> ContactKinematics {
    let state = inputs.state;
    let arm = unit.location - inputs.cg;
    let arm_ned = state.attitude * arm;
    let contact_altitude = state.altitude() - arm_ned.z;
    let compression = (inputs.terrain_elevation - contact_altitude).max(0.0);

    let rates = state.rates_relative_to_earth(inputs.gravity);
    let velocity_ned = state.attitude * (state.velocity + rates.cross(&arm));

    ContactKinematics {
        arm,
        compression,
        velocity_ned,
    }
}

/// Unit vectors of the rolling and side directions in the ground plane, NED
fn wheel_axes(state: &VehicleState, steer_angle: f64) -> (Vector3<f64>, Vector3<f64>) {
    let nose = state.attitude * Vector3::x();
    let heading = if nose.x.hypot(nose.y) > 1e-9 {
        nose.y.atan2(nose.x)
    } else {
        let (_, _, yaw) = state.euler_angles();
        yaw
    };
    let (sin, cos) = (heading + steer_angle).sin_cos();
    (Vector3::new(cos, sin, 0.0), Vector3::new(-sin, cos, 0.0))
}

fn steer_angle(unit: &GearConfig, controls: &FlightControls) -> f64 {
    if unit.is_steerable() {
        controls.steering.clamp(-1.0, 1.0) * deg_to_rad(unit.max_steer)
    } else {
        0.0
    }
}

fn normal_force(unit: &GearConfig, compression: f64, compression_rate: f64) -> f64 {
    if compression <= 0.0 {
        return 0.0;
    }
    let damping = if compression_rate < 0.0 {
        unit.rebound_damping()
    } else {
        unit.damping_c
    };
    (unit.spring_k * compression + damping * compression_rate).max(0.0)
}

/// Friction in the wheel frame (rolling, side) [lbf]
#[allow(clippy::too_many_arguments)]
fn friction_force(
    unit: &GearConfig,
    config: &GroundConfig,
    normal: f64,
    brake: f64,
    velocity: (f64, f64),
    applied: (f64, f64),
    load_share: f64,
) -> (f64, f64) {
    let (v_roll, v_side) = velocity;
    let speed = v_roll.hypot(v_side);

    if speed > config.rolling_threshold {
        let mu_roll = lerp(unit.rolling_friction, unit.dynamic_friction, brake);
        return (
            -mu_roll * normal * v_roll / speed,
            -unit.dynamic_friction * normal * v_side / speed,
        );
    }

    let damping = normal / (STANDARD_GRAVITY * STICTION_TIME_CONSTANT);
    let roll_limit = lerp(unit.rolling_friction, unit.static_friction, brake) * normal;
    let side_limit = unit.static_friction * normal;
    let roll = (-applied.0 * load_share - damping * v_roll).clamp(-roll_limit, roll_limit);
    let side = (-applied.1 * load_share - damping * v_side).clamp(-side_limit, side_limit);
    (roll, side)
}

/// Compute every gear unit's reaction and return the total about the CG.
///
/// Each unit is a spring-damper compressed along the local vertical with
/// friction in the wheel frame. A retractable unit that is not fully down
/// produces nothing.
pub fn calculate_ground_reactions(
    config: &GroundConfig,
    gear: &mut [GearState],
    inputs: &GroundInputs,
) -> ForceMoment {
    let state = inputs.state;
    let ned_to_body = state.attitude.inverse();
    let down = inputs.gear_position >= 1.0;

    // Normal loads first so static friction can share the applied force by load
    let contacts: Vec<(ContactKinematics, f64)> = config
        .units
        .iter()
        .map(|unit| {
            let kinematics = contact_kinematics(unit, inputs);
            let extended = down || !unit.retractable;
            let normal = if extended {
                normal_force(unit, kinematics.compression, kinematics.velocity_ned.z)
            } else {
                0.0
            };
            (kinematics, normal)
        })
        .collect();
    let total_normal: f64 = contacts.iter().map(|(_, n)| n).sum();
    let applied_ned = state.attitude * inputs.applied_force;

    let mut total = ForceMoment::default();
    for ((unit, gear_state), (kinematics, normal)) in
        config.units.iter().zip(gear.iter_mut()).zip(contacts)
    {
        let extended = down || !unit.retractable;
        let steer = steer_angle(unit, inputs.controls);
        let (roll_dir, side_dir) = wheel_axes(state, steer);
        let v_roll = kinematics.velocity_ned.dot(&roll_dir);
        let v_side = kinematics.velocity_ned.dot(&side_dir);

        let was_on_ground = gear_state.wow;
        *gear_state = GearState {
            compression: if extended { kinematics.compression } else { 0.0 },
            compression_rate: kinematics.velocity_ned.z,
            wow: extended && kinematics.compression > 0.0,
            steer_angle: steer,
            wheel_speed: v_roll,
            ..Default::default()
        };
        if gear_state.wow && !was_on_ground {
            debug!(
                "Gear {} touchdown at {:.2} ft/s sink",
                unit.name, gear_state.compression_rate
            );
        }
        if !gear_state.wow {
            continue;
        }

        let share = if total_normal > 0.0 { normal / total_normal } else { 0.0 };
        let friction = friction_force(
            unit,
            config,
            normal,
            brake_command(unit.brake_group, inputs.controls),
            (v_roll, v_side),
            (applied_ned.dot(&roll_dir), applied_ned.dot(&side_dir)),
            share,
        );

        let force_ned = roll_dir * friction.0 + side_dir * friction.1 - Vector3::z() * normal;
        let force = ned_to_body * force_ned;
        let moment = kinematics.arm.cross(&force);

        gear_state.normal_force = normal;
        gear_state.friction = friction;
        gear_state.force = force;
        gear_state.moment = moment;
        total += ForceMoment::new(force, moment);
    }
    total
}
