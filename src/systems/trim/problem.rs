use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::{DMatrix, DVector, UnitQuaternion, Vector3};

use crate::components::{
    AircraftState, GearConfig, TrimBounds, TrimCondition, TrimResiduals, VehicleState,
};
use crate::systems::mass::calculate_mass_properties;
use crate::systems::physics::{evaluate_derivatives, ModelContext};
use crate::systems::propulsion::PropulsionMode;
use crate::utils::body_velocity_from_air_data;

/// Pitch angle that puts the air-relative flight path at `gamma` for the given
/// angle of attack, sideslip and bank.
pub fn pitch_for_flight_path(alpha: f64, beta: f64, phi: f64, gamma: f64) -> f64 {
    let a = alpha.cos() * beta.cos();
    let b = phi.sin() * beta.sin() + phi.cos() * alpha.sin() * beta.cos();
    let sin_gamma = gamma.sin();
    let denominator = a * a - sin_gamma * sin_gamma;
    if denominator.abs() < 1e-12 {
        return alpha + gamma;
    }
    let root = (a * a - sin_gamma * sin_gamma + b * b).max(0.0).sqrt();
    ((a * b + sin_gamma * root) / denominator).atan()
}

/// Equilibrium search over the full aircraft model.
///
/// Flight conditions solve for `[alpha, beta, elevator, aileron, rudder,
/// throttle]`; the ground condition solves for `[altitude, theta, phi]`.
#[derive(Clone)]
pub struct TrimProblem<'a> {
    pub context: ModelContext<'a>,
    /// Location, heading, fuel, engines and secondary controls to trim about
    pub base: AircraftState,
    pub condition: TrimCondition,
    /// True airspeed to hold in flight [ft/s]
    pub airspeed: f64,
    pub bounds: TrimBounds,
}

impl<'a> TrimProblem<'a> {
    pub fn is_ground(&self) -> bool {
        self.condition == TrimCondition::Ground
    }

    pub fn dimension(&self) -> usize {
        if self.is_ground() {
            3
        } else {
            6
        }
    }

    /// Lower and upper bound of each free variable
    pub fn limits(&self) -> Vec<(f64, f64)> {
        let b = &self.bounds;
        if self.is_ground() {
            let terrain = self.context.terrain_elevation;
            vec![
                (terrain - b.altitude_span, terrain + b.altitude_span),
                b.theta,
                b.phi,
            ]
        } else {
            vec![b.alpha, b.beta, b.elevator, b.aileron, b.rudder, b.throttle]
        }
    }

    pub fn clamp(&self, param: &[f64]) -> Vec<f64> {
        param
            .iter()
            .zip(self.limits())
            .map(|(value, (lo, hi))| value.clamp(lo, hi))
            .collect()
    }

    /// Starting point taken from the base state
    pub fn initial_guess(&self) -> Vec<f64> {
        let base = &self.base;
        let guess = if self.is_ground() {
            self.ground_guess()
        } else {
            let alpha = if base.air_data.true_airspeed > 1.0 && base.air_data.alpha.abs() < 0.3 {
                base.air_data.alpha
            } else {
                0.05
            };
            let throttle = base
                .controls
                .engines
                .first()
                .map(|e| e.throttle)
                .filter(|t| *t > 0.0)
                .unwrap_or(0.5);
            vec![
                alpha,
                0.0,
                base.controls.elevator,
                base.controls.aileron,
                base.controls.rudder,
                throttle,
            ]
        };
        self.clamp(&guess)
    }

    fn extended_units(&self) -> impl Iterator<Item = (usize, &'a GearConfig)> + '_ {
        let down = self.base.surfaces.gear >= 1.0;
        self.context
            .aircraft
            .ground
            .units
            .iter()
            .enumerate()
            .filter(move |(_, unit)| down || !unit.retractable)
    }

    /// Altitude and attitude resting every extended unit on the terrain,
    /// lowered by the static sag of the combined springs
    fn ground_guess(&self) -> Vec<f64> {
        let terrain = self.context.terrain_elevation;
        let mass = calculate_mass_properties(&self.context.aircraft.mass, &self.base.tanks);
        let arms: Vec<(Vector3<f64>, f64)> = self
            .extended_units()
            .map(|(_, unit)| (unit.location - mass.cg, unit.spring_k))
            .collect();
        if arms.is_empty() {
            return vec![terrain, 0.0, 0.0];
        }

        // Small-angle contact depth below the CG is z - x*theta + y*phi
        let a = DMatrix::from_fn(arms.len(), 3, |i, j| match j {
            0 => 1.0,
            1 => arms[i].0.x,
            _ => -arms[i].0.y,
        });
        let b = DVector::from_iterator(arms.len(), arms.iter().map(|(arm, _)| arm.z));
        let (depth, theta, phi) = match a.svd(true, true).solve(&b, 1e-10) {
            Ok(x) => (x[0], x[1], x[2]),
            Err(_) => (b.max(), 0.0, 0.0),
        };
        let stiffness: f64 = arms.iter().map(|(_, k)| k).sum();
        let sag = mass.weight / stiffness.max(1.0);
        vec![terrain + depth - sag, theta, phi]
    }

    /// Extended units left without load in a ground state
    pub fn unloaded_units(&self, state: &AircraftState) -> Vec<&'a str> {
        self.extended_units()
            .filter(|(index, _)| !state.gear.get(*index).is_some_and(|g| g.wow))
            .map(|(_, unit)| unit.name.as_str())
            .collect()
    }

    /// The candidate aircraft state for a parameter vector, with every model
    /// evaluated and its accelerations stored
    pub fn evaluate(&self, param: &[f64]) -> AircraftState {
        let param = self.clamp(param);
        let mut state = self.base.clone();
        let gravity = self.context.environment.gravity;
        let (_, _, heading) = self.base.vehicle.euler_angles();
        let location = self.base.vehicle.location;

        if self.is_ground() {
            let mut location = location;
            location.altitude = param[0];
            let attitude = UnitQuaternion::from_euler_angles(param[2], param[1], heading);
            let mut vehicle =
                VehicleState::new(gravity, location, Vector3::zeros(), attitude, Vector3::zeros());
            vehicle.angular_velocity = vehicle.earth_rate_body(gravity);
            state.vehicle = vehicle;
        } else {
            let (alpha, beta) = (param[0], param[1]);
            state.controls.elevator = param[2];
            state.controls.aileron = param[3];
            state.controls.rudder = param[4];
            state.controls.set_throttle(param[5]);

            let phi = self.condition.bank();
            let theta = pitch_for_flight_path(alpha, beta, phi, self.condition.gamma());
            let attitude = UnitQuaternion::from_euler_angles(phi, theta, heading);

            let height_agl = location.altitude - self.context.terrain_elevation;
            let wind_body = attitude.inverse_transform_vector(&self.context.environment.wind_at(height_agl));
            let velocity = body_velocity_from_air_data(self.airspeed, alpha, beta) + wind_body;

            // Coordinated turn rate about the local vertical
            let gravity_magnitude = gravity.gravity_magnitude(&location);
            let turn_rate = gravity_magnitude * phi.tan() / self.airspeed.max(1.0);
            let local_rates = Vector3::new(
                -turn_rate * theta.sin(),
                turn_rate * phi.sin() * theta.cos(),
                turn_rate * phi.cos() * theta.cos(),
            );

            let mut vehicle = VehicleState::new(gravity, location, velocity, attitude, Vector3::zeros());
            vehicle.angular_velocity = local_rates + vehicle.local_frame_rate_body(gravity);
            state.vehicle = vehicle;
        }

        state
            .surfaces
            .deflect(&state.controls, &self.context.aircraft.limits);
        evaluate_derivatives(&self.context, &mut state, PropulsionMode::Trim);
        state
    }

    pub fn residuals(&self, state: &AircraftState) -> TrimResiduals {
        let a = &state.accelerations;
        TrimResiduals {
            udot: a.linear.x,
            vdot: a.linear.y,
            wdot: a.linear.z,
            pdot: a.angular.x,
            qdot: a.angular.y,
            rdot: a.angular.z,
        }
    }

    /// Weighted residual vector whose squared norm is the cost
    pub fn residual_vector(&self, param: &[f64]) -> DVector<f64> {
        let r = self.residuals(&self.evaluate(param));
        if self.is_ground() {
            DVector::from_vec(vec![r.wdot, 10.0 * r.pdot, 10.0 * r.qdot])
        } else {
            DVector::from_vec(vec![
                r.udot,
                r.vdot,
                r.wdot,
                10.0 * r.pdot,
                10.0 * r.qdot,
                10.0 * r.rdot,
            ])
        }
    }
}

impl CostFunction for TrimProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        if param.len() != self.dimension() {
            return Err(ArgminError::msg(format!(
                "expected {} trim variables, got {}",
                self.dimension(),
                param.len()
            )));
        }
        let cost = self.residual_vector(param).norm_squared();
        if cost.is_finite() {
            Ok(cost)
        } else {
            Ok(f64::MAX)
        }
    }
}
