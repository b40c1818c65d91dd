use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, info, warn};

use super::TrimProblem;
use crate::components::{AircraftState, TrimError, TrimSolution, TrimSolverConfig};

/// Step halvings tried before a Newton step counts as stalled
const LINE_SEARCH_STEPS: usize = 8;
/// Largest singular value ratio treated as rank deficient
const SVD_EPSILON: f64 = 1e-10;

/// Damped Newton search with a Nelder-Mead escape when Newton stalls
pub struct TrimSolver<'a> {
    problem: TrimProblem<'a>,
    config: TrimSolverConfig,
    iterations: u64,
}

impl<'a> TrimSolver<'a> {
    pub fn new(problem: TrimProblem<'a>, config: TrimSolverConfig) -> Self {
        Self {
            problem,
            config,
            iterations: 0,
        }
    }

    pub fn problem(&self) -> &TrimProblem<'a> {
        &self.problem
    }

    fn validate(&self) -> Result<(), TrimError> {
        let problem = &self.problem;
        if problem.is_ground() {
            if problem.context.aircraft.ground.units.is_empty() {
                return Err(TrimError::InvalidCondition(
                    "ground trim needs landing gear".to_string(),
                ));
            }
            return Ok(());
        }
        if !(problem.airspeed.is_finite() && problem.airspeed > 1.0) {
            return Err(TrimError::InvalidCondition(format!(
                "airspeed {:.2} ft/s is too low for a flight trim",
                problem.airspeed
            )));
        }
        if problem.condition.bank().abs() >= 80f64.to_radians() {
            return Err(TrimError::InvalidCondition(
                "bank angle must be below 80 degrees".to_string(),
            ));
        }
        if problem.condition.gamma().abs() >= 60f64.to_radians() {
            return Err(TrimError::InvalidCondition(
                "flight path angle must be below 60 degrees".to_string(),
            ));
        }
        Ok(())
    }

    fn cost(&self, param: &[f64]) -> f64 {
        let cost = self.problem.residual_vector(param).norm_squared();
        if cost.is_finite() {
            cost
        } else {
            f64::MAX
        }
    }

    /// Forward-difference Jacobian of the weighted residuals
    fn jacobian(&self, param: &[f64], residual: &DVector<f64>) -> DMatrix<f64> {
        let limits = self.problem.limits();
        let n = param.len();
        let mut jacobian = DMatrix::zeros(residual.len(), n);
        for (i, (lo, hi)) in limits.iter().enumerate() {
            let mut step = self.config.jacobian_step.max(1e-9) * (hi - lo);
            // Step inward at an upper bound
            if param[i] + step > *hi {
                step = -step;
            }
            let mut perturbed = param.to_vec();
            perturbed[i] += step;
            let column = (self.problem.residual_vector(&perturbed) - residual) / step;
            jacobian.set_column(i, &column);
        }
        jacobian
    }

    /// Newton step limited to a fraction of each variable's range
    fn newton_step(&self, param: &[f64]) -> Result<DVector<f64>, TrimError> {
        let residual = self.problem.residual_vector(param);
        let jacobian = self.jacobian(param, &residual);
        let mut step = jacobian
            .svd(true, true)
            .solve(&(-residual), SVD_EPSILON)
            .map_err(|e| TrimError::Solver(e.to_string()))?;

        let scale = self
            .problem
            .limits()
            .iter()
            .zip(step.iter())
            .map(|((lo, hi), dx)| {
                let limit = self.config.max_step_fraction * (hi - lo);
                if dx.abs() > limit {
                    limit / dx.abs()
                } else {
                    1.0
                }
            })
            .fold(1.0, f64::min);
        step *= scale;
        Ok(step)
    }

    /// Backtrack along `step` until the cost drops
    fn line_search(&self, param: &[f64], step: &DVector<f64>, cost: f64) -> Option<(Vec<f64>, f64)> {
        let mut lambda = 1.0;
        for _ in 0..LINE_SEARCH_STEPS {
            let candidate: Vec<f64> = param
                .iter()
                .zip(step.iter())
                .map(|(x, dx)| x + lambda * dx)
                .collect();
            let candidate = self.problem.clamp(&candidate);
            let candidate_cost = self.cost(&candidate);
            if candidate_cost < cost {
                return Some((candidate, candidate_cost));
            }
            lambda *= 0.5;
        }
        None
    }

    /// Nelder-Mead search around `param` for a point Newton can continue from
    fn direct_search(&mut self, param: &[f64]) -> Result<(Vec<f64>, f64), TrimError> {
        let limits = self.problem.limits();
        let mut simplex = Vec::with_capacity(param.len() + 1);
        simplex.push(param.to_vec());
        for (i, (lo, hi)) in limits.iter().enumerate() {
            let mut vertex = param.to_vec();
            let offset = 0.05 * (hi - lo);
            vertex[i] = if vertex[i] + offset <= *hi {
                vertex[i] + offset
            } else {
                vertex[i] - offset
            };
            simplex.push(vertex);
        }

        let solver = NelderMead::new(simplex)
            .with_sd_tolerance(1e-12)
            .map_err(|e| TrimError::Solver(e.to_string()))?;
        let target = self.config.cost_tolerance / 2.0;
        let result = Executor::new(self.problem.clone(), solver)
            .configure(|state| {
                state
                    .max_iters(self.config.max_simplex_iterations)
                    .target_cost(target)
            })
            .run()
            .map_err(|e| TrimError::Solver(e.to_string()))?;

        self.iterations += result.state.iter;
        let best = result
            .state
            .best_param
            .as_ref()
            .map(|p| self.problem.clamp(p))
            .unwrap_or_else(|| param.to_vec());
        let cost = self
            .problem
            .cost(&best)
            .map_err(|e| TrimError::Solver(e.to_string()))?;
        Ok((best, cost))
    }

    /// Search for the equilibrium, returning the solution and the trimmed state
    pub fn solve(&mut self) -> Result<(TrimSolution, AircraftState), TrimError> {
        self.validate()?;
        info!("Trimming {:?} at {:.1} ft/s", self.problem.condition, self.problem.airspeed);

        let mut param = self.problem.initial_guess();
        let mut cost = self.cost(&param);
        let mut newton_iterations = 0;

        while cost >= self.config.cost_tolerance && newton_iterations < self.config.max_iterations {
            newton_iterations += 1;
            self.iterations += 1;
            let step = self.newton_step(&param)?;
            match self.line_search(&param, &step, cost) {
                Some((next, next_cost)) => {
                    param = next;
                    cost = next_cost;
                    debug!("Trim iteration {}: cost {:.3e}", self.iterations, cost);
                }
                None => {
                    debug!("Newton stalled at cost {:.3e}, running direct search", cost);
                    let (next, next_cost) = self.direct_search(&param)?;
                    if next_cost >= cost {
                        break;
                    }
                    param = next;
                    cost = next_cost;
                }
            }
        }

        if cost >= self.config.cost_tolerance {
            warn!(
                "Trim of {:?} failed: cost {:.3e} after {} iterations",
                self.problem.condition, cost, self.iterations
            );
            return Err(TrimError::NotConverged {
                cost,
                iterations: self.iterations,
            });
        }

        let state = self.problem.evaluate(&param);
        if self.problem.is_ground() {
            let unloaded = self.problem.unloaded_units(&state);
            if !unloaded.is_empty() {
                warn!(
                    "Ground trim balanced with {} off the ground (theta {:.2} deg)",
                    unloaded.join(", "),
                    param[1].to_degrees()
                );
                return Err(TrimError::Unsettled(unloaded.join(", ")));
            }
        }
        let residuals = self.problem.residuals(&state);
        let (phi, theta, _) = state.vehicle.euler_angles();
        let controls = &state.controls;
        let solution = TrimSolution {
            condition: self.problem.condition,
            alpha: state.air_data.alpha,
            beta: state.air_data.beta,
            theta,
            phi,
            elevator: controls.elevator,
            aileron: controls.aileron,
            rudder: controls.rudder,
            throttle: controls.engines.first().map_or(0.0, |e| e.throttle),
            altitude: state.vehicle.altitude(),
            cost,
            iterations: self.iterations,
            residuals,
        };
        info!(
            "Trimmed {:?}: alpha {:.2} deg, elevator {:.3}, throttle {:.3}, cost {:.2e} in {} iterations",
            solution.condition,
            solution.alpha.to_degrees(),
            solution.elevator,
            solution.throttle,
            solution.cost,
            solution.iterations
        );
        Ok((solution, state))
    }
}
