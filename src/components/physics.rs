use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// A force in body axes, optionally applied at a body-axis location [ft]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Force {
    pub vector: Vector3<f64>,
    pub point: Option<Vector3<f64>>,
    pub category: ForceCategory,
}

/// A pure couple in body axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    pub vector: Vector3<f64>,
    pub category: ForceCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceCategory {
    Aerodynamic,
    Propulsive,
    Ground,
}

impl ForceCategory {
    pub const ALL: [ForceCategory; 3] = [
        ForceCategory::Aerodynamic,
        ForceCategory::Propulsive,
        ForceCategory::Ground,
    ];
}

/// Force and moment pair about the centre of gravity, body axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceMoment {
    pub force: Vector3<f64>,
    pub moment: Vector3<f64>,
}

impl ForceMoment {
    pub fn new(force: Vector3<f64>, moment: Vector3<f64>) -> Self {
        Self { force, moment }
    }

    /// Force applied at `point`, with the moment taken about `cg`
    pub fn at_point(force: Vector3<f64>, point: &Vector3<f64>, cg: &Vector3<f64>) -> Self {
        Self {
            force,
            moment: (point - cg).cross(&force),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.force.iter().chain(self.moment.iter()).all(|v| v.is_finite())
    }
}

impl Add for ForceMoment {
    type Output = ForceMoment;

    fn add(self, rhs: ForceMoment) -> ForceMoment {
        ForceMoment {
            force: self.force + rhs.force,
            moment: self.moment + rhs.moment,
        }
    }
}

impl AddAssign for ForceMoment {
    fn add_assign(&mut self, rhs: ForceMoment) {
        self.force += rhs.force;
        self.moment += rhs.moment;
    }
}

/// Body-axis accelerations and load factors of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Accelerations {
    /// (u̇, v̇, ẇ) [ft/s²]
    pub linear: Vector3<f64>,
    /// (ṗ, q̇, ṙ) [rad/s²]
    pub angular: Vector3<f64>,
    /// (Nx, Ny, Nz) with Nz positive up [g]
    pub load_factor: Vector3<f64>,
    /// Specific force at the pilot eye point [ft/s²]
    pub pilot: Vector3<f64>,
    /// Pilot load factors with z positive up [g]
    pub pilot_load_factor: Vector3<f64>,
    /// Effective gravity in body axes [ft/s²]
    pub gravity_body: Vector3<f64>,
    /// Reported gravity magnitude of the active model [ft/s²]
    pub gravity: f64,
}

impl Accelerations {
    pub fn is_finite(&self) -> bool {
        self.linear.iter().chain(self.angular.iter()).all(|v| v.is_finite())
    }
}

/// Collects the non-gravitational loads produced during one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceAccumulator {
    pub net_force: Vector3<f64>,
    pub net_moment: Vector3<f64>,
    pub forces: Vec<Force>,
    pub moments: Vec<Moment>,
}

impl ForceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_force(&mut self, force: Force) {
        self.forces.push(force);
    }

    pub fn add_moment(&mut self, moment: Moment) {
        self.moments.push(moment);
    }

    /// Add a resolved force/moment pair under one category
    pub fn add_load(&mut self, load: &ForceMoment, category: ForceCategory) {
        self.add_force(Force {
            vector: load.force,
            point: None,
            category,
        });
        self.add_moment(Moment {
            vector: load.moment,
            category,
        });
    }

    pub fn clear_forces(&mut self) {
        self.forces.clear();
        self.moments.clear();
        self.net_force = Vector3::zeros();
        self.net_moment = Vector3::zeros();
    }

    /// Sum of one category about `cg`
    pub fn category_total(&self, category: ForceCategory, cg: &Vector3<f64>) -> ForceMoment {
        let mut total = ForceMoment::default();
        for force in self.forces.iter().filter(|f| f.category == category) {
            total.force += force.vector;
            if let Some(point) = force.point {
                total.moment += (point - cg).cross(&force.vector);
            }
        }
        for moment in self.moments.iter().filter(|m| m.category == category) {
            total.moment += moment.vector;
        }
        total
    }

    /// Compute and store the net force and moment about `cg`
    pub fn calculate_net_forces_moments(&mut self, cg: &Vector3<f64>) -> ForceMoment {
        let total = ForceCategory::ALL
            .iter()
            .fold(ForceMoment::default(), |acc, category| {
                acc + self.category_total(*category, cg)
            });
        self.net_force = total.force;
        self.net_moment = total.moment;
        total
    }
}
