use nalgebra::{Matrix3, Vector3};

use crate::components::{FuelTank, MassAggregate, MassConfig};
use crate::utils::constants::STANDARD_GRAVITY;

/// Inertia of a point mass `mass` displaced by `offset` from the reference
fn parallel_axis(mass: f64, offset: &Vector3<f64>) -> Matrix3<f64> {
    mass * (Matrix3::identity() * offset.norm_squared() - offset * offset.transpose())
}

/// Aggregate the structure, payload and fuel into whole-vehicle mass properties.
///
/// The CG is the mass-weighted centroid of every item (the structure sits at its
/// empty CG) and the inertia is taken about that CG by the parallel-axis theorem.
pub fn calculate_mass_properties(config: &MassConfig, tanks: &[FuelTank]) -> MassAggregate {
    let items: Vec<(f64, Vector3<f64>)> = std::iter::once((config.empty_mass(), config.empty_cg))
        .chain(
            config
                .point_masses
                .iter()
                .map(|p| (p.weight / STANDARD_GRAVITY, p.location)),
        )
        .chain(
            tanks
                .iter()
                .map(|t| (t.contents / STANDARD_GRAVITY, t.location)),
        )
        .collect();

    let mass: f64 = items.iter().map(|(m, _)| m).sum();
    let moment: Vector3<f64> = items.iter().map(|(m, r)| *m * r).sum();
    let cg = moment / mass;

    let inertia = items
        .iter()
        .skip(1)
        .fold(
            config.inertia_tensor() + parallel_axis(items[0].0, &(items[0].1 - cg)),
            |acc, (m, r)| acc + parallel_axis(*m, &(r - cg)),
        );
    // A validated configuration has an invertible empty tensor and point masses only add to it
    let inertia_inv = inertia.try_inverse().unwrap_or_else(Matrix3::zeros);

    MassAggregate {
        mass,
        weight: mass * STANDARD_GRAVITY,
        empty_weight: config.empty_weight,
        cg,
        inertia,
        inertia_inv,
    }
}
