//! Unit sphere at the origin.

use lumen_math::{Ray, Tuple4};

use super::{solve_quadratic, LocalHit};

/// Solve `|O + tD|^2 = 1`: zero, one (tangent) or two hits.
pub fn intersect_sphere(ray: &Ray) -> Vec<LocalHit> {
    let oc = ray.origin() - Tuple4::origin();
    let d = ray.direction();

    let a = d.dot(&d);
    let b = 2.0 * d.dot(&oc);
    let c = oc.dot(&oc) - 1.0;

    solve_quadratic(a, b, c)
        .map(|roots| roots.into_iter().map(LocalHit::at).collect())
        .unwrap_or_default()
}

/// Radial normal `P - origin`.
pub fn sphere_normal(point: Tuple4) -> Tuple4 {
    point - Tuple4::origin()
}

/// `|P| - 1`.
pub fn sphere_distance(point: Tuple4) -> f64 {
    (point - Tuple4::origin()).xyz_norm() - 1.0
}
