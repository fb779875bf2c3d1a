//! The XZ plane, `y = 0`.

use lumen_math::{Ray, Tuple4, EPSILON};

use super::LocalHit;

/// Single hit at `t = -O.y / D.y`; none for a parallel or coplanar ray.
pub fn intersect_plane(ray: &Ray) -> Vec<LocalHit> {
    let d = ray.direction();
    if d.y.abs() < EPSILON {
        return Vec::new();
    }
    vec![LocalHit::at(-ray.origin().y / d.y)]
}

/// Constant `+Y`.
pub fn plane_normal(_point: Tuple4) -> Tuple4 {
    Tuple4::vector(0.0, 1.0, 0.0)
}

/// Height above the plane.
pub fn plane_distance(point: Tuple4) -> f64 {
    point.y
}
