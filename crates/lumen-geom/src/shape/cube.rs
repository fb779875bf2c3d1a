//! Axis-aligned cube spanning `[-1, 1]^3`, intersected with the slab method.

use lumen_math::{Ray, Tuple4, EPSILON};

use super::LocalHit;

/// Entry/exit parameters of the slab `[-1, 1]` along one axis.
///
/// A ray parallel to the slab either lies inside it for all `t` or misses.
fn check_axis(origin: f64, direction: f64) -> (f64, f64) {
    let tmin_numerator = -1.0 - origin;
    let tmax_numerator = 1.0 - origin;

    if direction.abs() < EPSILON {
        return if tmin_numerator <= 0.0 && tmax_numerator >= 0.0 {
            (f64::NEG_INFINITY, f64::INFINITY)
        } else {
            (f64::INFINITY, f64::NEG_INFINITY)
        };
    }

    let tmin = tmin_numerator / direction;
    let tmax = tmax_numerator / direction;
    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

/// Two hits where the ray enters and leaves the cube, or none.
pub fn intersect_cube(ray: &Ray) -> Vec<LocalHit> {
    let o = ray.origin();
    let d = ray.direction();

    let (xmin, xmax) = check_axis(o.x, d.x);
    let (ymin, ymax) = check_axis(o.y, d.y);
    let (zmin, zmax) = check_axis(o.z, d.z);

    let tmin = xmin.max(ymin).max(zmin);
    let tmax = xmax.min(ymax).min(zmax);

    if tmin > tmax {
        return Vec::new();
    }
    vec![LocalHit::at(tmin), LocalHit::at(tmax)]
}

/// Normal of the face whose axis has the largest absolute coordinate.
pub fn cube_normal(point: Tuple4) -> Tuple4 {
    let (ax, ay, az) = (point.x.abs(), point.y.abs(), point.z.abs());
    let maxc = ax.max(ay).max(az);

    if maxc == ax {
        Tuple4::vector(point.x.signum(), 0.0, 0.0)
    } else if maxc == ay {
        Tuple4::vector(0.0, point.y.signum(), 0.0)
    } else {
        Tuple4::vector(0.0, 0.0, point.z.signum())
    }
}

/// Signed box distance with unit half extents.
pub fn cube_distance(point: Tuple4) -> f64 {
    box_distance(point, (1.0, 1.0, 1.0))
}

pub(crate) fn box_distance(point: Tuple4, half: (f64, f64, f64)) -> f64 {
    let qx = point.x.abs() - half.0;
    let qy = point.y.abs() - half.1;
    let qz = point.z.abs() - half.2;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2) + qz.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).max(qz).min(0.0)
}
