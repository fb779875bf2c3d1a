//! Unit-radius cylinder around the Y axis, optionally truncated and capped.

use lumen_math::{Ray, Tuple4, EPSILON};
use serde::{Deserialize, Serialize};

use super::{combine_bounded, solve_quadratic, LocalHit};

/// Cylinder `x^2 + z^2 = 1`, bounded to the open interval
/// `minimum < y < maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    /// Lower bound on `y` (exclusive).
    pub minimum: f64,
    /// Upper bound on `y` (exclusive).
    pub maximum: f64,
    /// Whether the ends are capped.
    pub closed: bool,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        }
    }
}

impl Cylinder {
    /// Truncated cylinder.
    pub fn new(minimum: f64, maximum: f64, closed: bool) -> Self {
        Self { minimum, maximum, closed }
    }

    /// Wall hits followed by cap hits.
    pub fn intersect(&self, ray: &Ray) -> Vec<LocalHit> {
        let o = ray.origin();
        let d = ray.direction();
        let mut hits = Vec::new();

        let a = d.x * d.x + d.z * d.z;
        // Parallel to the axis: only the caps can be hit.
        if a.abs() >= EPSILON {
            let b = 2.0 * (o.x * d.x + o.z * d.z);
            let c = o.x * o.x + o.z * o.z - 1.0;
            for t in solve_quadratic(a, b, c).unwrap_or_default() {
                let y = o.y + t * d.y;
                if self.minimum < y && y < self.maximum {
                    hits.push(LocalHit::at(t));
                }
            }
        }

        self.intersect_caps(ray, &mut hits);
        hits
    }

    fn intersect_caps(&self, ray: &Ray, hits: &mut Vec<LocalHit>) {
        let d = ray.direction();
        if !self.closed || d.y.abs() < EPSILON {
            return;
        }
        let o = ray.origin();
        for cap in [self.minimum, self.maximum] {
            let t = (cap - o.y) / d.y;
            let x = o.x + t * d.x;
            let z = o.z + t * d.z;
            if x * x + z * z <= 1.0 {
                hits.push(LocalHit::at(t));
            }
        }
    }

    /// `(0, +-1, 0)` on a cap, else the radial `(x, 0, z)`.
    pub fn normal(&self, point: Tuple4) -> Tuple4 {
        let dist = point.x * point.x + point.z * point.z;
        if dist < 1.0 && point.y >= self.maximum - EPSILON {
            Tuple4::vector(0.0, 1.0, 0.0)
        } else if dist < 1.0 && point.y <= self.minimum + EPSILON {
            Tuple4::vector(0.0, -1.0, 0.0)
        } else {
            Tuple4::vector(point.x, 0.0, point.z)
        }
    }

    /// Signed distance to the wall, and to the caps when closed.
    pub fn distance(&self, point: Tuple4) -> f64 {
        let radial = (point.x * point.x + point.z * point.z).sqrt() - 1.0;
        let axial = (point.y - self.maximum).max(self.minimum - point.y);
        if self.closed {
            combine_bounded(radial, axial)
        } else if axial <= 0.0 {
            radial
        } else {
            (radial * radial + axial * axial).sqrt()
        }
    }
}
