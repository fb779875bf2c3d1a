//! Double-napped cone `x^2 - y^2 + z^2 = 0` with its apex at the origin.

use std::f64::consts::SQRT_2;

use lumen_math::{Ray, Tuple4, EPSILON};
use serde::{Deserialize, Serialize};

use super::{combine_bounded, solve_quadratic, LocalHit};

/// Cone bounded to the open interval `minimum < y < maximum`. A cap at
/// height `y` has radius `|y|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Lower bound on `y` (exclusive).
    pub minimum: f64,
    /// Upper bound on `y` (exclusive).
    pub maximum: f64,
    /// Whether the ends are capped.
    pub closed: bool,
}

impl Default for Cone {
    fn default() -> Self {
        Self {
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            closed: false,
        }
    }
}

impl Cone {
    /// Truncated cone.
    pub fn new(minimum: f64, maximum: f64, closed: bool) -> Self {
        Self { minimum, maximum, closed }
    }

    /// Wall hits followed by cap hits.
    pub fn intersect(&self, ray: &Ray) -> Vec<LocalHit> {
        let o = ray.origin();
        let d = ray.direction();

        let a = d.x * d.x - d.y * d.y + d.z * d.z;
        let b = 2.0 * (o.x * d.x - o.y * d.y + o.z * d.z);
        let c = o.x * o.x - o.y * o.y + o.z * o.z;

        let roots = if a.abs() < EPSILON {
            if b.abs() < EPSILON {
                Vec::new()
            } else {
                // Parallel to one nappe: a single crossing of the other.
                vec![-c / (2.0 * b)]
            }
        } else {
            solve_quadratic(a, b, c).unwrap_or_default()
        };

        let mut hits: Vec<LocalHit> = roots
            .into_iter()
            .filter(|t| {
                let y = o.y + t * d.y;
                self.minimum < y && y < self.maximum
            })
            .map(LocalHit::at)
            .collect();

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
            if x * x + z * z <= cap * cap {
                hits.push(LocalHit::at(t));
            }
        }
    }

    /// `(0, +-1, 0)` on a cap, else `(x, -+sqrt(x^2 + z^2), z)` with the
    /// middle component signed opposite to `y`.
    pub fn normal(&self, point: Tuple4) -> Tuple4 {
        let dist = point.x * point.x + point.z * point.z;
        if dist < self.maximum * self.maximum && point.y >= self.maximum - EPSILON {
            return Tuple4::vector(0.0, 1.0, 0.0);
        }
        if dist < self.minimum * self.minimum && point.y <= self.minimum + EPSILON {
            return Tuple4::vector(0.0, -1.0, 0.0);
        }
        let mut y = dist.sqrt();
        if point.y > 0.0 {
            y = -y;
        }
        Tuple4::vector(point.x, y, point.z)
    }

    /// Signed distance to the wall, and to the caps when closed.
    pub fn distance(&self, point: Tuple4) -> f64 {
        let r = (point.x * point.x + point.z * point.z).sqrt();
        let wall = (r - point.y.abs()) / SQRT_2;
        let axial = (point.y - self.maximum).max(self.minimum - point.y);
        if self.closed {
            combine_bounded(wall, axial)
        } else if axial <= 0.0 {
            wall
        } else {
            (wall * wall + axial * axial).sqrt()
        }
    }
}
