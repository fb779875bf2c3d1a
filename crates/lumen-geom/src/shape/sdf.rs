//! Signed-distance-field shapes, intersected by ray marching.

use lumen_math::{Ray, Tuple4, EPSILON};
use serde::{Deserialize, Serialize};

use super::cube::box_distance;
use super::LocalHit;
use crate::error::{GeometryError, Result};

/// Ray marching limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchSettings {
    /// A sample closer than this to the surface counts as a hit. Also the
    /// central-difference step for normals.
    pub epsilon: f64,
    /// March distance after which the ray is declared a miss.
    pub max_distance: f64,
    /// Step budget; exhausting it is a miss.
    pub max_steps: u32,
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_distance: 100.0,
            max_steps: 512,
        }
    }
}

/// A distance-function tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdfShape {
    /// Sphere at the origin.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Axis-aligned box centered at the origin.
    Box {
        /// Half extents along x, y and z.
        half_extents: (f64, f64, f64),
    },
    /// `min` of both operands.
    Union(Box<SdfShape>, Box<SdfShape>),
    /// `max` of both operands.
    Intersect(Box<SdfShape>, Box<SdfShape>),
}

impl SdfShape {
    /// Union of two shapes.
    pub fn union(a: SdfShape, b: SdfShape) -> Self {
        SdfShape::Union(Box::new(a), Box::new(b))
    }

    /// Intersection of two shapes.
    pub fn intersect(a: SdfShape, b: SdfShape) -> Self {
        SdfShape::Intersect(Box::new(a), Box::new(b))
    }

    /// Signed distance from `point`; negative inside.
    pub fn distance(&self, point: Tuple4) -> f64 {
        match self {
            SdfShape::Sphere { radius } => (point - Tuple4::origin()).xyz_norm() - radius,
            SdfShape::Box { half_extents } => box_distance(point, *half_extents),
            SdfShape::Union(a, b) => a.distance(point).min(b.distance(point)),
            SdfShape::Intersect(a, b) => a.distance(point).max(b.distance(point)),
        }
    }
}

/// A distance field together with its march settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdfFigure {
    /// Distance function.
    pub shape: SdfShape,
    /// March limits for this figure.
    #[serde(default)]
    pub march: MarchSettings,
}

impl SdfFigure {
    /// Figure with default march settings.
    pub fn new(shape: SdfShape) -> Self {
        Self {
            shape,
            march: MarchSettings::default(),
        }
    }

    /// Override the march settings.
    pub fn with_march(mut self, march: MarchSettings) -> Self {
        self.march = march;
        self
    }

    /// March along `ray` until the field drops below epsilon.
    ///
    /// Steps use `|d|`, so a ray starting inside the field finds the exit
    /// surface. The direction must be unit length.
    pub fn intersect(&self, ray: &Ray) -> Result<Vec<LocalHit>> {
        let len = ray.direction().xyz_norm();
        if (len - 1.0).abs() > EPSILON {
            return Err(GeometryError::UnnormalizedDirection(len));
        }

        let mut t = 0.0;
        for _ in 0..self.march.max_steps {
            let d = self.shape.distance(ray.position(t));
            if d.abs() < self.march.epsilon {
                return Ok(vec![LocalHit::at(t)]);
            }
            t += d.abs();
            if t > self.march.max_distance {
                log::trace!("sdf march left the field at t = {t}");
                return Ok(Vec::new());
            }
        }
        log::trace!("sdf march exhausted {} steps at t = {t}", self.march.max_steps);
        Ok(Vec::new())
    }

    /// Central-difference gradient of the field.
    pub fn normal(&self, point: Tuple4) -> Tuple4 {
        let h = self.march.epsilon;
        let axis = |dx: f64, dy: f64, dz: f64| {
            let offset = Tuple4::vector(dx, dy, dz);
            self.shape.distance(point + offset) - self.shape.distance(point - offset)
        };
        Tuple4::vector(axis(h, 0.0, 0.0), axis(0.0, h, 0.0), axis(0.0, 0.0, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_sphere() -> SdfFigure {
        SdfFigure::new(SdfShape::Sphere { radius: 1.0 })
    }

    fn ray(o: (f64, f64, f64), d: (f64, f64, f64)) -> Ray {
        Ray::new(Tuple4::point(o.0, o.1, o.2), Tuple4::vector(d.0, d.1, d.2)).unwrap()
    }

    #[test]
    fn test_march_hits_sphere_once() {
        let hits = unit_sphere().intersect(&ray((0.0, 0.0, -2.0), (0.0, 0.0, 1.0))).unwrap();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].t, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_march_miss_is_not_an_error() {
        let hits = unit_sphere().intersect(&ray((0.0, 2.0, -2.0), (0.0, 0.0, 1.0))).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_step_budget_exhaustion_is_a_miss() {
        let fig = unit_sphere().with_march(MarchSettings {
            max_steps: 3,
            ..MarchSettings::default()
        });
        let hits = fig.intersect(&ray((0.0, 1.0, -5.0), (0.0, 0.0, 1.0))).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_unnormalized_direction_rejected() {
        let err = unit_sphere().intersect(&ray((0.0, 0.0, -2.0), (0.0, 0.0, 2.0)));
        assert_eq!(err, Err(GeometryError::UnnormalizedDirection(2.0)));
    }

    #[test]
    fn test_march_from_inside_finds_exit() {
        let hits = unit_sphere().intersect(&ray((0.0, 0.0, 0.0), (1.0, 0.0, 0.0))).unwrap();
        assert_abs_diff_eq!(hits[0].t, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_union_and_intersect_fields() {
        let sphere = SdfShape::Sphere { radius: 1.0 };
        let slab = SdfShape::Box { half_extents: (2.0, 0.5, 2.0) };
        let u = SdfShape::union(sphere.clone(), slab.clone());
        let i = SdfShape::intersect(sphere, slab);
        let p = Tuple4::point(1.5, 0.0, 0.0);
        assert!(u.distance(p) < 0.0);
        assert!(i.distance(p) > 0.0);
        assert_abs_diff_eq!(i.distance(Tuple4::point(0.0, 0.5, 0.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_normal() {
        let n = unit_sphere().normal(Tuple4::point(0.0, 1.0, 0.0)).normalize().unwrap();
        assert_eq!(n, Tuple4::vector(0.0, 1.0, 0.0));
        let boxed = SdfFigure::new(SdfShape::Box { half_extents: (1.0, 1.0, 1.0) });
        let n = boxed.normal(Tuple4::point(1.0, 0.2, -0.3)).normalize().unwrap();
        assert_eq!(n, Tuple4::vector(1.0, 0.0, 0.0));
    }
}
