//! Object-space primitives.
//!
//! Each primitive has a dedicated module with its closed-form (or marched)
//! intersection, its local normal and an unscaled signed surface distance.
//! All of them assume the ray has already been carried into object space
//! with a unit direction; see [`crate::FigureArena::intersect`].

mod cone;
mod cube;
mod cylinder;
mod plane;
mod sdf;
mod sphere;
mod triangle;

pub use cone::Cone;
pub use cube::{cube_distance, cube_normal, intersect_cube};
pub use cylinder::Cylinder;
pub use plane::{intersect_plane, plane_distance, plane_normal};
pub use sdf::{MarchSettings, SdfFigure, SdfShape};
pub use sphere::{intersect_sphere, sphere_distance, sphere_normal};
pub use triangle::{SmoothTriangle, Triangle};

use lumen_math::{Ray, Tuple4};

use crate::error::Result;

/// A raw object-space intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHit {
    /// Parameter along the (unit-direction) object ray.
    pub t: f64,
    /// Barycentric `(u, v)` for triangles.
    pub uv: Option<(f64, f64)>,
}

impl LocalHit {
    /// Hit without surface parameters.
    pub const fn at(t: f64) -> Self {
        Self { t, uv: None }
    }
}

/// Closed set of primitive kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Unit sphere at the origin.
    Sphere,
    /// The XZ plane.
    Plane,
    /// Axis-aligned cube spanning `[-1, 1]` on every axis.
    Cube,
    /// Unit-radius cylinder around the Y axis.
    Cylinder(Cylinder),
    /// Double-napped cone around the Y axis, apex at the origin.
    Cone(Cone),
    /// Flat triangle.
    Triangle(Triangle),
    /// Triangle with per-vertex normals.
    SmoothTriangle(SmoothTriangle),
    /// Ray-marched signed distance field.
    Sdf(SdfFigure),
}

impl Shape {
    /// Intersect an object-space ray. Hits are unsorted and may have
    /// negative `t`.
    pub fn local_intersect(&self, ray: &Ray) -> Result<Vec<LocalHit>> {
        Ok(match self {
            Shape::Sphere => intersect_sphere(ray),
            Shape::Plane => intersect_plane(ray),
            Shape::Cube => intersect_cube(ray),
            Shape::Cylinder(c) => c.intersect(ray),
            Shape::Cone(c) => c.intersect(ray),
            Shape::Triangle(t) => t.intersect(ray)?,
            Shape::SmoothTriangle(t) => t.intersect(ray)?,
            Shape::Sdf(s) => s.intersect(ray)?,
        })
    }

    /// Object-space normal at `point`. Not necessarily unit length.
    ///
    /// `uv` is only consulted by smooth triangles; without it they recover
    /// the barycentric coordinates from the point.
    pub fn local_normal(&self, point: Tuple4, uv: Option<(f64, f64)>) -> Tuple4 {
        match self {
            Shape::Sphere => sphere_normal(point),
            Shape::Plane => plane_normal(point),
            Shape::Cube => cube_normal(point),
            Shape::Cylinder(c) => c.normal(point),
            Shape::Cone(c) => c.normal(point),
            Shape::Triangle(t) => t.normal(),
            Shape::SmoothTriangle(t) => t.normal(point, uv),
            Shape::Sdf(s) => s.normal(point),
        }
    }

    /// Signed object-space distance from `point` to the surface.
    pub fn surface_distance(&self, point: Tuple4) -> f64 {
        match self {
            Shape::Sphere => sphere_distance(point),
            Shape::Plane => plane_distance(point),
            Shape::Cube => cube_distance(point),
            Shape::Cylinder(c) => c.distance(point),
            Shape::Cone(c) => c.distance(point),
            Shape::Triangle(t) => t.distance(point),
            Shape::SmoothTriangle(t) => t.flat().distance(point),
            Shape::Sdf(s) => s.shape.distance(point),
        }
    }

    /// Short lowercase name, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Plane => "plane",
            Shape::Cube => "cube",
            Shape::Cylinder(_) => "cylinder",
            Shape::Cone(_) => "cone",
            Shape::Triangle(_) => "triangle",
            Shape::SmoothTriangle(_) => "smooth triangle",
            Shape::Sdf(_) => "sdf",
        }
    }
}

/// Roots of `a t^2 + b t + c`, ascending. `None` when the discriminant is
/// negative; a single root when it is exactly zero.
pub(crate) fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<Vec<f64>> {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    if disc == 0.0 {
        return Some(vec![-b / (2.0 * a)]);
    }
    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    Some(if t0 <= t1 { vec![t0, t1] } else { vec![t1, t0] })
}

/// Length of `(x, y)` clamped component-wise at zero, plus the interior
/// term: the 2D box-style combination used by bounded quadrics.
pub(crate) fn combine_bounded(radial: f64, axial: f64) -> f64 {
    let outside = (radial.max(0.0).powi(2) + axial.max(0.0).powi(2)).sqrt();
    outside + radial.max(axial).min(0.0)
}

#[cfg(test)]
pub(crate) fn ray(origin: (f64, f64, f64), direction: (f64, f64, f64)) -> Ray {
    let d = Tuple4::vector(direction.0, direction.1, direction.2);
    let d = d.normalize().unwrap_or(d);
    Ray::new(Tuple4::point(origin.0, origin.1, origin.2), d).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_roots_sorted() {
        assert_eq!(solve_quadratic(1.0, 0.0, -4.0), Some(vec![-2.0, 2.0]));
        assert_eq!(solve_quadratic(-1.0, 0.0, 4.0), Some(vec![-2.0, 2.0]));
        assert_eq!(solve_quadratic(1.0, -2.0, 1.0), Some(vec![1.0]));
        assert_eq!(solve_quadratic(1.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_dispatch_matches_free_functions() {
        let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));
        let hits = Shape::Sphere.local_intersect(&r).unwrap();
        assert_eq!(hits, intersect_sphere(&r));
        assert_eq!(Shape::Cube.name(), "cube");
    }
}
