//! Flat and smooth triangles, intersected with Möller–Trumbore.

use lumen_math::{Ray, Tuple4, EPSILON};
use serde::{Deserialize, Serialize};

use super::LocalHit;
use crate::error::{GeometryError, Result};

/// A flat triangle with precomputed edges and normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    p1: Tuple4,
    p2: Tuple4,
    p3: Tuple4,
    e1: Tuple4,
    e2: Tuple4,
    normal: Tuple4,
}

impl Triangle {
    /// Build from three points. Collinear vertices are rejected.
    pub fn new(p1: Tuple4, p2: Tuple4, p3: Tuple4) -> Result<Self> {
        for p in [p1, p2, p3] {
            p.require_point("triangle vertex")?;
        }
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = match e2.cross(&e1)?.normalize() {
            Ok(n) => n,
            Err(lumen_math::MathError::ZeroLength) => return Err(GeometryError::DegenerateTriangle),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { p1, p2, p3, e1, e2, normal })
    }

    /// Vertices in construction order.
    pub fn vertices(&self) -> [Tuple4; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// `p2 - p1`.
    pub fn e1(&self) -> Tuple4 {
        self.e1
    }

    /// `p3 - p1`.
    pub fn e2(&self) -> Tuple4 {
        self.e2
    }

    /// Unit face normal, `normalize(e2 x e1)`.
    pub fn normal(&self) -> Tuple4 {
        self.normal
    }

    /// At most one hit, carrying the barycentric `(u, v)` of `p2` and `p3`.
    pub fn intersect(&self, ray: &Ray) -> Result<Vec<LocalHit>> {
        let d = ray.direction();
        let dir_cross_e2 = d.cross(&self.e2)?;
        let det = self.e1.dot(&dir_cross_e2);
        if det.abs() < EPSILON {
            return Ok(Vec::new());
        }

        let f = 1.0 / det;
        let p1_to_origin = ray.origin() - self.p1;
        let u = f * p1_to_origin.dot(&dir_cross_e2);
        if !(0.0..=1.0).contains(&u) {
            return Ok(Vec::new());
        }

        let origin_cross_e1 = p1_to_origin.cross(&self.e1)?;
        let v = f * d.dot(&origin_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return Ok(Vec::new());
        }

        let t = f * self.e2.dot(&origin_cross_e1);
        Ok(vec![LocalHit { t, uv: Some((u, v)) }])
    }

    /// Barycentric `(u, v)` of the projection of `point` onto the plane.
    pub fn barycentric(&self, point: Tuple4) -> (f64, f64) {
        let w = point - self.p1;
        let d00 = self.e1.dot(&self.e1);
        let d01 = self.e1.dot(&self.e2);
        let d11 = self.e2.dot(&self.e2);
        let d20 = w.dot(&self.e1);
        let d21 = w.dot(&self.e2);
        let denom = d00 * d11 - d01 * d01;
        let u = (d11 * d20 - d01 * d21) / denom;
        let v = (d00 * d21 - d01 * d20) / denom;
        (u, v)
    }

    /// Unsigned distance from `point` to the closest point of the triangle.
    pub fn distance(&self, point: Tuple4) -> f64 {
        (point - self.closest_point(point)).xyz_norm()
    }

    fn closest_point(&self, p: Tuple4) -> Tuple4 {
        let (a, b, c) = (self.p1, self.p2, self.p3);
        let ab = self.e1;
        let ac = self.e2;

        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
        }

        let denom = 1.0 / (va + vb + vc);
        a + ab * (vb * denom) + ac * (vc * denom)
    }
}

/// A triangle whose normal is interpolated from per-vertex normals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothTriangle {
    flat: Triangle,
    n1: Tuple4,
    n2: Tuple4,
    n3: Tuple4,
}

impl SmoothTriangle {
    /// Build from vertices and their normals.
    pub fn new(
        p1: Tuple4,
        p2: Tuple4,
        p3: Tuple4,
        n1: Tuple4,
        n2: Tuple4,
        n3: Tuple4,
    ) -> Result<Self> {
        for n in [n1, n2, n3] {
            n.require_vector("vertex normal")?;
        }
        Ok(Self {
            flat: Triangle::new(p1, p2, p3)?,
            n1,
            n2,
            n3,
        })
    }

    /// Underlying flat triangle.
    pub fn flat(&self) -> &Triangle {
        &self.flat
    }

    /// Same hit test as the flat triangle.
    pub fn intersect(&self, ray: &Ray) -> Result<Vec<LocalHit>> {
        self.flat.intersect(ray)
    }

    /// `n2 * u + n3 * v + n1 * (1 - u - v)`. Without a hit's `uv` the
    /// coordinates are recovered from `point`.
    pub fn normal(&self, point: Tuple4, uv: Option<(f64, f64)>) -> Tuple4 {
        let (u, v) = uv.unwrap_or_else(|| self.flat.barycentric(point));
        self.n2 * u + self.n3 * v + self.n1 * (1.0 - u - v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ray;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Tuple4::point(0.0, 1.0, 0.0),
            Tuple4::point(-1.0, 0.0, 0.0),
            Tuple4::point(1.0, 0.0, 0.0),
        )
        .unwrap()
    }

    fn smooth() -> SmoothTriangle {
        SmoothTriangle::new(
            Tuple4::point(0.0, 1.0, 0.0),
            Tuple4::point(-1.0, 0.0, 0.0),
            Tuple4::point(1.0, 0.0, 0.0),
            Tuple4::vector(0.0, 1.0, 0.0),
            Tuple4::vector(-1.0, 0.0, 0.0),
            Tuple4::vector(1.0, 0.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_precomputed_edges_and_normal() {
        let t = unit_triangle();
        assert_eq!(t.e1(), Tuple4::vector(-1.0, -1.0, 0.0));
        assert_eq!(t.e2(), Tuple4::vector(1.0, -1.0, 0.0));
        assert_eq!(t.normal(), Tuple4::vector(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let err = Triangle::new(
            Tuple4::point(0.0, 0.0, 0.0),
            Tuple4::point(1.0, 1.0, 1.0),
            Tuple4::point(2.0, 2.0, 2.0),
        );
        assert_eq!(err, Err(GeometryError::DegenerateTriangle));
    }

    #[test]
    fn test_parallel_ray_misses() {
        let hits = unit_triangle().intersect(&ray((0.0, -1.0, -2.0), (0.0, 1.0, 0.0))).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_ray_misses_each_edge() {
        let t = unit_triangle();
        for origin in [(1.0, 1.0, -2.0), (-1.0, 1.0, -2.0), (0.0, -1.0, -2.0)] {
            assert!(t.intersect(&ray(origin, (0.0, 0.0, 1.0))).unwrap().is_empty());
        }
    }

    #[test]
    fn test_ray_strikes_triangle() {
        let hits = unit_triangle().intersect(&ray((0.0, 0.5, -2.0), (0.0, 0.0, 1.0))).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_hit_stores_uv() {
        let hits = smooth().intersect(&ray((-0.2, 0.3, -2.0), (0.0, 0.0, 1.0))).unwrap();
        let (u, v) = hits[0].uv.unwrap();
        assert!((u - 0.45).abs() < 1e-5);
        assert!((v - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_smooth_normal_interpolates() {
        let n = smooth().normal(Tuple4::origin(), Some((0.45, 0.25)));
        assert_eq!(n, Tuple4::vector(-0.2, 0.3, 0.0));
        assert_eq!(n.normalize().unwrap(), Tuple4::vector(-0.5547, 0.83205, 0.0));
    }

    #[test]
    fn test_smooth_normal_without_uv_uses_point() {
        let tri = smooth();
        let n = tri.normal(Tuple4::point(-0.2, 0.3, 0.0), None);
        assert_eq!(n, tri.normal(Tuple4::origin(), Some((0.45, 0.25))));
    }

    #[test]
    fn test_distance_to_closest_feature() {
        let t = unit_triangle();
        assert!(t.distance(Tuple4::point(0.0, 0.5, 0.0)).abs() < 1e-12);
        assert!((t.distance(Tuple4::point(0.0, 0.5, 3.0)) - 3.0).abs() < 1e-12);
        assert!((t.distance(Tuple4::point(0.0, 3.0, 0.0)) - 2.0).abs() < 1e-12);
        assert!((t.distance(Tuple4::point(0.0, -2.0, 0.0)) - 2.0).abs() < 1e-12);
    }
}
