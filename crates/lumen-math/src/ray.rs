//! Rays: an origin point and a direction vector.

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::matrix4::Matrix4;
use crate::tuple::Tuple4;

/// An immutable ray. The origin is always a point and the direction always
/// a vector; [`Ray::new`] checks both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ray {
    origin: Tuple4,
    direction: Tuple4,
}

impl Ray {
    /// Create a ray, rejecting a non-point origin or a non-vector direction.
    pub fn new(origin: Tuple4, direction: Tuple4) -> Result<Self> {
        origin.require_point("ray origin")?;
        direction.require_vector("ray direction")?;
        Ok(Self { origin, direction })
    }

    /// Origin point.
    pub fn origin(&self) -> Tuple4 {
        self.origin
    }

    /// Direction vector (not necessarily unit length).
    pub fn direction(&self) -> Tuple4 {
        self.direction
    }

    /// Point at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn position(&self, t: f64) -> Tuple4 {
        self.origin + self.direction * t
    }

    /// Apply `m` to both origin and direction.
    ///
    /// Affine matrices keep `w` intact, so the result is still a valid ray.
    /// [`crate::Transform`] only ever holds affine matrices.
    pub fn transform(&self, m: &Matrix4) -> Ray {
        Ray {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }

    /// Same origin, unit-length direction, plus the original direction's
    /// length. `None` for a zero-length direction.
    pub fn normalized(&self) -> Option<(Ray, f64)> {
        let len = self.direction.xyz_norm();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some((
            Ray {
                origin: self.origin,
                direction: self.direction / len,
            },
            len,
        ))
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ray {{origin: {}, direction: {}}}", self.origin, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;

    #[test]
    fn test_ray_checks_flavors() {
        assert!(Ray::new(Tuple4::point(1.0, 2.0, 3.0), Tuple4::vector(4.0, 5.0, 6.0)).is_ok());
        assert!(matches!(
            Ray::new(Tuple4::vector(1.0, 2.0, 3.0), Tuple4::vector(4.0, 5.0, 6.0)),
            Err(MathError::WrongTupleKind { .. })
        ));
        assert!(Ray::new(Tuple4::point(1.0, 2.0, 3.0), Tuple4::point(4.0, 5.0, 6.0)).is_err());
    }

    #[test]
    fn test_position() {
        let r = Ray::new(Tuple4::point(2.0, 3.0, 4.0), Tuple4::vector(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(r.position(0.0), Tuple4::point(2.0, 3.0, 4.0));
        assert_eq!(r.position(1.0), Tuple4::point(3.0, 3.0, 4.0));
        assert_eq!(r.position(-1.0), Tuple4::point(1.0, 3.0, 4.0));
        assert_eq!(r.position(2.5), Tuple4::point(4.5, 3.0, 4.0));
    }

    #[test]
    fn test_translate_ray() {
        let r = Ray::new(Tuple4::point(1.0, 2.0, 3.0), Tuple4::vector(0.0, 1.0, 0.0)).unwrap();
        let r2 = r.transform(&Matrix4::translation(3.0, 4.0, 5.0));
        assert_eq!(r2.origin(), Tuple4::point(4.0, 6.0, 8.0));
        assert_eq!(r2.direction(), Tuple4::vector(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_scale_ray() {
        let r = Ray::new(Tuple4::point(1.0, 2.0, 3.0), Tuple4::vector(0.0, 1.0, 0.0)).unwrap();
        let r2 = r.transform(&Matrix4::scaling(2.0, 3.0, 4.0));
        assert_eq!(r2.origin(), Tuple4::point(2.0, 6.0, 12.0));
        assert_eq!(r2.direction(), Tuple4::vector(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_normalized_reports_length() {
        let r = Ray::new(Tuple4::point(0.0, 0.0, 0.0), Tuple4::vector(0.0, 0.0, 0.5)).unwrap();
        let (unit, len) = r.normalized().unwrap();
        assert_eq!(unit.direction(), Tuple4::vector(0.0, 0.0, 1.0));
        assert!((len - 0.5).abs() < 1e-12);
        let zero = Ray::new(Tuple4::origin(), Tuple4::zero()).unwrap();
        assert!(zero.normalized().is_none());
    }
}
