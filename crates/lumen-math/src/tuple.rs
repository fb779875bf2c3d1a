//! Homogeneous 4-component tuples: points (`w = 1`) and vectors (`w = 0`).

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::approx_eq;

/// Flavor of a [`Tuple4`], derived from its `w` component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleKind {
    /// `w = 1`.
    Point,
    /// `w = 0`.
    Vector,
    /// Any other `w` (e.g. the sum of two points).
    Other,
}

impl fmt::Display for TupleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleKind::Point => write!(f, "point"),
            TupleKind::Vector => write!(f, "vector"),
            TupleKind::Other => write!(f, "non-affine tuple"),
        }
    }
}

/// A homogeneous point or vector.
///
/// Equality is epsilon based (see [`crate::EPSILON`]). Operations that only
/// make sense on vectors (`magnitude`, `normalize`, `cross`, `reflect`)
/// return [`MathError::WrongTupleKind`] when handed a point.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Tuple4 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// Homogeneous weight.
    pub w: f64,
}

impl Tuple4 {
    /// Raw tuple constructor.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// A point (`w = 1`).
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// A vector (`w = 0`).
    pub const fn vector(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// The point at the origin.
    pub const fn origin() -> Self {
        Self::point(0.0, 0.0, 0.0)
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::vector(0.0, 0.0, 0.0)
    }

    /// Flavor of this tuple.
    pub fn kind(&self) -> TupleKind {
        if approx_eq(self.w, 1.0) {
            TupleKind::Point
        } else if approx_eq(self.w, 0.0) {
            TupleKind::Vector
        } else {
            TupleKind::Other
        }
    }

    /// True if `w = 1`.
    pub fn is_point(&self) -> bool {
        self.kind() == TupleKind::Point
    }

    /// True if `w = 0`.
    pub fn is_vector(&self) -> bool {
        self.kind() == TupleKind::Vector
    }

    /// Fail with [`MathError::WrongTupleKind`] unless this is a vector.
    pub fn require_vector(&self, op: &'static str) -> Result<()> {
        self.require(op, TupleKind::Vector)
    }

    /// Fail with [`MathError::WrongTupleKind`] unless this is a point.
    pub fn require_point(&self, op: &'static str) -> Result<()> {
        self.require(op, TupleKind::Point)
    }

    fn require(&self, op: &'static str, expected: TupleKind) -> Result<()> {
        let found = self.kind();
        if found == expected {
            Ok(())
        } else {
            Err(MathError::WrongTupleKind { op, expected, found })
        }
    }

    /// Four-component dot product.
    pub fn dot(&self, other: &Tuple4) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Euclidean length of a vector.
    pub fn magnitude(&self) -> Result<f64> {
        self.require_vector("magnitude")?;
        Ok(self.xyz_norm())
    }

    /// Unit vector in the same direction.
    pub fn normalize(&self) -> Result<Tuple4> {
        self.require_vector("normalize")?;
        let len = self.xyz_norm();
        if len == 0.0 {
            return Err(MathError::ZeroLength);
        }
        Ok(Tuple4::vector(self.x / len, self.y / len, self.z / len))
    }

    /// Cross product of two vectors.
    pub fn cross(&self, other: &Tuple4) -> Result<Tuple4> {
        self.require_vector("cross")?;
        other.require_vector("cross")?;
        Ok(Tuple4::vector(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        ))
    }

    /// Reflect this vector around `normal`.
    pub fn reflect(&self, normal: &Tuple4) -> Result<Tuple4> {
        self.require_vector("reflect")?;
        normal.require_vector("reflect")?;
        Ok(*self - *normal * (2.0 * self.dot(normal)))
    }

    /// Copy of this tuple with `w` replaced.
    pub fn with_w(&self, w: f64) -> Tuple4 {
        Tuple4::new(self.x, self.y, self.z, w)
    }

    /// Length of the xyz part, ignoring `w` and flavor.
    pub fn xyz_norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl PartialEq for Tuple4 {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x)
            && approx_eq(self.y, other.y)
            && approx_eq(self.z, other.z)
            && approx_eq(self.w, other.w)
    }
}

impl fmt::Display for Tuple4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Add for Tuple4 {
    type Output = Tuple4;
    fn add(self, rhs: Tuple4) -> Tuple4 {
        Tuple4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Tuple4 {
    type Output = Tuple4;
    fn sub(self, rhs: Tuple4) -> Tuple4 {
        Tuple4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Neg for Tuple4 {
    type Output = Tuple4;
    fn neg(self) -> Tuple4 {
        Tuple4::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Mul<f64> for Tuple4 {
    type Output = Tuple4;
    fn mul(self, k: f64) -> Tuple4 {
        Tuple4::new(self.x * k, self.y * k, self.z * k, self.w * k)
    }
}

impl Mul<Tuple4> for f64 {
    type Output = Tuple4;
    fn mul(self, t: Tuple4) -> Tuple4 {
        t * self
    }
}

impl Div<f64> for Tuple4 {
    type Output = Tuple4;
    fn div(self, k: f64) -> Tuple4 {
        Tuple4::new(self.x / k, self.y / k, self.z / k, self.w / k)
    }
}

impl From<Vector4<f64>> for Tuple4 {
    fn from(v: Vector4<f64>) -> Self {
        Tuple4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Tuple4> for Vector4<f64> {
    fn from(t: Tuple4) -> Self {
        Vector4::new(t.x, t.y, t.z, t.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_w() {
        assert_eq!(Tuple4::point(4.3, -4.2, 3.1).kind(), TupleKind::Point);
        assert_eq!(Tuple4::vector(4.3, -4.2, 3.1).kind(), TupleKind::Vector);
        let sum = Tuple4::point(1.0, 0.0, 0.0) + Tuple4::point(0.0, 1.0, 0.0);
        assert_eq!(sum.kind(), TupleKind::Other);
    }

    #[test]
    fn test_point_minus_point_is_vector() {
        let v = Tuple4::point(3.0, 2.0, 1.0) - Tuple4::point(5.0, 6.0, 7.0);
        assert_eq!(v, Tuple4::vector(-2.0, -4.0, -6.0));
    }

    #[test]
    fn test_epsilon_equality() {
        let a = Tuple4::vector(1.0, 2.0, 3.0);
        let b = Tuple4::vector(1.0 + 1e-6, 2.0, 3.0);
        let c = Tuple4::vector(1.0 + 1e-4, 2.0, 3.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_magnitude_and_normalize() {
        let v = Tuple4::vector(1.0, 2.0, 3.0);
        assert!((v.magnitude().unwrap() - 14f64.sqrt()).abs() < 1e-12);
        let n = v.normalize().unwrap();
        assert!((n.magnitude().unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(Tuple4::vector(4.0, 0.0, 0.0).normalize().unwrap(), Tuple4::vector(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_vector_ops_reject_points() {
        let p = Tuple4::point(1.0, 2.0, 3.0);
        assert!(matches!(
            p.magnitude(),
            Err(MathError::WrongTupleKind { expected: TupleKind::Vector, found: TupleKind::Point, .. })
        ));
        assert!(p.normalize().is_err());
        assert!(p.cross(&Tuple4::vector(1.0, 0.0, 0.0)).is_err());
        assert!(Tuple4::vector(1.0, 0.0, 0.0).cross(&p).is_err());
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Tuple4::zero().normalize(), Err(MathError::ZeroLength));
    }

    #[test]
    fn test_cross_product() {
        let a = Tuple4::vector(1.0, 2.0, 3.0);
        let b = Tuple4::vector(2.0, 3.0, 4.0);
        assert_eq!(a.cross(&b).unwrap(), Tuple4::vector(-1.0, 2.0, -1.0));
        assert_eq!(b.cross(&a).unwrap(), Tuple4::vector(1.0, -2.0, 1.0));
    }

    #[test]
    fn test_reflect_off_slanted_surface() {
        let v = Tuple4::vector(0.0, -1.0, 0.0);
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let n = Tuple4::vector(h, h, 0.0);
        assert_eq!(v.reflect(&n).unwrap(), Tuple4::vector(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_nalgebra_round_trip() {
        let t = Tuple4::point(1.5, -2.0, 0.25);
        let v: Vector4<f64> = t.into();
        assert_eq!(v.w, 1.0);
        assert_eq!(Tuple4::from(v), t);
    }
}
