//! Affine transform with its inverse and inverse-transpose cached.
//!
//! A [`Transform`] is built once and replaced wholesale; the three matrices
//! are never observable out of sync.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::matrix4::Matrix4;
use crate::ray::Ray;
use crate::tuple::Tuple4;

/// A world-from-object affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Matrix4", into = "Matrix4")]
pub struct Transform {
    matrix: Matrix4,
    inverse: Matrix4,
    inverse_transpose: Matrix4,
    identity: bool,
}

impl Transform {
    /// Wrap `matrix`. Fails with [`MathError::NotAffine`] unless the bottom
    /// row is `[0, 0, 0, 1]`, and with [`MathError::Singular`] if it has no
    /// inverse.
    pub fn new(matrix: Matrix4) -> Result<Self> {
        if !matrix.is_affine() {
            return Err(MathError::NotAffine);
        }
        let inverse = matrix.inverse()?;
        Ok(Self {
            matrix,
            inverse,
            inverse_transpose: inverse.transpose(),
            identity: matrix.is_identity(),
        })
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            inverse: Matrix4::identity(),
            inverse_transpose: Matrix4::identity(),
            identity: true,
        }
    }

    /// Object-to-world matrix.
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// World-to-object matrix.
    pub fn inverse(&self) -> &Matrix4 {
        &self.inverse
    }

    /// Matrix used to carry object-space normals into world space.
    pub fn inverse_transpose(&self) -> &Matrix4 {
        &self.inverse_transpose
    }

    /// True when the wrapped matrix is (within epsilon) the identity.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Map a world-space point or vector into object space.
    pub fn to_object(&self, t: Tuple4) -> Tuple4 {
        self.inverse * t
    }

    /// Map an object-space point or vector into world space.
    pub fn to_world(&self, t: Tuple4) -> Tuple4 {
        self.matrix * t
    }

    /// Map a world-space ray into object space.
    pub fn ray_to_object(&self, ray: &Ray) -> Ray {
        ray.transform(&self.inverse)
    }

    /// Carry an object-space normal into world space.
    ///
    /// The inverse-transpose leaks translation into `w`; it is forced back to
    /// zero before normalizing.
    pub fn normal_to_world(&self, normal: Tuple4) -> Result<Tuple4> {
        normal.require_vector("normal_to_world")?;
        (self.inverse_transpose * normal).with_w(0.0).normalize()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<Matrix4> for Transform {
    type Error = MathError;

    fn try_from(m: Matrix4) -> Result<Self> {
        Transform::new(m)
    }
}

impl From<Transform> for Matrix4 {
    fn from(t: Transform) -> Self {
        t.matrix
    }
}
