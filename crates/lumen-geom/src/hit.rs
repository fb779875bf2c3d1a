//! Shading-ready description of a single intersection.

use lumen_math::{Ray, Tuple4};

use crate::arena::FigureArena;
use crate::error::Result;
use crate::figure::FigureId;
use crate::intersection::Intersection;

/// Everything shading needs about one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Ray parameter of the hit.
    pub t: f64,
    /// Primitive that was hit.
    pub figure: FigureId,
    /// World-space hit point.
    pub point: Tuple4,
    /// `point` lifted off the surface along the normal; shadow and
    /// reflection rays start here.
    pub over_point: Tuple4,
    /// `point` pushed below the surface; refraction rays start here.
    pub under_point: Tuple4,
    /// Unit normal, flipped to face the eye.
    pub normal: Tuple4,
    /// Unit vector back toward the ray origin.
    pub eye: Tuple4,
    /// Ray direction reflected about `normal`.
    pub reflectv: Tuple4,
    /// True when the ray started inside the figure.
    pub inside: bool,
    /// Refractive index on the incoming side.
    pub n1: f64,
    /// Refractive index on the outgoing side.
    pub n2: f64,
}

impl HitResult {
    /// Derive the shading vectors for `hit` on `ray`.
    ///
    /// Refractive indices start at `1.0`; see [`HitResult::with_indices`].
    pub fn prepare(arena: &FigureArena, hit: &Intersection, ray: &Ray, bias: f64) -> Result<Self> {
        let point = ray.position(hit.t);
        let direction = ray.direction().normalize()?;
        let eye = -direction;

        let mut normal = arena.normal_at(hit.figure, point, hit.uv)?;
        let inside = normal.dot(&eye) < 0.0;
        if inside {
            normal = -normal;
        }

        Ok(Self {
            t: hit.t,
            figure: hit.figure,
            point,
            over_point: point + normal * bias,
            under_point: point - normal * bias,
            normal,
            eye,
            reflectv: direction.reflect(&normal)?,
            inside,
            n1: 1.0,
            n2: 1.0,
        })
    }

    /// Attach the refractive indices on either side of the surface.
    pub fn with_indices(mut self, n1: f64, n2: f64) -> Self {
        self.n1 = n1;
        self.n2 = n2;
        self
    }
}
