//! Surface materials and the pattern capability they sample.

use std::fmt;
use std::sync::Arc;

use lumen_math::{Color, Tuple4};

/// Color as a function of an object-space point.
pub trait Pattern: fmt::Debug + Send + Sync {
    /// Color at `point`, given in the owning figure's object space.
    fn color_at(&self, point: Tuple4) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidPattern(pub Color);

impl Pattern for SolidPattern {
    fn color_at(&self, _point: Tuple4) -> Color {
        self.0
    }
}

/// Phong coefficients plus reflection and refraction parameters.
#[derive(Debug, Clone)]
pub struct Material {
    /// Surface color source.
    pub pattern: Arc<dyn Pattern>,
    /// Ambient reflection coefficient.
    pub ambient: f64,
    /// Diffuse reflection coefficient.
    pub diffuse: f64,
    /// Specular reflection coefficient.
    pub specular: f64,
    /// Specular exponent.
    pub shininess: f64,
    /// Mirror reflectance, `0` for none.
    pub reflective: f64,
    /// Fraction of light transmitted, `0` for opaque.
    pub transparency: f64,
    /// Index of refraction.
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            pattern: Arc::new(SolidPattern(Color::white())),
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Default material with a solid color.
    pub fn solid(color: Color) -> Self {
        Self::default().with_pattern(SolidPattern(color))
    }

    /// Fully transparent glass, index 1.5.
    pub fn glass() -> Self {
        Self {
            transparency: 1.0,
            refractive_index: 1.5,
            ..Self::default()
        }
    }

    /// Replace the pattern.
    pub fn with_pattern(mut self, pattern: impl Pattern + 'static) -> Self {
        self.pattern = Arc::new(pattern);
        self
    }

    /// Color at an object-space point.
    pub fn color_at(&self, point: Tuple4) -> Color {
        self.pattern.color_at(point)
    }
}
