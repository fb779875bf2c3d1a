//! Shading configuration threaded explicitly through a [`crate::Scene`].

use log::warn;
use lumen_math::Color;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

/// Deepest reflection/refraction recursion accepted by [`ShadingConfig::clamped`].
pub const MAX_RECURSION_DEPTH: u32 = 64;

/// White point of the output color space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorModel {
    /// Channel value of pure white.
    pub white: f64,
}

impl ColorModel {
    /// Channels in `[0, 1]`.
    pub const fn normalized() -> Self {
        Self { white: 1.0 }
    }

    /// Channels in `[0, 255]`.
    pub const fn rgb8() -> Self {
        Self { white: 255.0 }
    }

    /// Cap every channel to `[0, white]`.
    pub fn clamp(&self, color: Color) -> Color {
        color.clamp(self.white)
    }

    /// Rescale a color from this model into `[0, 1]`.
    pub fn to_unit(&self, color: Color) -> Color {
        color * (1.0 / self.white)
    }
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::normalized()
    }
}

/// Scene-wide shading parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Output white point.
    pub color_model: ColorModel,
    /// Reflection/refraction bounces allowed per primary ray.
    pub max_depth: u32,
    /// Offset applied to secondary ray origins to avoid self-intersection.
    pub shadow_bias: f64,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            color_model: ColorModel::default(),
            max_depth: 5,
            shadow_bias: 1e-5,
        }
    }
}

impl ShadingConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.color_model.white.is_finite() && self.color_model.white > 0.0) {
            return Err(SceneError::InvalidConfig(
                "color_model.white must be positive and finite".into(),
            ));
        }
        if !(self.shadow_bias.is_finite() && self.shadow_bias >= 0.0) {
            return Err(SceneError::InvalidConfig(
                "shadow_bias must be non-negative and finite".into(),
            ));
        }
        Ok(())
    }

    /// Copy with `max_depth` capped at [`MAX_RECURSION_DEPTH`].
    pub fn clamped(mut self) -> Self {
        if self.max_depth > MAX_RECURSION_DEPTH {
            warn!(
                "max_depth {} exceeds {MAX_RECURSION_DEPTH}, clamping",
                self.max_depth
            );
            self.max_depth = MAX_RECURSION_DEPTH;
        }
        self
    }
}
