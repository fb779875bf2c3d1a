//! Error types for scene shading.

use lumen_geom::GeometryError;
use lumen_math::MathError;
use thiserror::Error;

/// Errors raised while configuring or shading a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Figure lookup, hierarchy or intersection failure.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Algebra contract violated during shading.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Shading configuration rejected by validation.
    #[error("invalid shading config: {0}")]
    InvalidConfig(String),
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
