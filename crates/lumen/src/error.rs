//! Unified error type for the lumen facade.

use lumen_geom::GeometryError;
use lumen_math::MathError;
use lumen_scene::SceneError;
use thiserror::Error;

/// Any failure surfaced by the lumen crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Tuple or matrix contract violated.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Figure hierarchy or intersection failure.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Shading failure or rejected shading config.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Settings rejected by validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Reading a settings file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML for [`crate::Settings`].
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
