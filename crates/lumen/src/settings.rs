//! Renderer settings loaded from TOML.
//!
//! ```toml
//! [shading]
//! max_depth = 8
//! shadow_bias = 1e-4
//!
//! [shading.color_model]
//! white = 255.0
//!
//! [march]
//! max_steps = 1024
//! ```
//!
//! Every key is optional; missing ones take their defaults.

use std::path::Path;

use log::debug;
use lumen_geom::{FigureArena, FigureId, MarchSettings, SdfFigure, SdfShape, Shape};
use lumen_scene::{Scene, ShadingConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shading and ray-marching parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scene shading parameters.
    pub shading: ShadingConfig,
    /// Limits applied to signed-distance figures built through
    /// [`Settings::sdf`] and [`Settings::insert_sdf`].
    pub march: MarchSettings,
}

impl Settings {
    /// Parse and validate settings from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&text)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check shading and march limits.
    pub fn validate(&self) -> Result<()> {
        self.shading.validate()?;
        let march = &self.march;
        if !(march.epsilon.is_finite() && march.epsilon > 0.0) {
            return Err(Error::InvalidSettings(
                "march.epsilon must be positive and finite".into(),
            ));
        }
        if !(march.max_distance.is_finite() && march.max_distance > march.epsilon) {
            return Err(Error::InvalidSettings(
                "march.max_distance must be finite and exceed march.epsilon".into(),
            ));
        }
        if march.max_steps == 0 {
            return Err(Error::InvalidSettings(
                "march.max_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Signed-distance figure marched with these settings.
    pub fn sdf(&self, shape: SdfShape) -> SdfFigure {
        SdfFigure::new(shape).with_march(self.march)
    }

    /// Insert a signed-distance primitive marched with these settings.
    pub fn insert_sdf(&self, arena: &mut FigureArena, shape: SdfShape) -> FigureId {
        arena.insert_primitive(Shape::Sdf(self.sdf(shape)))
    }

    /// Empty scene using these shading parameters.
    pub fn scene(&self) -> Result<Scene> {
        Ok(Scene::new(self.shading)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lumen_math::{Ray, Tuple4};
    use lumen_scene::{ColorModel, SceneError, MAX_RECURSION_DEPTH};

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let s = Settings::from_toml_str(
            r#"
            [shading]
            max_depth = 8

            [march]
            max_steps = 1024
            "#,
        )
        .unwrap();
        assert_eq!(s.shading.max_depth, 8);
        assert_abs_diff_eq!(s.shading.shadow_bias, 1e-5, epsilon = 1e-12);
        assert_eq!(s.shading.color_model, ColorModel::normalized());
        assert_eq!(s.march.max_steps, 1024);
        assert_abs_diff_eq!(s.march.max_distance, 100.0);
    }

    #[test]
    fn test_color_model_table() {
        let s = Settings::from_toml_str("[shading.color_model]\nwhite = 255.0\n").unwrap();
        assert_eq!(s.shading.color_model, ColorModel::rgb8());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_toml_str("[shading]\nshadow_bias = -0.5\n"),
            Err(Error::Scene(SceneError::InvalidConfig(_)))
        ));
        assert!(matches!(
            Settings::from_toml_str("[march]\nepsilon = 0.0\n"),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(
            Settings::from_toml_str("[march]\nmax_steps = 0\n"),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            Settings::from_toml_str("[shading\nmax_depth = 3"),
            Err(Error::Toml(_))
        ));
        assert!(matches!(
            Settings::from_toml_str("[shading]\nmax_depth = \"deep\"\n"),
            Err(Error::Toml(_))
        ));
    }

    /// Enters a unit sphere at a shallow angle, so marching needs dozens of
    /// steps to converge.
    fn grazing_ray() -> Ray {
        Ray::new(Tuple4::point(0.0, 0.99, -5.0), Tuple4::vector(0.0, 0.0, 1.0)).unwrap()
    }

    #[test]
    fn test_march_settings_reach_sdf_figures() {
        let sphere = SdfShape::Sphere { radius: 1.0 };

        let defaults = Settings::default();
        let mut scene = defaults.scene().unwrap();
        let id = defaults.insert_sdf(scene.arena_mut(), sphere.clone());
        let xs = scene.arena().intersect(id, &grazing_ray()).unwrap();
        assert_eq!(xs.len(), 1);
        assert_abs_diff_eq!(xs[0].t, 5.0 - (1.0f64 - 0.99 * 0.99).sqrt(), epsilon = 1e-3);

        let short = Settings::from_toml_str("[march]\nmax_steps = 3\n").unwrap();
        assert_eq!(short.sdf(sphere.clone()).march.max_steps, 3);
        let mut scene = short.scene().unwrap();
        let id = short.insert_sdf(scene.arena_mut(), sphere);
        assert!(scene.arena().intersect(id, &grazing_ray()).unwrap().is_empty());
        assert!(scene.intersect(&grazing_ray()).unwrap().is_empty());
    }

    #[test]
    fn test_scene_clamps_depth() {
        let s = Settings::from_toml_str("[shading]\nmax_depth = 1000\n").unwrap();
        assert_eq!(s.scene().unwrap().config().max_depth, MAX_RECURSION_DEPTH);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("lumen-settings-does-not-exist.toml");
        assert!(matches!(Settings::load(path), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lumen-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "[shading]\nmax_depth = 2\n").unwrap();
        let s = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(s.shading.max_depth, 2);
    }
}
