#![warn(missing_docs)]

//! Shading for the lumen ray caster.
//!
//! A [`Scene`] wraps a [`lumen_geom::FigureArena`] with a list of
//! [`Light`]s and a [`ShadingConfig`]. Rays are cast against every root
//! figure; the nearest visible hit is shaded with Phong lighting, hard
//! shadows, mirror reflection and Snell refraction, blended with the
//! Schlick approximation on surfaces that both reflect and transmit.
//!
//! # Example
//!
//! ```ignore
//! use lumen_geom::Shape;
//! use lumen_math::{Color, Ray, Tuple4};
//! use lumen_scene::{PointLight, Scene, ShadingConfig};
//!
//! let mut scene = Scene::new(ShadingConfig::default())?;
//! scene.arena_mut().insert_primitive(Shape::Sphere);
//! scene.add_light(PointLight::new(Tuple4::point(-10.0, 10.0, -10.0), Color::white())?);
//!
//! let ray = Ray::new(Tuple4::point(0.0, 0.0, -5.0), Tuple4::vector(0.0, 0.0, 1.0))?;
//! let color = scene.cast_ray(&ray)?;
//! ```

mod camera;
mod config;
mod error;
mod light;
mod refraction;
mod scene;

pub use camera::Camera;
pub use config::{ColorModel, ShadingConfig, MAX_RECURSION_DEPTH};
pub use error::{Result, SceneError};
pub use light::{AmbientLight, DirectionalLight, Light, PointLight};
pub use refraction::{refractive_indices, schlick};
pub use scene::Scene;
