#![warn(missing_docs)]

//! lumen: a ray casting renderer core.
//!
//! This crate re-exports the algebra ([`lumen_math`]), figures
//! ([`lumen_geom`]) and shading ([`lumen_scene`]) layers behind one
//! [`Error`] type, and adds [`Settings`] loaded from TOML.
//!
//! # Example
//!
//! ```ignore
//! use lumen::{Color, Matrix4, PointLight, Ray, Settings, Shape, Tuple4};
//!
//! let settings = Settings::from_toml_str("[shading]\nmax_depth = 4\n")?;
//! let mut scene = settings.scene()?;
//!
//! let arena = scene.arena_mut();
//! let ball = arena.insert_primitive(Shape::Sphere);
//! arena.set_transform(ball, Matrix4::translation(0.0, 1.0, 0.0))?;
//! scene.add_light(PointLight::new(Tuple4::point(-10.0, 10.0, -10.0), Color::white())?);
//!
//! let ray = Ray::new(Tuple4::point(0.0, 1.0, -5.0), Tuple4::vector(0.0, 0.0, 1.0))?;
//! let color = scene.cast_ray(&ray)?;
//! ```

mod error;
mod settings;

pub use error::{Error, Result};
pub use settings::Settings;

pub use lumen_geom::{
    shape, Cone, CsgOp, Cylinder, Figure, FigureArena, FigureId, FigureKind, GeometryError,
    HitResult, Intersection, Intersections, MarchSettings, Material, Pattern, SdfFigure, SdfShape,
    Shape, SmoothTriangle, SolidPattern, Triangle,
};
pub use lumen_math::{
    approx_eq, approx_eq_matrices, Color, MathError, Matrix, Matrix4, MatrixRead, Ray, Strategy,
    Transform, Transposed, Tuple4, TupleKind, EPSILON,
};
pub use lumen_scene::{
    refractive_indices, schlick, AmbientLight, Camera, ColorModel, DirectionalLight, Light,
    PointLight, Scene, SceneError, ShadingConfig, MAX_RECURSION_DEPTH,
};
