#![warn(missing_docs)]

//! Figures for the lumen ray caster.
//!
//! Primitives (sphere, plane, cube, cylinder, cone, triangles and
//! ray-marched distance fields) live in object space. A [`FigureArena`]
//! owns them together with groups and CSG nodes, maps world-space rays and
//! points through each figure's transform chain, and produces sorted
//! [`Intersections`] and shading-ready [`HitResult`]s.
//!
//! # Example
//!
//! ```ignore
//! use lumen_geom::{FigureArena, Shape};
//! use lumen_math::{Matrix4, Ray, Tuple4};
//!
//! let mut arena = FigureArena::new();
//! let sphere = arena.insert_primitive(Shape::Sphere);
//! arena.set_transform(sphere, Matrix4::scaling(2.0, 2.0, 2.0))?;
//!
//! let ray = Ray::new(Tuple4::point(0.0, 0.0, -5.0), Tuple4::vector(0.0, 0.0, 1.0))?;
//! let xs = arena.intersect(sphere, &ray)?;
//! assert_eq!(xs.hit().map(|x| x.t), Some(3.0));
//! ```

mod arena;
mod error;
mod figure;
mod hit;
mod intersection;
mod material;
mod query;
pub mod shape;

pub use arena::FigureArena;
pub use error::{GeometryError, Result};
pub use figure::{CsgOp, Figure, FigureId, FigureKind};
pub use hit::HitResult;
pub use intersection::{Intersection, Intersections};
pub use material::{Material, Pattern, SolidPattern};
pub use shape::{Cone, Cylinder, MarchSettings, SdfFigure, SdfShape, Shape, SmoothTriangle, Triangle};
