//! Error types for figures and their arena.

use lumen_math::MathError;
use thiserror::Error;

use crate::figure::FigureId;

/// Errors raised by figure construction, hierarchy edits and intersection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Underlying algebra contract violated.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Handle does not name a live figure in this arena.
    #[error("figure {0:?} is not in the arena")]
    UnknownFigure(FigureId),

    /// Operation needs a group or CSG node but got a primitive.
    #[error("figure {0:?} is not a composite")]
    NotComposite(FigureId),

    /// Operation needs a primitive but got a group or CSG node.
    #[error("figure {0:?} is not a primitive")]
    NotPrimitive(FigureId),

    /// Composite has no children to delegate to.
    #[error("composite {0:?} has no children")]
    EmptyComposite(FigureId),

    /// Figure is not a direct child of the given composite.
    #[error("figure {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Composite that was asked.
        parent: FigureId,
        /// Figure that was expected among its children.
        child: FigureId,
    },

    /// Figure already has a parent; detach it (or use `set_parent`) first.
    #[error("figure {child:?} already belongs to {parent:?}")]
    AlreadyParented {
        /// Figure being added.
        child: FigureId,
        /// Its current owner.
        parent: FigureId,
    },

    /// Both CSG operand slots are occupied.
    #[error("CSG node {0:?} already has two children")]
    CsgFull(FigureId),

    /// The edit would make a figure its own ancestor.
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    CycleDetected {
        /// Prospective parent.
        parent: FigureId,
        /// Prospective child.
        child: FigureId,
    },

    /// Ray marching needs a unit direction; this one has the given length.
    #[error("ray marching requires a unit direction, got length {0}")]
    UnnormalizedDirection(f64),

    /// Triangle vertices are collinear or coincident.
    #[error("triangle vertices are collinear")]
    DegenerateTriangle,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
