//! Figure nodes: a transform plus either a primitive or a composite.

use lumen_math::Transform;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::material::Material;
use crate::shape::Shape;

new_key_type! {
    /// Handle to a figure stored in a [`crate::FigureArena`].
    pub struct FigureId;
}

/// Boolean operator of a CSG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsgOp {
    /// Points inside either operand.
    Union,
    /// Points inside both operands.
    Intersection,
    /// Points inside the left operand but not the right.
    Difference,
}

impl CsgOp {
    /// Whether a boundary crossing survives.
    ///
    /// `left_hit` says which operand the crossing belongs to; `in_left` and
    /// `in_right` say whether the ray is currently inside each operand.
    pub fn allows(self, left_hit: bool, in_left: bool, in_right: bool) -> bool {
        match self {
            CsgOp::Union => (left_hit && !in_right) || (!left_hit && !in_left),
            CsgOp::Intersection => (left_hit && in_right) || (!left_hit && in_left),
            CsgOp::Difference => (left_hit && !in_right) || (!left_hit && in_left),
        }
    }
}

/// What a figure is.
#[derive(Debug, Clone)]
pub enum FigureKind {
    /// A leaf with its own shape and material.
    Primitive {
        /// Object-space geometry.
        shape: Shape,
        /// Surface material.
        material: Material,
    },
    /// An ordered bag of children sharing the group's transform.
    Group {
        /// Children in insertion order.
        children: Vec<FigureId>,
    },
    /// A binary boolean node with two operand slots.
    Csg {
        /// Operator.
        op: CsgOp,
        /// Left operand slot.
        left: Option<FigureId>,
        /// Right operand slot.
        right: Option<FigureId>,
    },
}

/// A node of the scene hierarchy.
#[derive(Debug, Clone)]
pub struct Figure {
    pub(crate) transform: Transform,
    pub(crate) parent: Option<FigureId>,
    pub(crate) kind: FigureKind,
}

impl Figure {
    pub(crate) fn new(kind: FigureKind) -> Self {
        Self {
            transform: Transform::identity(),
            parent: None,
            kind,
        }
    }

    /// World-from-object transform relative to the parent.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Owning composite, if any.
    pub fn parent(&self) -> Option<FigureId> {
        self.parent
    }

    /// Node payload.
    pub fn kind(&self) -> &FigureKind {
        &self.kind
    }

    /// Groups and CSG nodes.
    pub fn is_composite(&self) -> bool {
        !matches!(self.kind, FigureKind::Primitive { .. })
    }

    /// Shape of a primitive.
    pub fn shape(&self) -> Option<&Shape> {
        match &self.kind {
            FigureKind::Primitive { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Material of a primitive. Composites carry none.
    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            FigureKind::Primitive { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Direct children; CSG slots in left, right order.
    pub fn children(&self) -> Vec<FigureId> {
        match &self.kind {
            FigureKind::Primitive { .. } => Vec::new(),
            FigureKind::Group { children } => children.clone(),
            FigureKind::Csg { left, right, .. } => left.iter().chain(right.iter()).copied().collect(),
        }
    }
}
