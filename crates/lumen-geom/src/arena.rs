//! Arena of figures with parent/child bookkeeping.
//!
//! Figures refer to each other only through [`FigureId`] handles. Every
//! edit keeps a child's `parent` field and its parent's child collection in
//! agreement, and no edit leaves the arena half-modified on error.

use log::debug;
use lumen_math::{Matrix4, Transform};
use slotmap::SlotMap;

use crate::error::{GeometryError, Result};
use crate::figure::{CsgOp, Figure, FigureId, FigureKind};
use crate::material::Material;
use crate::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Primitive,
    Group,
    Csg { full: bool },
}

/// Owner of every figure in a scene.
#[derive(Debug, Clone, Default)]
pub struct FigureArena {
    figures: SlotMap<FigureId, Figure>,
}

impl FigureArena {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live figures.
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// True if no figures are live.
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// True if `id` names a live figure.
    pub fn contains(&self, id: FigureId) -> bool {
        self.figures.contains_key(id)
    }

    /// Look up a figure.
    pub fn get(&self, id: FigureId) -> Option<&Figure> {
        self.figures.get(id)
    }

    /// Look up a figure, failing with [`GeometryError::UnknownFigure`].
    pub fn figure(&self, id: FigureId) -> Result<&Figure> {
        self.figures.get(id).ok_or(GeometryError::UnknownFigure(id))
    }

    fn figure_mut(&mut self, id: FigureId) -> Result<&mut Figure> {
        self.figures.get_mut(id).ok_or(GeometryError::UnknownFigure(id))
    }

    /// Figures without a parent, in arena order.
    pub fn roots(&self) -> impl Iterator<Item = FigureId> + '_ {
        self.figures
            .iter()
            .filter(|(_, f)| f.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Add a leaf with the default material and identity transform.
    pub fn insert_primitive(&mut self, shape: Shape) -> FigureId {
        let name = shape.name();
        let id = self.figures.insert(Figure::new(FigureKind::Primitive {
            shape,
            material: Material::default(),
        }));
        debug!("inserted {name} {id:?}");
        id
    }

    /// Add an empty group.
    pub fn insert_group(&mut self) -> FigureId {
        let id = self.figures.insert(Figure::new(FigureKind::Group { children: Vec::new() }));
        debug!("inserted group {id:?}");
        id
    }

    /// Add a CSG node owning `left` and `right`. Both must be unparented
    /// and distinct; on error nothing is inserted.
    pub fn insert_csg(&mut self, op: CsgOp, left: FigureId, right: FigureId) -> Result<FigureId> {
        let id = self.figures.insert(Figure::new(FigureKind::Csg {
            op,
            left: None,
            right: None,
        }));
        let filled = self
            .csg_add_internal(id, left)
            .and_then(|()| self.csg_add_internal(id, right));
        if let Err(e) = filled {
            let orphans = self.figures[id].children();
            for child in orphans {
                if let Some(f) = self.figures.get_mut(child) {
                    f.parent = None;
                }
            }
            self.figures.remove(id);
            return Err(e);
        }
        debug!("inserted csg {op:?} {id:?} ({left:?}, {right:?})");
        Ok(id)
    }

    /// Replace a figure's transform wholesale.
    pub fn set_transform(&mut self, id: FigureId, matrix: Matrix4) -> Result<()> {
        let transform = Transform::new(matrix)?;
        self.figure_mut(id)?.transform = transform;
        Ok(())
    }

    /// Set a primitive's material, or every descendant leaf's material for
    /// a composite.
    pub fn set_material(&mut self, id: FigureId, material: Material) -> Result<()> {
        let mut targets = vec![id];
        targets.extend(self.descendants(id)?);
        for target in targets {
            if let FigureKind::Primitive { material: m, .. } = &mut self.figure_mut(target)?.kind {
                *m = material.clone();
            }
        }
        Ok(())
    }

    /// Material of a primitive; `None` for composites.
    pub fn material(&self, id: FigureId) -> Result<Option<&Material>> {
        Ok(self.figure(id)?.material())
    }

    /// Owning composite.
    pub fn parent(&self, id: FigureId) -> Result<Option<FigureId>> {
        Ok(self.figure(id)?.parent)
    }

    /// Direct children; CSG slots in left, right order.
    pub fn children(&self, id: FigureId) -> Result<Vec<FigureId>> {
        Ok(self.figure(id)?.children())
    }

    /// Every figure reachable through child links, depth first.
    pub fn descendants(&self, id: FigureId) -> Result<Vec<FigureId>> {
        let mut out = Vec::new();
        let mut stack = self.children(id)?;
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut grand = self.children(next)?;
            grand.reverse();
            stack.extend(grand);
        }
        Ok(out)
    }

    /// True iff `x` is reachable from `composite` through child links.
    pub fn includes(&self, composite: FigureId, x: FigureId) -> Result<bool> {
        Ok(self.descendants(composite)?.contains(&x))
    }

    fn role(&self, id: FigureId) -> Result<Role> {
        Ok(match &self.figure(id)?.kind {
            FigureKind::Primitive { .. } => Role::Primitive,
            FigureKind::Group { .. } => Role::Group,
            FigureKind::Csg { left, right, .. } => Role::Csg {
                full: left.is_some() && right.is_some(),
            },
        })
    }

    /// True if `ancestor` is `id` or lies on its parent chain.
    fn is_self_or_ancestor(&self, ancestor: FigureId, id: FigureId) -> Result<bool> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return Ok(true);
            }
            cursor = self.figure(current)?.parent;
        }
        Ok(false)
    }

    /// Checks shared by every attach path: both live, child unowned, no cycle.
    fn check_attach(&self, parent: FigureId, child: FigureId) -> Result<()> {
        if let Some(owner) = self.figure(child)?.parent {
            return Err(GeometryError::AlreadyParented { child, parent: owner });
        }
        if self.is_self_or_ancestor(child, parent)? {
            return Err(GeometryError::CycleDetected { parent, child });
        }
        Ok(())
    }

    /// Append `child` to a group, or fill the next CSG slot.
    ///
    /// A child that already has a parent is rejected; use
    /// [`FigureArena::set_parent`] to move it.
    pub fn add_child(&mut self, parent: FigureId, child: FigureId) -> Result<()> {
        match self.role(parent)? {
            Role::Primitive => return Err(GeometryError::NotComposite(parent)),
            Role::Csg { .. } => return self.csg_add_internal(parent, child),
            Role::Group => {}
        }
        self.check_attach(parent, child)?;
        if let FigureKind::Group { children } = &mut self.figure_mut(parent)?.kind {
            children.push(child);
        }
        self.figure_mut(child)?.parent = Some(parent);
        debug!("added {child:?} to group {parent:?}");
        Ok(())
    }

    /// Fill the first empty CSG slot, left before right.
    pub fn csg_add_internal(&mut self, csg: FigureId, child: FigureId) -> Result<()> {
        match self.role(csg)? {
            Role::Csg { full: true } => return Err(GeometryError::CsgFull(csg)),
            Role::Csg { full: false } => {}
            _ => return Err(GeometryError::NotComposite(csg)),
        }
        self.check_attach(csg, child)?;
        if let FigureKind::Csg { left, right, .. } = &mut self.figure_mut(csg)?.kind {
            let slot = if left.is_none() { left } else { right };
            *slot = Some(child);
        }
        self.figure_mut(child)?.parent = Some(csg);
        debug!("filled csg {csg:?} slot with {child:?}");
        Ok(())
    }

    /// Detach `child` from `parent`. CSG slots are emptied, never shifted.
    pub fn remove_child(&mut self, parent: FigureId, child: FigureId) -> Result<()> {
        self.figure(child)?;
        let removed = match &mut self.figure_mut(parent)?.kind {
            FigureKind::Primitive { .. } => return Err(GeometryError::NotComposite(parent)),
            FigureKind::Group { children } => match children.iter().position(|&c| c == child) {
                Some(i) => {
                    children.remove(i);
                    true
                }
                None => false,
            },
            FigureKind::Csg { left, right, .. } => {
                if *left == Some(child) {
                    *left = None;
                    true
                } else if *right == Some(child) {
                    *right = None;
                    true
                } else {
                    false
                }
            }
        };
        if !removed {
            return Err(GeometryError::NotAChild { parent, child });
        }
        self.figure_mut(child)?.parent = None;
        debug!("removed {child:?} from {parent:?}");
        Ok(())
    }

    /// Detach `child` from a CSG node.
    pub fn csg_remove_child(&mut self, csg: FigureId, child: FigureId) -> Result<()> {
        match self.role(csg)? {
            Role::Csg { .. } => self.remove_child(csg, child),
            _ => Err(GeometryError::NotComposite(csg)),
        }
    }

    /// Move `child` under `new_parent` (or make it a root with `None`).
    ///
    /// Validates the destination before touching the old parent, so either
    /// both links change or neither does.
    pub fn set_parent(&mut self, child: FigureId, new_parent: Option<FigureId>) -> Result<()> {
        let old = self.figure(child)?.parent;
        if old == new_parent {
            return Ok(());
        }
        if let Some(parent) = new_parent {
            match self.role(parent)? {
                Role::Primitive => return Err(GeometryError::NotComposite(parent)),
                Role::Csg { full: true } => return Err(GeometryError::CsgFull(parent)),
                _ => {}
            }
            if self.is_self_or_ancestor(child, parent)? {
                return Err(GeometryError::CycleDetected { parent, child });
            }
        }
        if let Some(old) = old {
            self.remove_child(old, child)?;
        }
        if let Some(parent) = new_parent {
            self.add_child(parent, child)?;
        }
        debug!("reparented {child:?}: {old:?} -> {new_parent:?}");
        Ok(())
    }

    /// Remove a figure and its whole subtree, detaching it from its parent.
    pub fn remove(&mut self, id: FigureId) -> Result<()> {
        if let Some(parent) = self.figure(id)?.parent {
            self.remove_child(parent, id)?;
        }
        let subtree = self.descendants(id)?;
        for f in &subtree {
            self.figures.remove(*f);
        }
        self.figures.remove(id);
        debug!("removed {id:?} and {} descendants", subtree.len());
        Ok(())
    }
}
