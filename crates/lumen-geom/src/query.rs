//! World-space queries over the arena: intersection, normals, distances.
//!
//! A ray is carried down the hierarchy one transform at a time. Composite
//! nodes pass their object-space ray to children unchanged, which keeps the
//! ray parameter identical at every level; only a primitive normalizes its
//! direction, and divides its local distances by the dropped length.

use lumen_math::{approx_eq, Color, Ray, Tuple4};

use crate::arena::FigureArena;
use crate::error::{GeometryError, Result};
use crate::figure::{CsgOp, FigureId, FigureKind};
use crate::hit::HitResult;
use crate::intersection::{Intersection, Intersections};

impl FigureArena {
    /// Map a world-space point into `id`'s object space, through every
    /// ancestor's transform.
    pub fn world_to_object(&self, id: FigureId, point: Tuple4) -> Result<Tuple4> {
        let figure = self.figure(id)?;
        let point = match figure.parent() {
            Some(parent) => self.world_to_object(parent, point)?,
            None => point,
        };
        Ok(figure.transform().to_object(point))
    }

    /// Map an object-space normal of `id` to a unit world-space normal.
    pub fn normal_to_world(&self, id: FigureId, normal: Tuple4) -> Result<Tuple4> {
        let figure = self.figure(id)?;
        let normal = figure.transform().normal_to_world(normal)?;
        match figure.parent() {
            Some(parent) => self.normal_to_world(parent, normal),
            None => Ok(normal),
        }
    }

    /// Unit world-space normal at a world-space point on `id`.
    ///
    /// A CSG node answers with the operand whose surface passes through the
    /// point (left first); a group with its nearest child.
    pub fn normal_at(&self, id: FigureId, point: Tuple4, uv: Option<(f64, f64)>) -> Result<Tuple4> {
        match &self.figure(id)?.kind {
            FigureKind::Primitive { shape, .. } => {
                let local = self.world_to_object(id, point)?;
                self.normal_to_world(id, shape.local_normal(local, uv))
            }
            FigureKind::Csg { left, right, .. } => {
                let child = match (*left, *right) {
                    (Some(l), Some(r)) => {
                        if approx_eq(self.surface_distance(l, point)?, 0.0) {
                            l
                        } else {
                            r
                        }
                    }
                    (Some(only), None) | (None, Some(only)) => only,
                    (None, None) => return Err(GeometryError::EmptyComposite(id)),
                };
                self.normal_at(child, point, None)
            }
            FigureKind::Group { children } => {
                let mut nearest: Option<(FigureId, f64)> = None;
                for &child in children {
                    let d = self.surface_distance(child, point)?.abs();
                    if nearest.map_or(true, |(_, best)| d < best) {
                        nearest = Some((child, d));
                    }
                }
                match nearest {
                    Some((child, _)) => self.normal_at(child, point, None),
                    None => Err(GeometryError::EmptyComposite(id)),
                }
            }
        }
    }

    /// Signed distance from a world-space point to `id`'s surface, measured
    /// in each primitive's own (unscaled) object space.
    ///
    /// Missing CSG operands and empty groups count as empty space.
    pub fn surface_distance(&self, id: FigureId, point: Tuple4) -> Result<f64> {
        match &self.figure(id)?.kind {
            FigureKind::Primitive { shape, .. } => {
                Ok(shape.surface_distance(self.world_to_object(id, point)?))
            }
            FigureKind::Group { children } => {
                let mut d = f64::INFINITY;
                for &child in children {
                    d = d.min(self.surface_distance(child, point)?);
                }
                Ok(d)
            }
            FigureKind::Csg { op, left, right } => {
                let dl = self.slot_distance(*left, point)?;
                let dr = self.slot_distance(*right, point)?;
                Ok(match op {
                    CsgOp::Union => dl.min(dr),
                    CsgOp::Intersection => dl.max(dr),
                    CsgOp::Difference => dl.max(-dr),
                })
            }
        }
    }

    fn slot_distance(&self, slot: Option<FigureId>, point: Tuple4) -> Result<f64> {
        match slot {
            Some(id) => self.surface_distance(id, point),
            None => Ok(f64::INFINITY),
        }
    }

    /// Pattern color of a primitive at a world-space point.
    pub fn color_at(&self, id: FigureId, point: Tuple4) -> Result<Color> {
        let material = self.figure(id)?.material().ok_or(GeometryError::NotPrimitive(id))?;
        Ok(material.color_at(self.world_to_object(id, point)?))
    }

    /// Every crossing of a world-space ray with `id`, sorted by `t`.
    pub fn intersect(&self, id: FigureId, ray: &Ray) -> Result<Intersections> {
        let mut out = Vec::new();
        self.collect_hits(id, ray, &mut out)?;
        Ok(Intersections::new(out))
    }

    /// Nearest visible hit of a world-space ray on `id`, prepared for
    /// shading. `bias` offsets the over/under points.
    pub fn hit(&self, id: FigureId, ray: &Ray, bias: f64) -> Result<Option<HitResult>> {
        let xs = self.intersect(id, ray)?;
        xs.hit()
            .map(|x| HitResult::prepare(self, x, ray, bias))
            .transpose()
    }

    fn collect_hits(&self, id: FigureId, ray: &Ray, out: &mut Vec<Intersection>) -> Result<()> {
        let figure = self.figure(id)?;
        let local = figure.transform().ray_to_object(ray);

        match &figure.kind {
            FigureKind::Primitive { shape, .. } => {
                let Some((unit, scale)) = local.normalized() else {
                    return Ok(());
                };
                for hit in shape.local_intersect(&unit)? {
                    out.push(Intersection {
                        t: hit.t / scale,
                        figure: id,
                        uv: hit.uv,
                    });
                }
            }
            FigureKind::Group { children } => {
                for &child in children {
                    self.collect_hits(child, &local, out)?;
                }
            }
            FigureKind::Csg { op, left, right } => {
                let mut xs = Vec::new();
                for child in left.iter().chain(right.iter()) {
                    self.collect_hits(*child, &local, &mut xs)?;
                }
                xs.sort_by(|a, b| a.t.total_cmp(&b.t));
                self.filter_csg(*op, *left, xs, out)?;
            }
        }
        Ok(())
    }

    /// Sweep sorted operand hits, tracking whether the ray is inside each
    /// operand, and keep the crossings the operator allows.
    fn filter_csg(
        &self,
        op: CsgOp,
        left: Option<FigureId>,
        xs: Vec<Intersection>,
        out: &mut Vec<Intersection>,
    ) -> Result<()> {
        let mut in_left = false;
        let mut in_right = false;
        for x in xs {
            let left_hit = match left {
                Some(l) => l == x.figure || self.includes(l, x.figure)?,
                None => false,
            };
            if op.allows(left_hit, in_left, in_right) {
                out.push(x);
            }
            if left_hit {
                in_left = !in_left;
            } else {
                in_right = !in_right;
            }
        }
        Ok(())
    }
}
