//! World-space intersection records and sorted lists of them.

use std::ops::Index;

use crate::figure::FigureId;

/// One ray/surface crossing, owned by a primitive figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// World-space ray parameter.
    pub t: f64,
    /// Primitive that was hit.
    pub figure: FigureId,
    /// Barycentric coordinates for triangle hits.
    pub uv: Option<(f64, f64)>,
}

impl Intersection {
    /// Intersection without surface parameters.
    pub fn new(t: f64, figure: FigureId) -> Self {
        Self { t, figure, uv: None }
    }
}

/// Intersections sorted ascending by `t`; ties keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intersections {
    items: Vec<Intersection>,
}

impl Intersections {
    /// Sort (stably) and wrap.
    pub fn new(mut items: Vec<Intersection>) -> Self {
        items.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { items }
    }

    /// The visible hit: smallest strictly positive `t`. Among equal
    /// distances the first in list order wins.
    pub fn hit(&self) -> Option<&Intersection> {
        self.hit_index().map(|i| &self.items[i])
    }

    /// Position of [`Intersections::hit`] in the sorted list.
    pub fn hit_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, x) in self.items.iter().enumerate() {
            if x.t > 0.0 && best.map_or(true, |b| x.t < self.items[b].t) {
                best = Some(i);
            }
        }
        best
    }

    /// Number of intersections.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the ray crossed nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in ascending `t`.
    pub fn iter(&self) -> std::slice::Iter<'_, Intersection> {
        self.items.iter()
    }

    /// Sorted slice.
    pub fn as_slice(&self) -> &[Intersection] {
        &self.items
    }
}

impl Index<usize> for Intersections {
    type Output = Intersection;

    fn index(&self, i: usize) -> &Intersection {
        &self.items[i]
    }
}

impl<'a> IntoIterator for &'a Intersections {
    type Item = &'a Intersection;
    type IntoIter = std::slice::Iter<'a, Intersection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Intersections {
    type Item = Intersection;
    type IntoIter = std::vec::IntoIter<Intersection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
