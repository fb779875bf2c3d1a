//! Refractive indices on either side of a hit, and Schlick reflectance.

use lumen_geom::{FigureArena, FigureId, HitResult, Intersections};

use crate::error::Result;

/// Indices `(n1, n2)` on the incoming and outgoing side of `xs[hit_index]`.
///
/// Walks the sorted hit list keeping the figures the ray is currently
/// inside, oldest first. Crossing a figure toggles its membership, so a
/// figure entered twice is treated as exited. The hit's `n1` is the
/// innermost container's index before the toggle, `n2` the one after.
/// Empty space has index `1.0`.
pub fn refractive_indices(
    arena: &FigureArena,
    xs: &Intersections,
    hit_index: usize,
) -> Result<(f64, f64)> {
    let mut containers: Vec<FigureId> = Vec::new();
    let mut n1 = 1.0;

    for (i, x) in xs.iter().enumerate() {
        if i == hit_index {
            n1 = innermost_index(arena, &containers)?;
        }

        match containers.iter().position(|&c| c == x.figure) {
            Some(pos) => {
                containers.remove(pos);
            }
            None => containers.push(x.figure),
        }

        if i == hit_index {
            return Ok((n1, innermost_index(arena, &containers)?));
        }
    }
    Ok((1.0, 1.0))
}

fn innermost_index(arena: &FigureArena, containers: &[FigureId]) -> Result<f64> {
    match containers.last() {
        Some(&id) => Ok(arena.material(id)?.map_or(1.0, |m| m.refractive_index)),
        None => Ok(1.0),
    }
}

/// Schlick approximation of the Fresnel reflectance at a hit.
///
/// Returns `1.0` under total internal reflection.
pub fn schlick(comps: &HitResult) -> f64 {
    let mut cos = comps.eye.dot(&comps.normal);

    if comps.n1 > comps.n2 {
        let n = comps.n1 / comps.n2;
        let sin2_t = n * n * (1.0 - cos * cos);
        if sin2_t > 1.0 {
            return 1.0;
        }
        cos = (1.0 - sin2_t).sqrt();
    }

    let r0 = ((comps.n1 - comps.n2) / (comps.n1 + comps.n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_geom::{Material, Shape};
    use lumen_math::{Matrix4, Ray, Tuple4};

    fn glass_sphere(arena: &mut FigureArena, m: Matrix4, index: f64) -> FigureId {
        let id = arena.insert_primitive(Shape::Sphere);
        arena.set_transform(id, m).unwrap();
        arena
            .set_material(
                id,
                Material {
                    refractive_index: index,
                    ..Material::glass()
                },
            )
            .unwrap();
        id
    }

    #[test]
    fn test_nested_glass_indices() {
        let mut arena = FigureArena::new();
        let a = glass_sphere(&mut arena, Matrix4::scaling(2.0, 2.0, 2.0), 1.5);
        let b = glass_sphere(&mut arena, Matrix4::translation(0.0, 0.0, -0.25), 2.0);
        let c = glass_sphere(&mut arena, Matrix4::translation(0.0, 0.0, 0.25), 2.5);
        let r = Ray::new(Tuple4::point(0.0, 0.0, -4.0), Tuple4::vector(0.0, 0.0, 1.0)).unwrap();

        let mut all = Vec::new();
        for id in [a, b, c] {
            all.extend(arena.intersect(id, &r).unwrap());
        }
        let xs = Intersections::new(all);
        let owners: Vec<_> = xs.iter().map(|x| x.figure).collect();
        assert_eq!(owners, vec![a, b, c, b, c, a]);

        let expected = [(1.0, 1.5), (1.5, 2.0), (2.0, 2.5), (2.5, 2.5), (2.5, 1.5), (1.5, 1.0)];
        for (i, want) in expected.into_iter().enumerate() {
            assert_eq!(refractive_indices(&arena, &xs, i).unwrap(), want, "hit {i}");
        }
    }

    #[test]
    fn test_self_overlap_toggles() {
        let mut arena = FigureArena::new();
        let a = glass_sphere(&mut arena, Matrix4::identity(), 1.5);
        let xs = Intersections::new(vec![
            lumen_geom::Intersection::new(1.0, a),
            lumen_geom::Intersection::new(2.0, a),
            lumen_geom::Intersection::new(3.0, a),
        ]);
        assert_eq!(refractive_indices(&arena, &xs, 1).unwrap(), (1.5, 1.0));
        assert_eq!(refractive_indices(&arena, &xs, 2).unwrap(), (1.0, 1.5));
    }
}
