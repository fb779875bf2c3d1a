//! Scene: the figure arena, its lights and the shading pipeline.
//!
//! Every unparented figure in the arena is a root and is tested against
//! each ray. Shading iterates the lights, skipping any whose path to the
//! hit is blocked, then adds reflected and refracted contributions up to
//! [`ShadingConfig::max_depth`] bounces.

use log::debug;
use lumen_geom::{FigureArena, GeometryError, HitResult, Intersections, Material};
use lumen_math::{Color, Ray, Tuple4};

use crate::camera::Camera;
use crate::config::ShadingConfig;
use crate::error::Result;
use crate::light::Light;
use crate::refraction::{refractive_indices, schlick};

/// Figures, lights and shading parameters.
#[derive(Debug, Default)]
pub struct Scene {
    arena: FigureArena,
    lights: Vec<Box<dyn Light>>,
    config: ShadingConfig,
}

impl Scene {
    /// Empty scene. The config is validated and its depth clamped.
    pub fn new(config: ShadingConfig) -> Result<Self> {
        Self::with_arena(FigureArena::new(), config)
    }

    /// Scene over an existing arena.
    pub fn with_arena(arena: FigureArena, config: ShadingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            arena,
            lights: Vec::new(),
            config: config.clamped(),
        })
    }

    /// Figures in the scene.
    pub fn arena(&self) -> &FigureArena {
        &self.arena
    }

    /// Mutable access for building the scene.
    pub fn arena_mut(&mut self) -> &mut FigureArena {
        &mut self.arena
    }

    /// Add a light source.
    pub fn add_light(&mut self, light: impl Light + 'static) {
        debug!("added light {light:?}");
        self.lights.push(Box::new(light));
    }

    /// Light sources in insertion order.
    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    /// Active shading parameters.
    pub fn config(&self) -> &ShadingConfig {
        &self.config
    }

    /// All crossings of `ray` with every root figure, sorted by `t`.
    /// Equal distances keep root order.
    pub fn intersect(&self, ray: &Ray) -> Result<Intersections> {
        let mut all = Vec::new();
        for root in self.arena.roots() {
            all.extend(self.arena.intersect(root, ray)?);
        }
        Ok(Intersections::new(all))
    }

    /// Shading data for `xs[index]`, including refractive indices.
    pub fn prepare_hit(&self, xs: &Intersections, index: usize, ray: &Ray) -> Result<HitResult> {
        let comps = HitResult::prepare(&self.arena, &xs[index], ray, self.config.shadow_bias)?;
        let (n1, n2) = refractive_indices(&self.arena, xs, index)?;
        Ok(comps.with_indices(n1, n2))
    }

    /// Color seen along `ray`; black when nothing is hit.
    pub fn cast_ray(&self, ray: &Ray) -> Result<Color> {
        self.color_at(ray, self.config.max_depth)
    }

    /// Color of the pixel `(x, y)` as seen by `camera`.
    pub fn trace_pixel(&self, camera: &dyn Camera, x: usize, y: usize) -> Result<Color> {
        let ray = camera.ray_for_pixel(x, y)?;
        self.cast_ray(&ray)
    }

    /// Color along `ray` with `remaining` bounces left.
    pub fn color_at(&self, ray: &Ray, remaining: u32) -> Result<Color> {
        let xs = self.intersect(ray)?;
        match xs.hit_index() {
            Some(index) => {
                let comps = self.prepare_hit(&xs, index, ray)?;
                self.shade_hit(&comps, remaining)
            }
            None => Ok(Color::black()),
        }
    }

    /// Sum the unshadowed lights at a prepared hit, then blend in reflection
    /// and refraction. The result is clamped to the color model.
    pub fn shade_hit(&self, comps: &HitResult, remaining: u32) -> Result<Color> {
        let material = self.material_of(comps)?;
        let color = self.arena.color_at(comps.figure, comps.point)?;

        let mut surface = Color::black();
        for light in &self.lights {
            if self.is_shadowed(light.as_ref(), comps.over_point)? {
                continue;
            }
            surface = surface
                + light.shaded_color(material, color, comps.eye, comps.over_point, comps.normal)?;
        }

        let reflected = self.reflected_color(comps, remaining)?;
        let refracted = self.refracted_color(comps, remaining)?;

        let total = if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = schlick(comps);
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        };
        Ok(self.config.color_model.clamp(total))
    }

    /// True when something lies between `point` and `light`.
    ///
    /// The probe starts `shadow_bias` along the light direction and is
    /// blocked only by hits closer than the light.
    pub fn is_shadowed(&self, light: &dyn Light, point: Tuple4) -> Result<bool> {
        if !light.casts_shadows() {
            return Ok(false);
        }
        let direction = light.direction_from(point)?;
        let origin = point + direction * self.config.shadow_bias;
        let distance = light.distance_from(origin);

        let probe = Ray::new(origin, direction)?;
        let xs = self.intersect(&probe)?;
        Ok(xs.hit().is_some_and(|h| h.t < distance))
    }

    /// Mirror contribution, scaled by the material's reflectance.
    pub fn reflected_color(&self, comps: &HitResult, remaining: u32) -> Result<Color> {
        let reflective = self.material_of(comps)?.reflective;
        if remaining == 0 || reflective == 0.0 {
            return Ok(Color::black());
        }
        let ray = Ray::new(comps.over_point, comps.reflectv)?;
        Ok(self.color_at(&ray, remaining - 1)? * reflective)
    }

    /// Transmitted contribution via Snell's law; black under total
    /// internal reflection.
    pub fn refracted_color(&self, comps: &HitResult, remaining: u32) -> Result<Color> {
        let transparency = self.material_of(comps)?.transparency;
        if remaining == 0 || transparency == 0.0 {
            return Ok(Color::black());
        }

        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eye.dot(&comps.normal);
        let sin2_t = n_ratio * n_ratio * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            return Ok(Color::black());
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normal * (n_ratio * cos_i - cos_t) - comps.eye * n_ratio;
        let ray = Ray::new(comps.under_point, direction)?;
        Ok(self.color_at(&ray, remaining - 1)? * transparency)
    }

    fn material_of(&self, comps: &HitResult) -> Result<&Material> {
        self.arena
            .material(comps.figure)?
            .ok_or_else(|| GeometryError::NotPrimitive(comps.figure).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorModel;
    use crate::error::SceneError;
    use crate::light::{AmbientLight, PointLight};
    use approx::assert_abs_diff_eq;
    use lumen_geom::{FigureId, Pattern, Shape};
    use lumen_math::Matrix4;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn assert_color(c: Color, r: f64, g: f64, b: f64, epsilon: f64) {
        assert_abs_diff_eq!(c.r, r, epsilon = epsilon);
        assert_abs_diff_eq!(c.g, g, epsilon = epsilon);
        assert_abs_diff_eq!(c.b, b, epsilon = epsilon);
    }

    fn ray(o: (f64, f64, f64), d: (f64, f64, f64)) -> Ray {
        Ray::new(Tuple4::point(o.0, o.1, o.2), Tuple4::vector(d.0, d.1, d.2)).unwrap()
    }

    /// Two concentric spheres lit by a white point light and white ambient.
    fn default_scene() -> (Scene, FigureId, FigureId) {
        let mut scene = Scene::new(ShadingConfig::default()).unwrap();
        scene.add_light(AmbientLight::new(Color::white()));
        scene.add_light(PointLight::new(Tuple4::point(-10.0, 10.0, -10.0), Color::white()).unwrap());
        let arena = scene.arena_mut();
        let s1 = arena.insert_primitive(Shape::Sphere);
        arena
            .set_material(
                s1,
                Material {
                    diffuse: 0.7,
                    specular: 0.2,
                    ..Material::solid(Color::new(0.8, 1.0, 0.6))
                },
            )
            .unwrap();
        let s2 = arena.insert_primitive(Shape::Sphere);
        arena.set_transform(s2, Matrix4::scaling(0.5, 0.5, 0.5)).unwrap();
        (scene, s1, s2)
    }

    fn glass_scene() -> (Scene, FigureId) {
        let mut scene = Scene::new(ShadingConfig::default()).unwrap();
        let s = scene.arena_mut().insert_primitive(Shape::Sphere);
        scene.arena_mut().set_material(s, Material::glass()).unwrap();
        (scene, s)
    }

    #[derive(Debug)]
    struct PointPattern;

    impl Pattern for PointPattern {
        fn color_at(&self, p: Tuple4) -> Color {
            Color::new(p.x, p.y, p.z)
        }
    }

    #[test]
    fn test_intersect_all_roots_sorted() {
        let (scene, _, _) = default_scene();
        let xs = scene.intersect(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0))).unwrap();
        let ts: Vec<f64> = xs.iter().map(|x| x.t).collect();
        assert_eq!(ts, vec![4.0, 4.5, 5.5, 6.0]);
    }

    #[test]
    fn test_cast_ray_miss_and_hit() {
        let (scene, _, _) = default_scene();
        assert_eq!(scene.cast_ray(&ray((0.0, 0.0, -5.0), (0.0, 1.0, 0.0))).unwrap(), Color::black());
        let c = scene.cast_ray(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0))).unwrap();
        assert_color(c, 0.38066, 0.47583, 0.2855, 1e-4);
    }

    #[test]
    fn test_shading_from_inside() {
        let mut scene = Scene::new(ShadingConfig::default()).unwrap();
        scene.add_light(AmbientLight::new(Color::white()));
        scene.add_light(PointLight::new(Tuple4::point(0.0, 0.25, 0.0), Color::white()).unwrap());
        let arena = scene.arena_mut();
        let s1 = arena.insert_primitive(Shape::Sphere);
        arena
            .set_material(s1, Material { diffuse: 0.7, specular: 0.2, ..Material::default() })
            .unwrap();
        let s2 = arena.insert_primitive(Shape::Sphere);
        arena.set_transform(s2, Matrix4::scaling(0.5, 0.5, 0.5)).unwrap();

        let r = ray((0.0, 0.0, 0.0), (0.0, 0.0, 1.0));
        let xs = scene.intersect(&r).unwrap();
        let index = xs.hit_index().unwrap();
        assert_eq!(xs[index].figure, s2);
        let comps = scene.prepare_hit(&xs, index, &r).unwrap();
        let c = scene.shade_hit(&comps, 5).unwrap();
        assert_color(c, 0.90498, 0.90498, 0.90498, 1e-4);
    }

    #[test]
    fn test_shade_hit_in_shadow_keeps_ambient() {
        let mut scene = Scene::new(ShadingConfig::default()).unwrap();
        scene.add_light(AmbientLight::new(Color::white()));
        scene.add_light(PointLight::new(Tuple4::point(0.0, 0.0, -10.0), Color::white()).unwrap());
        let arena = scene.arena_mut();
        arena.insert_primitive(Shape::Sphere);
        let s2 = arena.insert_primitive(Shape::Sphere);
        arena.set_transform(s2, Matrix4::translation(0.0, 0.0, 10.0)).unwrap();

        let c = scene.cast_ray(&ray((0.0, 0.0, 5.0), (0.0, 0.0, 1.0))).unwrap();
        assert_eq!(c, Color::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn test_is_shadowed_cases() {
        let (scene, _, _) = default_scene();
        let light = scene.lights()[1].as_ref();
        let cases = [
            ((0.0, 10.0, 0.0), false),
            ((10.0, -10.0, 10.0), true),
            ((-20.0, 20.0, -20.0), false),
            ((-2.0, 2.0, -2.0), false),
        ];
        for ((x, y, z), expected) in cases {
            assert_eq!(scene.is_shadowed(light, Tuple4::point(x, y, z)).unwrap(), expected, "({x}, {y}, {z})");
        }
        let ambient = scene.lights()[0].as_ref();
        assert!(!scene.is_shadowed(ambient, Tuple4::point(10.0, -10.0, 10.0)).unwrap());
    }

    #[test]
    fn test_light_behind_sphere_shadows_surface_point() {
        let mut scene = Scene::new(ShadingConfig::default()).unwrap();
        scene.arena_mut().insert_primitive(Shape::Sphere);
        let surface = Tuple4::point(0.0, 0.0, -1.0001);

        let behind = PointLight::new(Tuple4::point(0.0, 0.0, 10.0), Color::white()).unwrap();
        assert!(scene.is_shadowed(&behind, surface).unwrap());

        let in_front = PointLight::new(Tuple4::point(0.0, 0.0, -10.0), Color::white()).unwrap();
        assert!(!scene.is_shadowed(&in_front, surface).unwrap());
    }

    #[test]
    fn test_reflected_color_for_matte_surface_is_black() {
        let (scene, _, _) = default_scene();
        let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));
        let xs = scene.intersect(&r).unwrap();
        let comps = scene.prepare_hit(&xs, 0, &r).unwrap();
        assert_eq!(scene.reflected_color(&comps, 5).unwrap(), Color::black());
    }

    fn with_mirror_floor(reflective: f64) -> (Scene, Ray) {
        let (mut scene, _, _) = default_scene();
        let arena = scene.arena_mut();
        let floor = arena.insert_primitive(Shape::Plane);
        arena.set_transform(floor, Matrix4::translation(0.0, -1.0, 0.0)).unwrap();
        arena.set_material(floor, Material { reflective, ..Material::default() }).unwrap();
        (scene, ray((0.0, 0.0, -3.0), (0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2)))
    }

    #[test]
    fn test_reflective_floor() {
        let (scene, r) = with_mirror_floor(0.5);
        let xs = scene.intersect(&r).unwrap();
        let index = xs.hit_index().unwrap();
        assert_abs_diff_eq!(xs[index].t, 2f64.sqrt(), epsilon = 1e-9);
        let comps = scene.prepare_hit(&xs, index, &r).unwrap();

        assert_color(scene.reflected_color(&comps, 5).unwrap(), 0.19032, 0.2379, 0.14274, 1e-3);
        assert_color(scene.shade_hit(&comps, 5).unwrap(), 0.87677, 0.92436, 0.82918, 1e-3);
        assert_eq!(scene.reflected_color(&comps, 0).unwrap(), Color::black());
    }

    #[test]
    fn test_mutual_mirrors_terminate() {
        let mut scene = Scene::new(ShadingConfig::default()).unwrap();
        scene.add_light(PointLight::new(Tuple4::origin(), Color::white()).unwrap());
        let arena = scene.arena_mut();
        for y in [-1.0, 1.0] {
            let p = arena.insert_primitive(Shape::Plane);
            arena.set_transform(p, Matrix4::translation(0.0, y, 0.0)).unwrap();
            arena.set_material(p, Material { reflective: 1.0, ..Material::default() }).unwrap();
        }
        assert!(scene.cast_ray(&ray((0.0, 0.0, 0.0), (0.0, 1.0, 0.0))).is_ok());
    }

    #[test]
    fn test_refracted_color_opaque_and_depth_limit() {
        let (scene, _, _) = default_scene();
        let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));
        let xs = scene.intersect(&r).unwrap();
        let comps = scene.prepare_hit(&xs, 0, &r).unwrap();
        assert_eq!(scene.refracted_color(&comps, 5).unwrap(), Color::black());

        let (glass, _) = glass_scene();
        let xs = glass.intersect(&r).unwrap();
        let comps = glass.prepare_hit(&xs, 0, &r).unwrap();
        assert_eq!(glass.refracted_color(&comps, 0).unwrap(), Color::black());
    }

    #[test]
    fn test_total_internal_reflection_is_black() {
        let (scene, _) = glass_scene();
        let r = ray((0.0, 0.0, FRAC_1_SQRT_2), (0.0, 1.0, 0.0));
        let xs = scene.intersect(&r).unwrap();
        assert_eq!(xs.len(), 2);
        let comps = scene.prepare_hit(&xs, 1, &r).unwrap();
        assert_eq!((comps.n1, comps.n2), (1.5, 1.0));
        assert_eq!(scene.refracted_color(&comps, 5).unwrap(), Color::black());
        assert_eq!(schlick(&comps), 1.0);
    }

    #[test]
    fn test_refracted_color_through_inner_sphere() {
        let (mut scene, s1, s2) = default_scene();
        let arena = scene.arena_mut();
        arena
            .set_material(
                s1,
                Material {
                    ambient: 1.0,
                    diffuse: 0.7,
                    specular: 0.2,
                    ..Material::default().with_pattern(PointPattern)
                },
            )
            .unwrap();
        arena
            .set_material(s2, Material { transparency: 1.0, refractive_index: 1.5, ..Material::default() })
            .unwrap();

        let r = ray((0.0, 0.0, 0.1), (0.0, 1.0, 0.0));
        let xs = scene.intersect(&r).unwrap();
        assert_eq!(xs.len(), 4);
        let comps = scene.prepare_hit(&xs, 2, &r).unwrap();
        assert_color(scene.refracted_color(&comps, 5).unwrap(), 0.0, 0.99888, 0.04725, 1e-3);
    }

    fn with_glass_floor(reflective: f64) -> (Scene, Ray) {
        let (mut scene, _, _) = default_scene();
        let arena = scene.arena_mut();
        let floor = arena.insert_primitive(Shape::Plane);
        arena.set_transform(floor, Matrix4::translation(0.0, -1.0, 0.0)).unwrap();
        arena
            .set_material(
                floor,
                Material { reflective, transparency: 0.5, refractive_index: 1.5, ..Material::default() },
            )
            .unwrap();
        let ball = arena.insert_primitive(Shape::Sphere);
        arena.set_transform(ball, Matrix4::translation(0.0, -3.5, -0.5)).unwrap();
        arena
            .set_material(ball, Material { ambient: 0.5, ..Material::solid(Color::new(1.0, 0.0, 0.0)) })
            .unwrap();
        (scene, ray((0.0, 0.0, -3.0), (0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2)))
    }

    #[test]
    fn test_transparent_floor() {
        let (scene, r) = with_glass_floor(0.0);
        let xs = scene.intersect(&r).unwrap();
        let comps = scene.prepare_hit(&xs, xs.hit_index().unwrap(), &r).unwrap();
        assert_color(scene.shade_hit(&comps, 5).unwrap(), 0.93642, 0.68642, 0.68642, 1e-3);
    }

    #[test]
    fn test_reflective_transparent_floor_uses_schlick() {
        let (scene, r) = with_glass_floor(0.5);
        let xs = scene.intersect(&r).unwrap();
        let comps = scene.prepare_hit(&xs, xs.hit_index().unwrap(), &r).unwrap();
        assert_color(scene.shade_hit(&comps, 5).unwrap(), 0.93391, 0.69643, 0.69243, 1e-3);
    }

    #[test]
    fn test_schlick_values() {
        let (scene, _) = glass_scene();

        let r = ray((0.0, 0.0, 0.0), (0.0, 1.0, 0.0));
        let xs = scene.intersect(&r).unwrap();
        let comps = scene.prepare_hit(&xs, 1, &r).unwrap();
        assert_abs_diff_eq!(schlick(&comps), 0.04, epsilon = 1e-5);

        let r = ray((0.0, 0.99, -2.0), (0.0, 0.0, 1.0));
        let xs = scene.intersect(&r).unwrap();
        let comps = scene.prepare_hit(&xs, 0, &r).unwrap();
        assert_abs_diff_eq!(schlick(&comps), 0.48873, epsilon = 1e-5);
    }

    struct GridCamera;

    impl Camera for GridCamera {
        fn hsize(&self) -> usize {
            3
        }

        fn vsize(&self) -> usize {
            3
        }

        fn ray_for_pixel(&self, x: usize, y: usize) -> lumen_math::Result<Ray> {
            Ray::new(
                Tuple4::point(x as f64 - 1.0, 1.0 - y as f64, -5.0),
                Tuple4::vector(0.0, 0.0, 1.0),
            )
        }
    }

    #[test]
    fn test_trace_pixel() {
        let (scene, _, _) = default_scene();
        let camera = GridCamera;
        let center = scene.trace_pixel(&camera, 1, 1).unwrap();
        assert_eq!(center, scene.cast_ray(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0))).unwrap());
        assert_eq!(scene.trace_pixel(&camera, 0, 0).unwrap(), Color::black());
        assert_eq!((camera.hsize(), camera.vsize()), (3, 3));
    }

    #[test]
    fn test_rgb8_color_model_clamps_to_white() {
        let config = ShadingConfig { color_model: ColorModel::rgb8(), ..ShadingConfig::default() };
        let mut scene = Scene::new(config).unwrap();
        scene.add_light(AmbientLight::new(Color::new(255.0, 255.0, 255.0)));
        scene.add_light(PointLight::new(Tuple4::point(0.0, 0.0, -10.0), Color::new(255.0, 255.0, 255.0)).unwrap());
        scene.arena_mut().insert_primitive(Shape::Sphere);
        let c = scene.cast_ray(&ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0))).unwrap();
        assert_eq!(c, Color::new(255.0, 255.0, 255.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ShadingConfig { shadow_bias: -1.0, ..ShadingConfig::default() };
        assert!(matches!(Scene::new(config), Err(SceneError::InvalidConfig(_))));
    }
}
