//! Light sources and their Phong contributions.

use std::fmt;

use lumen_geom::Material;
use lumen_math::{Color, Tuple4};

use crate::error::Result;

/// A light source as seen by the shading step.
pub trait Light: fmt::Debug + Send + Sync {
    /// Unit vector from `point` toward the light. Zero for lights without
    /// a direction.
    fn direction_from(&self, point: Tuple4) -> Result<Tuple4>;

    /// Distance from `point` to the light; infinite for lights at infinity.
    fn distance_from(&self, point: Tuple4) -> f64;

    /// Contribution of this light at a surface point whose pattern color is
    /// `color`.
    fn shaded_color(
        &self,
        material: &Material,
        color: Color,
        eye: Tuple4,
        point: Tuple4,
        normal: Tuple4,
    ) -> Result<Color>;

    /// Whether occluders can block this light.
    fn casts_shadows(&self) -> bool {
        true
    }
}

/// Diffuse plus specular terms for light arriving along `light_v`.
fn phong(
    material: &Material,
    color: Color,
    intensity: Color,
    light_v: Tuple4,
    eye: Tuple4,
    normal: Tuple4,
) -> Result<Color> {
    let light_dot_normal = light_v.dot(&normal);
    if light_dot_normal < 0.0 {
        return Ok(Color::black());
    }

    let effective = color * intensity;
    let diffuse = effective * (material.diffuse * light_dot_normal);

    let reflect_v = (-light_v).reflect(&normal)?;
    let reflect_dot_eye = reflect_v.dot(&eye);
    let specular = if reflect_dot_eye <= 0.0 {
        Color::black()
    } else {
        intensity * (material.specular * reflect_dot_eye.powf(material.shininess))
    };

    Ok(diffuse + specular)
}

/// A point source radiating in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: Tuple4,
    /// Emitted color.
    pub intensity: Color,
}

impl PointLight {
    /// Light at `position`.
    pub fn new(position: Tuple4, intensity: Color) -> Result<Self> {
        position.require_point("point light position")?;
        Ok(Self { position, intensity })
    }
}

impl Light for PointLight {
    fn direction_from(&self, point: Tuple4) -> Result<Tuple4> {
        Ok((self.position - point).normalize()?)
    }

    fn distance_from(&self, point: Tuple4) -> f64 {
        (self.position - point).xyz_norm()
    }

    fn shaded_color(
        &self,
        material: &Material,
        color: Color,
        eye: Tuple4,
        point: Tuple4,
        normal: Tuple4,
    ) -> Result<Color> {
        let light_v = self.direction_from(point)?;
        phong(material, color, self.intensity, light_v, eye, normal)
    }
}

/// Parallel light arriving from infinitely far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit direction the light travels in.
    pub direction: Tuple4,
    /// Emitted color.
    pub intensity: Color,
}

impl DirectionalLight {
    /// Light travelling along `direction` (normalized here).
    pub fn new(direction: Tuple4, intensity: Color) -> Result<Self> {
        Ok(Self {
            direction: direction.normalize()?,
            intensity,
        })
    }
}

impl Light for DirectionalLight {
    fn direction_from(&self, _point: Tuple4) -> Result<Tuple4> {
        Ok(-self.direction)
    }

    fn distance_from(&self, _point: Tuple4) -> f64 {
        f64::INFINITY
    }

    fn shaded_color(
        &self,
        material: &Material,
        color: Color,
        eye: Tuple4,
        _point: Tuple4,
        normal: Tuple4,
    ) -> Result<Color> {
        phong(material, color, self.intensity, -self.direction, eye, normal)
    }
}

/// Uniform light from everywhere; contributes only the ambient term and is
/// never shadowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Emitted color.
    pub intensity: Color,
}

impl AmbientLight {
    /// Ambient light of the given color.
    pub fn new(intensity: Color) -> Self {
        Self { intensity }
    }
}

impl Light for AmbientLight {
    fn direction_from(&self, _point: Tuple4) -> Result<Tuple4> {
        Ok(Tuple4::zero())
    }

    fn distance_from(&self, _point: Tuple4) -> f64 {
        f64::INFINITY
    }

    fn shaded_color(
        &self,
        material: &Material,
        color: Color,
        _eye: Tuple4,
        _point: Tuple4,
        _normal: Tuple4,
    ) -> Result<Color> {
        Ok(color * self.intensity * material.ambient)
    }

    fn casts_shadows(&self) -> bool {
        false
    }
}
