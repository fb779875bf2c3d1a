//! Linear RGB color values returned per traced ray.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::approx_eq;

/// An RGB triple. Channels are unbounded until clamped by a color model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Color {
    /// New color from channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// All channels zero.
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// All channels one.
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Component-wise (Hadamard) product.
    pub fn hadamard(&self, other: &Color) -> Color {
        Color::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Clamp every channel to `[0, ceiling]`.
    pub fn clamp(&self, ceiling: f64) -> Color {
        Color::new(
            self.r.clamp(0.0, ceiling),
            self.g.clamp(0.0, ceiling),
            self.b.clamp(0.0, ceiling),
        )
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.r, other.r) && approx_eq(self.g, other.g) && approx_eq(self.b, other.b)
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Sub for Color {
    type Output = Color;
    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f64> for Color {
    type Output = Color;
    fn mul(self, k: f64) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Mul for Color {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        self.hadamard(&rhs)
    }
}

impl std::iter::Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::black(), |acc, c| acc + c)
    }
}
