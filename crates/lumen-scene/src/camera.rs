//! Camera collaborator: turns pixel coordinates into primary rays.

use lumen_math::Ray;

/// Anything that can generate a primary ray per pixel.
pub trait Camera {
    /// Image width in pixels.
    fn hsize(&self) -> usize;

    /// Image height in pixels.
    fn vsize(&self) -> usize;

    /// World-space ray through the center of pixel `(x, y)`.
    fn ray_for_pixel(&self, x: usize, y: usize) -> lumen_math::Result<Ray>;
}
