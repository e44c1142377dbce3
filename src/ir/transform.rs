//! Per-axis affine transforms (scale + translate).

use super::point::Point;

/// An invertible affine mapping `x' = x * mx + bx`, `y' = y * my + by`.
///
/// Used to map source coordinates onto an integer grid for quantized
/// output, and (inverted) to map grid coordinates back to source space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub mx: f64,
    pub my: f64,
    pub bx: f64,
    pub by: f64,
}

impl Transform {
    #[inline]
    pub fn new(mx: f64, my: f64, bx: f64, by: f64) -> Self {
        Self { mx, my, bx, by }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.mx + self.bx, p.y * self.my + self.by)
    }

    /// Returns the inverse mapping.
    ///
    /// Scales are never zero for transforms built by [`Bounds::transform_to`]
    /// (degenerate axes get unit scale).
    ///
    /// [`Bounds::transform_to`]: super::Bounds::transform_to
    pub fn invert(&self) -> Transform {
        Transform::new(
            1.0 / self.mx,
            1.0 / self.my,
            -self.bx / self.mx,
            -self.by / self.my,
        )
    }
}
