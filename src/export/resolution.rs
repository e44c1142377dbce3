//! Choosing the quantization grid for an export.

use std::fmt;
use std::num::NonZeroU32;

use crate::ir::{ArcPool, Bounds, Transform};

/// Target cell size as a fraction of the average segment offset, used when
/// no explicit grid or precision is requested.
pub const AUTO_RESOLUTION_FACTOR: f64 = 0.02;

/// How coordinates are mapped onto the output grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Quantization {
    /// Keep source coordinates.
    None,
    /// An `n` by `n` integer grid spanning the data bounds.
    Grid(NonZeroU32),
    /// Grid cells of about this size, in source units. The cell count is
    /// rounded up so the grid spans the whole extent.
    Precision(f64),
    /// Cell size derived from the average segment length.
    Auto,
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantization::None => f.write_str("none"),
            Quantization::Grid(n) => write!(f, "grid {}", n),
            Quantization::Precision(p) => write!(f, "precision {}", p),
            Quantization::Auto => f.write_str("auto"),
        }
    }
}

/// Picks the source-to-grid transform for `pool`, or `None` to keep source
/// coordinates.
///
/// Grid extents are rounded up so that the corners of the source bounds land
/// exactly on grid lines; data touching the poles or the antimeridian must
/// not be clipped by quantization. An empty pool never gets a transform.
pub fn select_transform<P: ArcPool>(pool: &P, quantization: Quantization) -> Option<Transform> {
    let bounds = pool.bounds();
    if bounds.is_empty() {
        return None;
    }

    match quantization {
        Quantization::None => None,
        Quantization::Grid(n) => {
            let max = f64::from(n.get() - 1);
            Some(grid_transform(&bounds, max, max))
        }
        Quantization::Precision(precision) => Some(grid_transform(
            &bounds,
            bounds.width() / precision,
            bounds.height() / precision,
        )),
        Quantization::Auto => {
            let (res_x, res_y) = auto_resolution(pool)?;
            Some(grid_transform(
                &bounds,
                bounds.width() / res_x,
                bounds.height() / res_y,
            ))
        }
    }
}

/// Selects a transform and, if there is one, applies it to `pool` in place
/// with rounding.
pub fn quantize<P: ArcPool>(pool: &mut P, quantization: Quantization) -> Option<Transform> {
    let transform = select_transform(pool, quantization)?;
    pool.apply_transform(&transform, true);
    tracing::debug!(
        mx = transform.mx,
        my = transform.my,
        bx = transform.bx,
        by = transform.by,
        "quantized arcs"
    );
    Some(transform)
}

/// Cell size per axis for automatic quantization.
///
/// An axis with no movement at all (e.g. only vertical segments) borrows the
/// other axis's cell size. Returns `None` if the pool has no usable segments.
pub fn auto_resolution<P: ArcPool>(pool: &P) -> Option<(f64, f64)> {
    let (dx, dy) = pool.average_segment()?;
    let rx = dx * AUTO_RESOLUTION_FACTOR;
    let ry = dy * AUTO_RESOLUTION_FACTOR;
    match (rx > 0.0, ry > 0.0) {
        (true, true) => Some((rx, ry)),
        (true, false) => Some((rx, rx)),
        (false, true) => Some((ry, ry)),
        (false, false) => None,
    }
}

fn grid_transform(bounds: &Bounds, xmax: f64, ymax: f64) -> Transform {
    let dest = Bounds::from_xyxy(0.0, 0.0, xmax.ceil(), ymax.ceil());
    bounds.transform_to(&dest)
}
