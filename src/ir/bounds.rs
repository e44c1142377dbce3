//! Axis-aligned bounding boxes.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::transform::Transform;

/// An axis-aligned bounding box (xmin, ymin, xmax, ymax).
///
/// A freshly created box is *empty*: its minimums are `+inf` and its
/// maximums `-inf`, so that extending it with the first point collapses it
/// onto that point. Empty boxes have no meaningful width or height.
#[derive(Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bounds {
    /// Creates an empty bounding box.
    #[inline]
    pub fn empty() -> Self {
        Self {
            xmin: f64::INFINITY,
            ymin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    /// Creates a bounding box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns true if no point has been added to this box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    #[inline]
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.xmax - self.xmin
        }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.ymax - self.ymin
        }
    }

    /// Grows the box to include a point.
    #[inline]
    pub fn extend_point(&mut self, p: Point) {
        self.xmin = self.xmin.min(p.x);
        self.ymin = self.ymin.min(p.y);
        self.xmax = self.xmax.max(p.x);
        self.ymax = self.ymax.max(p.y);
    }

    /// Grows the box to include another box. Merging an empty box is a no-op.
    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.xmin = self.xmin.min(other.xmin);
        self.ymin = self.ymin.min(other.ymin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymax = self.ymax.max(other.ymax);
    }

    /// Returns true if `other` lies entirely inside this box (edges inclusive).
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.xmin >= self.xmin
            && other.ymin >= self.ymin
            && other.xmax <= self.xmax
            && other.ymax <= self.ymax
    }

    /// Projects both corners through a transform and re-orders them so the
    /// result is still min/max ordered.
    pub fn transformed(&self, t: &Transform) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        let a = t.apply(Point::new(self.xmin, self.ymin));
        let b = t.apply(Point::new(self.xmax, self.ymax));
        Bounds::from_xyxy(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Builds the transform that maps this box onto `dest`, corner to corner.
    ///
    /// An axis with zero extent gets unit scale, so that a single vertical or
    /// horizontal line still maps onto the destination origin.
    pub fn transform_to(&self, dest: &Bounds) -> Transform {
        let (mx, bx) = fit_axis(self.xmin, self.width(), dest.xmin, dest.width());
        let (my, by) = fit_axis(self.ymin, self.height(), dest.ymin, dest.height());
        Transform::new(mx, my, bx, by)
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }
}

fn fit_axis(src_min: f64, src_size: f64, dest_min: f64, dest_size: f64) -> (f64, f64) {
    let scale = if src_size > 0.0 && dest_size > 0.0 {
        dest_size / src_size
    } else {
        1.0
    };
    (scale, dest_min - src_min * scale)
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("Bounds(empty)");
        }
        f.debug_struct("Bounds")
            .field("xmin", &self.xmin)
            .field("ymin", &self.ymin)
            .field("xmax", &self.xmax)
            .field("ymax", &self.ymax)
            .finish()
    }
}

// Wire form is the GeoJSON-style `[xmin, ymin, xmax, ymax]` array.
impl Serialize for Bounds {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [xmin, ymin, xmax, ymax] = <[f64; 4]>::deserialize(deserializer)?;
        Ok(Bounds::from_xyxy(xmin, ymin, xmax, ymax))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds() {
        let b = Bounds::empty();
        assert!(b.is_empty());
        assert_eq!(b.width(), 0.0);
        assert_eq!(b.height(), 0.0);
    }

    #[test]
    fn test_extend_and_merge() {
        let mut a = Bounds::empty();
        a.extend_point(Point::new(1.0, 2.0));
        a.extend_point(Point::new(-1.0, 5.0));
        assert_eq!(a.to_array(), [-1.0, 2.0, 1.0, 5.0]);

        let mut b = Bounds::from_xyxy(0.0, 0.0, 3.0, 3.0);
        b.merge(&a);
        assert_eq!(b.to_array(), [-1.0, 0.0, 3.0, 5.0]);

        b.merge(&Bounds::empty());
        assert_eq!(b.to_array(), [-1.0, 0.0, 3.0, 5.0]);
    }

    #[test]
    fn test_contains_bounds() {
        let outer = Bounds::from_xyxy(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_bounds(&Bounds::from_xyxy(1.0, 1.0, 9.0, 10.0)));
        assert!(!outer.contains_bounds(&Bounds::from_xyxy(-1.0, 1.0, 9.0, 9.0)));
        assert!(!outer.contains_bounds(&Bounds::empty()));
    }

    #[test]
    fn test_transform_to_grid() {
        let src = Bounds::from_xyxy(0.0, 0.0, 10.0, 10.0);
        let dest = Bounds::from_xyxy(0.0, 0.0, 99.0, 99.0);
        let t = src.transform_to(&dest);
        assert!((t.mx - 9.9).abs() < 1e-12);
        assert_eq!(t.apply(Point::new(10.0, 10.0)), Point::new(99.0, 99.0));
    }

    #[test]
    fn test_transform_to_degenerate_axis() {
        let src = Bounds::from_xyxy(5.0, 0.0, 5.0, 10.0);
        let dest = Bounds::from_xyxy(0.0, 0.0, 0.0, 20.0);
        let t = src.transform_to(&dest);
        assert_eq!(t.mx, 1.0);
        assert_eq!(t.apply(Point::new(5.0, 10.0)), Point::new(0.0, 20.0));
    }

    #[test]
    fn test_bounds_serde() {
        let b = Bounds::from_xyxy(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
        let back: Bounds = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, b);
    }
}
