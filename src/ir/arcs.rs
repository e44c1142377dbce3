//! Shared arc storage.
//!
//! Shapes never own coordinates: they reference arcs in a pool by index.
//! [`ArcPool`] is the capability the exporter needs from that pool, and
//! [`ArcCollection`] is the flat-array implementation used throughout the
//! crate.

use super::bounds::Bounds;
use super::point::Point;
use super::transform::Transform;

/// Mapping from old arc index to new arc index after removing arcs.
///
/// Retained arcs keep their relative order and are numbered densely, so a
/// retained arc's new index is never larger than its old one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemapTable {
    entries: Vec<Option<u32>>,
}

impl RemapTable {
    /// Builds a table from raw entries (`None` = removed).
    ///
    /// No ordering is enforced here; consumers check the compaction
    /// invariant when they apply the table.
    pub fn from_entries(entries: Vec<Option<u32>>) -> Self {
        Self { entries }
    }

    /// Builds a table from per-arc keep flags.
    pub fn from_keep_flags(flags: &[bool]) -> Self {
        let mut next = 0u32;
        let entries = flags
            .iter()
            .map(|&keep| {
                if keep {
                    next += 1;
                    Some(next - 1)
                } else {
                    None
                }
            })
            .collect();
        Self { entries }
    }

    /// Number of arcs in the pool the table was built against.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry for `old`: `None` if out of range, `Some(None)` if removed.
    #[inline]
    pub fn entry(&self, old: usize) -> Option<Option<usize>> {
        self.entries.get(old).map(|e| e.map(|n| n as usize))
    }

    /// New index of a retained arc.
    #[inline]
    pub fn new_index(&self, old: usize) -> Option<usize> {
        self.entry(old).flatten()
    }

    pub fn retained_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn removed_count(&self) -> usize {
        self.len() - self.retained_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.entries.iter().map(|e| e.map(|n| n as usize))
    }
}

/// Forward (or, via `rev()`, backward) cursor over one arc's vertices.
#[derive(Clone, Debug)]
pub struct ArcPoints<'a> {
    xx: &'a [f64],
    yy: &'a [f64],
    front: usize,
    back: usize,
}

impl<'a> ArcPoints<'a> {
    pub fn new(xx: &'a [f64], yy: &'a [f64]) -> Self {
        let len = xx.len().min(yy.len());
        Self {
            xx,
            yy,
            front: 0,
            back: len,
        }
    }
}

impl Iterator for ArcPoints<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.front >= self.back {
            return None;
        }
        let p = Point::new(self.xx[self.front], self.yy[self.front]);
        self.front += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for ArcPoints<'_> {
    fn next_back(&mut self) -> Option<Point> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(Point::new(self.xx[self.back], self.yy[self.back]))
    }
}

impl ExactSizeIterator for ArcPoints<'_> {}

/// What the exporter needs from an arc store.
pub trait ArcPool {
    /// Number of arcs currently in the pool.
    fn arc_count(&self) -> usize;

    /// Vertices of one arc, in stored order.
    ///
    /// # Panics
    /// Panics if `arc >= self.arc_count()`.
    fn arc_points(&self, arc: usize) -> ArcPoints<'_>;

    /// An independent working copy with consecutive duplicate vertices removed.
    fn filtered_copy(&self) -> Self
    where
        Self: Sized;

    /// Bounding box of every vertex in the pool.
    fn bounds(&self) -> Bounds;

    /// Mean absolute x and y offsets over all segments, or `None` if the
    /// pool has no segments.
    fn average_segment(&self) -> Option<(f64, f64)>;

    /// Maps every vertex through `t` in place, optionally rounding to integers.
    fn apply_transform(&mut self, t: &Transform, round: bool);

    /// Drops every arc for which `keep` returns false, compacting the pool
    /// in place, and returns the old-to-new index table.
    fn filter<F>(&mut self, keep: F) -> RemapTable
    where
        F: FnMut(usize, ArcPoints<'_>) -> bool;
}

/// Arcs stored as flat coordinate arrays.
///
/// `nn[i]` is the vertex count of arc `i`; `ii[i]` is the offset of its first
/// vertex in `xx`/`yy`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArcCollection {
    xx: Vec<f64>,
    yy: Vec<f64>,
    nn: Vec<usize>,
    ii: Vec<usize>,
}

impl ArcCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from per-arc vertex lists.
    pub fn from_arcs<I, A>(arcs: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: IntoIterator<Item = Point>,
    {
        let mut coll = Self::new();
        for arc in arcs {
            coll.push_arc(arc);
        }
        coll
    }

    /// Appends an arc and returns its index.
    pub fn push_arc<A: IntoIterator<Item = Point>>(&mut self, arc: A) -> usize {
        let start = self.xx.len();
        for p in arc {
            self.xx.push(p.x);
            self.yy.push(p.y);
        }
        self.ii.push(start);
        self.nn.push(self.xx.len() - start);
        self.nn.len() - 1
    }

    /// Total number of vertices across all arcs.
    pub fn point_count(&self) -> usize {
        self.xx.len()
    }

    /// Copies one arc's vertices into a vector.
    pub fn arc_to_vec(&self, arc: usize) -> Vec<Point> {
        self.arc_points(arc).collect()
    }

    fn arc_range(&self, arc: usize) -> std::ops::Range<usize> {
        let start = self.ii[arc];
        start..start + self.nn[arc]
    }
}

impl ArcPool for ArcCollection {
    fn arc_count(&self) -> usize {
        self.nn.len()
    }

    fn arc_points(&self, arc: usize) -> ArcPoints<'_> {
        let range = self.arc_range(arc);
        ArcPoints::new(&self.xx[range.clone()], &self.yy[range])
    }

    fn filtered_copy(&self) -> Self {
        let mut copy = ArcCollection {
            xx: Vec::with_capacity(self.xx.len()),
            yy: Vec::with_capacity(self.yy.len()),
            nn: Vec::with_capacity(self.nn.len()),
            ii: Vec::with_capacity(self.ii.len()),
        };
        for arc in 0..self.arc_count() {
            let mut prev: Option<Point> = None;
            copy.push_arc(self.arc_points(arc).filter(|&p| {
                let dup = prev == Some(p);
                prev = Some(p);
                !dup
            }));
        }
        copy
    }

    fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for (&x, &y) in self.xx.iter().zip(&self.yy) {
            bounds.extend_point(Point::new(x, y));
        }
        bounds
    }

    fn average_segment(&self) -> Option<(f64, f64)> {
        let mut dx = 0.0;
        let mut dy = 0.0;
        let mut count = 0usize;
        for arc in 0..self.arc_count() {
            let range = self.arc_range(arc);
            for i in range.start + 1..range.end {
                dx += (self.xx[i] - self.xx[i - 1]).abs();
                dy += (self.yy[i] - self.yy[i - 1]).abs();
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        Some((dx / count as f64, dy / count as f64))
    }

    fn apply_transform(&mut self, t: &Transform, round: bool) {
        for (x, y) in self.xx.iter_mut().zip(self.yy.iter_mut()) {
            let p = t.apply(Point::new(*x, *y));
            if round {
                *x = p.x.round();
                *y = p.y.round();
            } else {
                *x = p.x;
                *y = p.y;
            }
        }
    }

    fn filter<F>(&mut self, mut keep: F) -> RemapTable
    where
        F: FnMut(usize, ArcPoints<'_>) -> bool,
    {
        let flags: Vec<bool> = (0..self.arc_count())
            .map(|arc| keep(arc, self.arc_points(arc)))
            .collect();

        let mut write = 0usize;
        let mut kept_nn = Vec::with_capacity(self.nn.len());
        let mut kept_ii = Vec::with_capacity(self.ii.len());
        for (arc, &keep_arc) in flags.iter().enumerate() {
            if !keep_arc {
                continue;
            }
            let range = self.arc_range(arc);
            let n = range.len();
            // Retained arcs only ever move toward the front.
            self.xx.copy_within(range.clone(), write);
            self.yy.copy_within(range, write);
            kept_ii.push(write);
            kept_nn.push(n);
            write += n;
        }
        self.xx.truncate(write);
        self.yy.truncate(write);
        self.nn = kept_nn;
        self.ii = kept_ii;

        RemapTable::from_keep_flags(&flags)
    }
}
