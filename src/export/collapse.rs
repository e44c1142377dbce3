//! Removal of collapsed (zero-extent) arcs.

use crate::ir::{ArcPool, Point, RemapTable};

/// Returns true if no vertex of the arc differs from its first vertex.
///
/// Only the first vertex is compared against: an arc that leaves and comes
/// back, like `(0,0) (5,5) (0,0)`, is not collapsed.
pub fn is_collapsed_arc<I: IntoIterator<Item = Point>>(points: I) -> bool {
    let mut iter = points.into_iter();
    match iter.next() {
        None => true,
        Some(first) => iter.all(|p| p.x == first.x && p.y == first.y),
    }
}

/// Drops every collapsed arc from `pool` and returns the remap table.
pub fn filter_collapsed_arcs<P: ArcPool>(pool: &mut P) -> RemapTable {
    let table = pool.filter(|_, points| !is_collapsed_arc(points));
    let removed = table.removed_count();
    if removed > 0 {
        tracing::info!(removed, retained = table.retained_count(), "removed collapsed arcs");
    }
    table
}
