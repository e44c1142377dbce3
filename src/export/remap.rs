//! Rewriting arc references after arcs have been removed from the pool.

use crate::error::TopoError;
use crate::ir::{ArcRef, RemapTable, Ring, Shape};

/// Maps one reference into the compacted index space.
///
/// Returns `Ok(None)` if the arc was removed. The reference keeps its
/// direction. A table entry that moves an arc to a *higher* index, or a
/// reference past the end of the table, is an [`TopoError::ArcIndexProblem`].
pub fn remap_arc_ref(arc: ArcRef, table: &RemapTable) -> Result<Option<ArcRef>, TopoError> {
    let old = arc.index();
    match table.entry(old) {
        None => Err(TopoError::ArcIndexProblem {
            arc: old,
            remapped: None,
        }),
        Some(None) => Ok(None),
        Some(Some(new)) if new <= old => Ok(Some(arc.with_index(new as u32))),
        Some(Some(new)) => Err(TopoError::ArcIndexProblem {
            arc: old,
            remapped: Some(new),
        }),
    }
}

/// Returns a copy of `shape` in the new index space, without rings that lost
/// all of their arcs.
pub fn remap_shape(shape: &Shape, table: &RemapTable) -> Result<Shape, TopoError> {
    let mut dest = Shape::with_capacity(shape.len());
    for ring in shape {
        let mut remapped = Ring::with_capacity(ring.len());
        for &arc in ring {
            if let Some(r) = remap_arc_ref(arc, table)? {
                remapped.push(r);
            }
        }
        if !remapped.is_empty() {
            dest.push(remapped);
        }
    }
    Ok(dest)
}

/// Remaps every shape of a layer. Null shapes stay null.
pub fn remap_shapes(
    shapes: &[Option<Shape>],
    table: &RemapTable,
) -> Result<Vec<Option<Shape>>, TopoError> {
    shapes
        .iter()
        .map(|shape| shape.as_ref().map(|s| remap_shape(s, table)).transpose())
        .collect()
}
