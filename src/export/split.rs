//! Splitting one topology into one standalone topology per object.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::TopoError;
use crate::topology::{Objects, Topology};

/// Splits `topology` by object name.
///
/// Each piece keeps only the arcs its object references, renumbered densely
/// in their original order, plus the shared transform. Arcs are copied
/// as-is: delta-encoded arcs decode independently of their neighbours.
///
/// # Errors
/// Returns [`TopoError::ArcIndexProblem`] if an object references an arc
/// past the end of the arc array.
pub fn split_topology(topology: &Topology) -> Result<BTreeMap<String, Topology>, TopoError> {
    let arc_count = topology.arcs.len();
    let mut pieces = BTreeMap::new();

    for (name, object) in topology.objects.iter() {
        let used: BTreeSet<usize> = object
            .geometries
            .iter()
            .filter_map(|g| g.geometry.as_ref())
            .flat_map(|g| g.arc_refs())
            .map(|r| r.index())
            .collect();
        match used.last() {
            Some(&arc) if arc >= arc_count => {
                return Err(TopoError::ArcIndexProblem {
                    arc,
                    remapped: None,
                })
            }
            _ => {}
        }
        let indices: Vec<usize> = used.into_iter().collect();
        let new_index: BTreeMap<usize, u32> = indices
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new as u32))
            .collect();

        let mut object = object.clone();
        for record in &mut object.geometries {
            if let Some(geometry) = record.geometry.as_mut() {
                geometry.map_refs(|r| r.with_index(new_index[&r.index()]));
            }
        }

        let bbox = object.bbox;
        let mut objects = Objects::new();
        objects.insert(name, object);
        pieces.insert(
            name.to_string(),
            Topology {
                transform: topology.transform,
                objects,
                arcs: topology.arcs.subset(&indices),
                bbox,
            },
        );
    }

    Ok(pieces)
}
