//! Wire types for exported topologies.
//!
//! These mirror the TopoJSON object tree field for field; serializing a
//! [`Topology`] with `serde_json` produces a valid TopoJSON document.
//!
//! A `bbox` is written only when it has content. A topology or layer with
//! no exported vertices has no bounds, and an empty box has no meaningful
//! corner values, so the member is left out rather than written as `null`.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ir::{ArcRef, Bounds, Transform};

/// The top-level `{"type": "Topology", ...}` object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Topology {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<WireTransform>,

    pub objects: Objects,

    pub arcs: ArcArray,

    /// Union of every object's bbox; absent when nothing was exported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bounds>,
}

/// The `transform` member: maps grid coordinates back to source space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl WireTransform {
    /// Wire form of a grid-to-source transform.
    pub fn from_inverse(inv: &Transform) -> Self {
        // `+ 0.0` turns -0.0 into 0.0
        Self {
            scale: [inv.mx, inv.my],
            translate: [inv.bx + 0.0, inv.by + 0.0],
        }
    }

    /// The grid-to-source transform this wire object describes.
    pub fn to_transform(&self) -> Transform {
        Transform::new(
            self.scale[0],
            self.scale[1],
            self.translate[0],
            self.translate[1],
        )
    }
}

/// Named objects, serialized as a JSON object in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Objects(Vec<(String, GeometryCollection)>);

impl Objects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object; a later object with the same name replaces the
    /// earlier one in place.
    pub fn insert(&mut self, name: impl Into<String>, object: GeometryCollection) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = object,
            None => self.0.push((name, object)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&GeometryCollection> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GeometryCollection)> {
        self.0.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Objects {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, object) in &self.0 {
            map.serialize_entry(name, object)?;
        }
        map.end()
    }
}

/// `{"type": "GeometryCollection", ...}`: one exported layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct GeometryCollection {
    /// Bounds of this layer's exported paths; absent for an all-null layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bounds>,
    pub geometries: Vec<GeometryRecord>,
}

/// A geometry with its arc references nested to the depth its type needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    LineString(Vec<ArcRef>),
    MultiLineString(Vec<Vec<ArcRef>>),
    Polygon(Vec<Vec<ArcRef>>),
    MultiPolygon(Vec<Vec<Vec<ArcRef>>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Every arc reference, in document order.
    pub fn arc_refs(&self) -> Vec<ArcRef> {
        match self {
            Geometry::LineString(r) => r.clone(),
            Geometry::MultiLineString(rs) | Geometry::Polygon(rs) => {
                rs.iter().flatten().copied().collect()
            }
            Geometry::MultiPolygon(ps) => ps.iter().flatten().flatten().copied().collect(),
        }
    }

    /// Rewrites every arc reference in place.
    pub fn map_refs<F: FnMut(ArcRef) -> ArcRef>(&mut self, mut f: F) {
        let mut apply = |ring: &mut Vec<ArcRef>| {
            for r in ring.iter_mut() {
                *r = f(*r);
            }
        };
        match self {
            Geometry::LineString(r) => apply(r),
            Geometry::MultiLineString(rs) | Geometry::Polygon(rs) => rs.iter_mut().for_each(apply),
            Geometry::MultiPolygon(ps) => ps.iter_mut().flatten().for_each(apply),
        }
    }
}

/// One feature in a collection.
///
/// `geometry: None` serializes as `"type": null` with no `arcs` member.
/// `properties` is present only when the layer has an attribute table; a
/// missing row serializes as `null`.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryRecord {
    pub geometry: Option<Geometry>,
    pub id: u64,
    pub properties: Option<Value>,
}

impl Serialize for GeometryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.geometry {
            None => map.serialize_entry("type", &Value::Null)?,
            Some(geom) => {
                map.serialize_entry("type", geom.type_name())?;
                match geom {
                    Geometry::LineString(arcs) => map.serialize_entry("arcs", arcs)?,
                    Geometry::MultiLineString(arcs) | Geometry::Polygon(arcs) => {
                        map.serialize_entry("arcs", arcs)?
                    }
                    Geometry::MultiPolygon(arcs) => map.serialize_entry("arcs", arcs)?,
                }
            }
        }
        map.serialize_entry("id", &self.id)?;
        if let Some(props) = &self.properties {
            map.serialize_entry("properties", props)?;
        }
        map.end()
    }
}

/// The `arcs` member: integer grid coordinates when quantized, source
/// coordinates otherwise. Arcs with fewer than two vertices are `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArcArray {
    Quantized(Vec<Option<Vec<[i64; 2]>>>),
    Raw(Vec<Option<Vec<[f64; 2]>>>),
}

impl ArcArray {
    /// Converts grid-rounded arcs to integer pairs.
    pub fn quantized(arcs: Vec<Option<Vec<[f64; 2]>>>) -> Self {
        ArcArray::Quantized(
            arcs.into_iter()
                .map(|arc| {
                    arc.map(|pts| {
                        pts.into_iter()
                            .map(|[x, y]| [x.round() as i64, y.round() as i64])
                            .collect()
                    })
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            ArcArray::Quantized(a) => a.len(),
            ArcArray::Raw(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A new array holding only the arcs at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> ArcArray {
        match self {
            ArcArray::Quantized(a) => {
                ArcArray::Quantized(indices.iter().map(|&i| a[i].clone()).collect())
            }
            ArcArray::Raw(a) => ArcArray::Raw(indices.iter().map(|&i| a[i].clone()).collect()),
        }
    }
}
