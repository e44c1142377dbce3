//! TopoJSON reading and writing.
//!
//! Reading decodes the arc array (undoing delta encoding and quantization
//! when the document has a `transform`) and turns each named object into a
//! [`Layer`]. Writing serializes an exported [`Topology`] compactly.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::arcs::ArcCollection;
use super::model::{Dataset, GeometryKind, Layer, Ring, Shape};
use super::point::Point;
use super::table::DataTable;
use crate::error::TopoError;
use crate::export::encode::decode_delta_arc;
use crate::topology::{Topology, WireTransform};

// ============================================================================
// TopoJSON input structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct TopoJsonDocument {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    transform: Option<WireTransform>,

    #[serde(default, deserialize_with = "ordered_map")]
    objects: Vec<(String, TopoJsonObject)>,

    #[serde(default)]
    arcs: Vec<Option<Vec<Vec<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct TopoJsonObject {
    #[serde(rename = "type", default)]
    kind: Option<String>,

    #[serde(default)]
    arcs: Option<Value>,

    #[serde(default)]
    geometries: Option<Vec<TopoJsonObject>>,

    #[serde(default)]
    properties: Option<Value>,
}

/// Deserializes a JSON object into `(key, value)` pairs in document order.
fn ordered_map<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of named objects")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

// ============================================================================
// Public API
// ============================================================================

/// Reads a dataset from a TopoJSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if it holds
/// geometry types other than (Multi)Polygon and (Multi)LineString.
pub fn read_topojson(path: &Path) -> Result<Dataset, TopoError> {
    let file = File::open(path).map_err(TopoError::Io)?;
    let reader = BufReader::new(file);

    let doc: TopoJsonDocument =
        serde_json::from_reader(reader).map_err(|source| TopoError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    topojson_to_ir(doc)
}

/// Writes a topology to a file as compact TopoJSON.
pub fn write_topojson(path: &Path, topology: &Topology) -> Result<(), TopoError> {
    let file = File::create(path).map_err(TopoError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer(writer, topology).map_err(|source| TopoError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a dataset from a TopoJSON string.
pub fn from_topojson_str(json: &str) -> Result<Dataset, TopoError> {
    let doc: TopoJsonDocument = serde_json::from_str(json)?;
    topojson_to_ir(doc)
}

/// Reads a dataset from a TopoJSON byte slice.
///
/// Useful for fuzzing and processing raw bytes without UTF-8 validation overhead.
pub fn from_topojson_slice(bytes: &[u8]) -> Result<Dataset, TopoError> {
    let doc: TopoJsonDocument = serde_json::from_slice(bytes)?;
    topojson_to_ir(doc)
}

/// Writes a topology to a compact TopoJSON string.
pub fn to_topojson_string(topology: &Topology) -> Result<String, serde_json::Error> {
    serde_json::to_string(topology)
}

/// Returns true if `json` looks like a TopoJSON document.
pub fn is_topojson(bytes: &[u8]) -> bool {
    #[derive(Deserialize)]
    struct Probe {
        #[serde(rename = "type")]
        kind: Option<String>,
    }
    serde_json::from_slice::<Probe>(bytes)
        .ok()
        .and_then(|p| p.kind)
        .is_some_and(|k| k == "Topology")
}

// ============================================================================
// Conversion: TopoJSON -> IR
// ============================================================================

fn topojson_to_ir(doc: TopoJsonDocument) -> Result<Dataset, TopoError> {
    if doc.kind != "Topology" {
        return Err(TopoError::InvalidTopology(format!(
            "expected type \"Topology\", found \"{}\"",
            doc.kind
        )));
    }

    let arcs = decode_arcs(&doc.arcs, doc.transform.as_ref())?;
    let layers = doc
        .objects
        .into_iter()
        .map(|(name, object)| object_to_layer(name, object))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(arcs, layers))
}

fn decode_arcs(
    arcs: &[Option<Vec<Vec<f64>>>],
    transform: Option<&WireTransform>,
) -> Result<ArcCollection, TopoError> {
    let mut coll = ArcCollection::new();
    for (i, arc) in arcs.iter().enumerate() {
        let positions = arc.as_deref().unwrap_or_default();
        let mut pairs = Vec::with_capacity(positions.len());
        for pos in positions {
            match pos.as_slice() {
                [x, y, ..] => pairs.push([*x, *y]),
                _ => {
                    return Err(TopoError::InvalidTopology(format!(
                        "arc {} has a position with fewer than two coordinates",
                        i
                    )))
                }
            }
        }
        match transform {
            Some(t) => {
                let t = t.to_transform();
                coll.push_arc(decode_delta_arc(&pairs).into_iter().map(|p| t.apply(p)));
            }
            None => {
                coll.push_arc(pairs.into_iter().map(Point::from));
            }
        }
    }
    Ok(coll)
}

fn object_to_layer(name: String, object: TopoJsonObject) -> Result<Layer, TopoError> {
    let members = match object.kind.as_deref() {
        Some("GeometryCollection") => object.geometries.unwrap_or_default(),
        _ => vec![object],
    };

    let mut kind: Option<GeometryKind> = None;
    let mut shapes = Vec::with_capacity(members.len());
    let mut rows = Vec::with_capacity(members.len());

    for member in members {
        let (member_kind, shape) = geometry_to_shape(&member)?;
        if let Some(k) = member_kind {
            match kind {
                Some(existing) if existing != k => {
                    return Err(TopoError::InvalidTopology(format!(
                        "object \"{}\" mixes {} and {} geometries",
                        name, existing, k
                    )))
                }
                _ => kind = Some(k),
            }
        }
        shapes.push(shape);

        rows.push(match member.properties {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        });
    }

    let mut layer = Layer::new(kind.unwrap_or(GeometryKind::Polygon), shapes).with_name(name);
    if rows.iter().any(Option::is_some) {
        layer = layer.with_data(DataTable::from_rows(rows));
    }
    Ok(layer)
}

fn geometry_to_shape(
    object: &TopoJsonObject,
) -> Result<(Option<GeometryKind>, Option<Shape>), TopoError> {
    let kind = match object.kind.as_deref() {
        None => return Ok((None, None)),
        Some(kind) => kind,
    };
    let arcs = object.arcs.clone().unwrap_or(Value::Null);

    match kind {
        "Polygon" => {
            let rings: Vec<Ring> = parse_arcs(kind, arcs)?;
            Ok((Some(GeometryKind::Polygon), Some(rings)))
        }
        "MultiPolygon" => {
            let polys: Vec<Vec<Ring>> = parse_arcs(kind, arcs)?;
            Ok((
                Some(GeometryKind::Polygon),
                Some(polys.into_iter().flatten().collect()),
            ))
        }
        "LineString" => {
            let ring: Ring = parse_arcs(kind, arcs)?;
            Ok((Some(GeometryKind::Polyline), Some(vec![ring])))
        }
        "MultiLineString" => {
            let rings: Vec<Ring> = parse_arcs(kind, arcs)?;
            Ok((Some(GeometryKind::Polyline), Some(rings)))
        }
        other => Err(TopoError::UnsupportedGeometryType(other.to_string())),
    }
}

fn parse_arcs<T: serde::de::DeserializeOwned>(kind: &str, arcs: Value) -> Result<T, TopoError> {
    serde_json::from_value(arcs)
        .map_err(|e| TopoError::InvalidTopology(format!("bad arcs for {}: {}", kind, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ArcPool, ArcRef};
    use serde_json::json;

    const QUANTIZED: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.5, 2.0], "translate": [100.0, 10.0]},
        "objects": {
            "zones": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0, -2]], "id": 0, "properties": {"name": "a"}},
                    {"type": null, "id": 1}
                ]
            },
            "edges": {"type": "MultiLineString", "arcs": [[0], [1]]}
        },
        "arcs": [
            [[0, 0], [2, 0], [0, 2]],
            [[0, 0], [0, 2], null]
        ]
    }"#;

    #[test]
    fn test_reads_quantized_topology() {
        let json = QUANTIZED.replace(", null]", "]");
        let dataset = from_topojson_str(&json).expect("parse topojson");

        assert_eq!(dataset.arcs.arc_count(), 2);
        assert_eq!(
            dataset.arcs.arc_to_vec(0),
            vec![
                Point::new(100.0, 10.0),
                Point::new(101.0, 10.0),
                Point::new(101.0, 14.0)
            ]
        );

        assert_eq!(dataset.layers.len(), 2);
        let zones = &dataset.layers[0];
        assert_eq!(zones.name.as_deref(), Some("zones"));
        assert_eq!(zones.geometry_type, GeometryKind::Polygon);
        assert_eq!(
            zones.shapes,
            vec![
                Some(vec![vec![ArcRef::forward(0), ArcRef::reverse(1)]]),
                None
            ]
        );
        let data = zones.data.as_ref().expect("has properties");
        assert_eq!(data.size(), 2);
        assert_eq!(data.get(0).and_then(|r| r.get("name")), Some(&json!("a")));
        assert_eq!(data.get(1), None);

        let edges = &dataset.layers[1];
        assert_eq!(edges.name.as_deref(), Some("edges"));
        assert_eq!(edges.geometry_type, GeometryKind::Polyline);
        assert_eq!(edges.shapes.len(), 1);
        assert!(edges.data.is_none());
    }

    #[test]
    fn test_null_position_is_rejected() {
        let err = from_topojson_str(QUANTIZED).unwrap_err();
        assert!(matches!(err, TopoError::Json(_)));
    }

    #[test]
    fn test_short_position_is_invalid() {
        let json = r#"{"type": "Topology", "objects": {},
            "arcs": [[[0], [1, 1]]]}"#;
        let err = from_topojson_str(json).unwrap_err();
        assert!(matches!(err, TopoError::InvalidTopology(ref m) if m.contains("arc 0")));
    }

    #[test]
    fn test_raw_arcs_and_null_arc() {
        let json = r#"{"type": "Topology", "objects": {},
            "arcs": [[[0.5, 0.5], [1.5, 2.5]], null]}"#;
        let dataset = from_topojson_str(json).unwrap();
        assert_eq!(dataset.arcs.arc_count(), 2);
        assert_eq!(dataset.arcs.arc_to_vec(0)[1], Point::new(1.5, 2.5));
        assert!(dataset.arcs.arc_to_vec(1).is_empty());
    }

    #[test]
    fn test_point_geometry_is_unsupported() {
        let json = r#"{"type": "Topology", "arcs": [],
            "objects": {"pts": {"type": "Point", "coordinates": [1, 2]}}}"#;
        let err = from_topojson_str(json).unwrap_err();
        assert!(matches!(err, TopoError::UnsupportedGeometryType(ref t) if t == "Point"));
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let json = r#"{"type": "Topology", "arcs": [[[0,0],[1,1]]],
            "objects": {"mix": {"type": "GeometryCollection", "geometries": [
                {"type": "LineString", "arcs": [0]},
                {"type": "Polygon", "arcs": [[0]]}
            ]}}}"#;
        let err = from_topojson_str(json).unwrap_err();
        assert!(matches!(err, TopoError::InvalidTopology(_)));
    }

    #[test]
    fn test_not_a_topology() {
        let err = from_topojson_str(r#"{"type": "FeatureCollection", "features": []}"#)
            .unwrap_err();
        assert!(matches!(err, TopoError::InvalidTopology(_)));
    }

    #[test]
    fn test_object_order_preserved() {
        let json = r#"{"type": "Topology", "arcs": [],
            "objects": {"zeta": {"type": null}, "alpha": {"type": null}}}"#;
        let dataset = from_topojson_str(json).unwrap();
        let names: Vec<_> = dataset
            .layers
            .iter()
            .map(|l| l.name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_is_topojson() {
        assert!(is_topojson(br#"{"type": "Topology", "objects": {}}"#));
        assert!(!is_topojson(br#"{"arcs": [], "layers": []}"#));
        assert!(!is_topojson(b"not json"));
    }
}
