//! JSON serialization for the topopack IR format.
//!
//! A plain document holding the arc pool and the layers that reference it:
//!
//! ```json
//! {
//!   "arcs": [[[0, 0], [0, 1], [1, 1]], [[1, 1], [0, 0]]],
//!   "layers": [
//!     {"name": "parcels", "geometry_type": "polygon",
//!      "shapes": [[[0, 1]], null],
//!      "properties": [{"id": 1}, {"id": 2}]}
//!   ]
//! }
//! ```
//!
//! Useful for feeding the exporter from other tools and for debugging
//! exports by inspecting the layered model directly.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::arcs::{ArcCollection, ArcPool};
use super::model::{Dataset, GeometryKind, Layer, Shape};
use super::point::Point;
use super::table::DataTable;
use crate::error::TopoError;

#[derive(Debug, Serialize, Deserialize)]
struct IrDocument {
    #[serde(default)]
    arcs: Vec<Vec<Point>>,
    #[serde(default)]
    layers: Vec<IrLayer>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IrLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    geometry_type: String,
    #[serde(default)]
    shapes: Vec<Option<Shape>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<Vec<Value>>,
}

/// Reads a dataset from a JSON file in the topopack IR format.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if a layer
/// names a geometry type other than polygon or polyline.
pub fn read_ir_json(path: &Path) -> Result<Dataset, TopoError> {
    let file = File::open(path).map_err(TopoError::Io)?;
    let reader = BufReader::new(file);

    let doc: IrDocument =
        serde_json::from_reader(reader).map_err(|source| TopoError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;

    document_to_ir(doc)
}

/// Writes a dataset to a JSON file in the topopack IR format.
pub fn write_ir_json(path: &Path, dataset: &Dataset) -> Result<(), TopoError> {
    let file = File::create(path).map_err(TopoError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &ir_to_document(dataset)).map_err(|source| {
        TopoError::JsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reads a dataset from a JSON string in the topopack IR format.
pub fn from_json_str(json: &str) -> Result<Dataset, TopoError> {
    document_to_ir(serde_json::from_str(json)?)
}

/// Reads a dataset from a JSON byte slice in the topopack IR format.
pub fn from_json_slice(bytes: &[u8]) -> Result<Dataset, TopoError> {
    document_to_ir(serde_json::from_slice(bytes)?)
}

fn document_to_ir(doc: IrDocument) -> Result<Dataset, TopoError> {
    let arcs = ArcCollection::from_arcs(doc.arcs);
    let layers = doc
        .layers
        .into_iter()
        .enumerate()
        .map(|(i, layer)| layer_to_ir(i, layer))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::new(arcs, layers))
}

fn layer_to_ir(position: usize, layer: IrLayer) -> Result<Layer, TopoError> {
    let kind: GeometryKind = layer.geometry_type.parse()?;
    let shape_count = layer.shapes.len();
    let mut out = Layer::new(kind, layer.shapes);
    if let Some(name) = layer.name {
        out = out.with_name(name);
    }

    if let Some(rows) = layer.properties {
        if rows.len() != shape_count {
            warn!(
                layer = %out.display_name(position),
                shapes = shape_count,
                records = rows.len(),
                "attribute table size differs from shape count"
            );
        }
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        out = out.with_data(DataTable::from_rows(rows));
    }
    Ok(out)
}

fn ir_to_document(dataset: &Dataset) -> IrDocument {
    IrDocument {
        arcs: (0..dataset.arcs.arc_count())
            .map(|i| dataset.arcs.arc_points(i).collect())
            .collect(),
        layers: dataset
            .layers
            .iter()
            .map(|layer| IrLayer {
                name: layer.name.clone(),
                geometry_type: layer.geometry_type.name().to_string(),
                shapes: layer.shapes.clone(),
                properties: layer.data.as_ref().map(|table| {
                    table
                        .rows()
                        .iter()
                        .map(|row| row.clone().map_or(Value::Null, Value::Object))
                        .collect()
                }),
            })
            .collect(),
    }
}
