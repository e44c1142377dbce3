//! Layers and shapes.
//!
//! A layer is an ordered list of shapes plus an optional attribute table,
//! aligned by index. Shapes are lists of rings, and rings are lists of
//! [`ArcRef`]s into a shared [`ArcCollection`](super::ArcCollection).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::arc_ref::ArcRef;
use super::arcs::ArcCollection;
use super::table::DataTable;
use crate::error::TopoError;

/// One closed (polygon) or open (line) path, as a sequence of arc references.
pub type Ring = Vec<ArcRef>;

/// All the rings of one feature. A null shape is represented by `None` at the
/// layer level; an empty `Shape` means "no rings left".
pub type Shape = Vec<Ring>;

/// The kinds of geometry a layer can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Polygon,
    #[serde(alias = "line", alias = "linestring")]
    Polyline,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Polygon => "polygon",
            GeometryKind::Polyline => "polyline",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryKind {
    type Err = TopoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polygon" => Ok(GeometryKind::Polygon),
            "polyline" | "line" | "linestring" => Ok(GeometryKind::Polyline),
            _ => Err(TopoError::UnsupportedGeometryType(s.to_string())),
        }
    }
}

/// A named collection of shapes of one geometry kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Layer name; unnamed layers are named `layer<N>` at export time.
    pub name: Option<String>,

    pub geometry_type: GeometryKind,

    /// Shapes, index-aligned with `data` rows. `None` is a null shape.
    pub shapes: Vec<Option<Shape>>,

    /// Optional attribute table, one record per shape.
    pub data: Option<DataTable>,
}

impl Layer {
    /// Creates an unnamed layer without attributes.
    pub fn new(geometry_type: GeometryKind, shapes: Vec<Option<Shape>>) -> Self {
        Self {
            name: None,
            geometry_type,
            shapes,
            data: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_data(mut self, data: DataTable) -> Self {
        self.data = Some(data);
        self
    }

    /// The layer's name, or `layer<N>` for the layer at 0-based `position`.
    pub fn display_name(&self, position: usize) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("layer{}", position + 1),
        }
    }
}

/// Layers together with the arc pool their shapes reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub arcs: ArcCollection,
    pub layers: Vec<Layer>,
}

impl Dataset {
    pub fn new(arcs: ArcCollection, layers: Vec<Layer>) -> Self {
        Self { arcs, layers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_kind_parsing() {
        assert_eq!("polygon".parse::<GeometryKind>().unwrap(), GeometryKind::Polygon);
        assert_eq!("Line".parse::<GeometryKind>().unwrap(), GeometryKind::Polyline);
        let err = "point".parse::<GeometryKind>().unwrap_err();
        assert!(matches!(err, TopoError::UnsupportedGeometryType(ref s) if s == "point"));
    }

    #[test]
    fn test_display_name_defaults() {
        let layer = Layer::new(GeometryKind::Polygon, vec![]);
        assert_eq!(layer.display_name(0), "layer1");
        assert_eq!(layer.clone().with_name("states").display_name(0), "states");
        assert_eq!(layer.with_name("").display_name(2), "layer3");
    }
}
