//! Topology export.
//!
//! One export call runs a fixed pipeline over a private working copy of the
//! arc pool:
//!
//! 1. take a deduplicated copy of the pool ([`ArcPool::filtered_copy`]);
//! 2. pick a quantization transform and apply it ([`resolution`]);
//! 3. drop collapsed arcs and get the remap table ([`collapse`]);
//! 4. encode the surviving arcs ([`encode`]);
//! 5. remap each layer's shapes ([`remap`]) and export them as geometry
//!    records ([`paths`]), tracking per-layer bounds;
//! 6. merge layer bounds into the topology bbox.
//!
//! The caller's layers and arc pool are never modified.

pub mod collapse;
pub mod encode;
pub mod paths;
pub mod remap;
pub mod report;
pub mod resolution;
pub mod split;

pub use encode::ArcEncoding;
pub use paths::{ExportedPaths, PathExporter};
pub use report::{ExportReport, LayerSummary};
pub use resolution::Quantization;
pub use split::split_topology;

use std::num::NonZeroU32;

use serde_json::Value;

use crate::error::TopoError;
use crate::ir::{ArcPool, Bounds, Layer};
use crate::topology::{
    ArcArray, Geometry, GeometryCollection, GeometryRecord, Objects, Topology, WireTransform,
};

/// Options controlling one export call.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Grid size per axis. `Some(0)` disables quantization; `Some(1)` is
    /// rejected because a one-value grid collapses every arc.
    pub resolution: Option<u32>,
    /// Grid cell size in source units; used when `resolution` is unset.
    pub precision: Option<f64>,
    /// Produce one topology per layer instead of one shared topology.
    pub split_by_layer: bool,
    /// Delta-encode arcs when coordinates are quantized.
    ///
    /// Turning this off writes absolute grid coordinates next to a
    /// `transform`. TopoJSON readers, including this crate's, treat such
    /// arcs as deltas, so that output only suits consumers that know it is
    /// absolute.
    pub delta_encode: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            resolution: None,
            precision: None,
            split_by_layer: false,
            delta_encode: true,
        }
    }
}

impl ExportOptions {
    /// Checks the options before any work is done.
    ///
    /// # Errors
    /// Returns [`TopoError::InvalidOption`] for a resolution of 1.
    pub fn validate(&self) -> Result<(), TopoError> {
        if self.resolution == Some(1) {
            return Err(TopoError::InvalidOption(
                "resolution must be 0 or at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the quantization mode. Explicit resolution wins over
    /// precision, which wins over automatic quantization.
    pub fn quantization(&self) -> Quantization {
        if let Some(n) = self.resolution {
            return NonZeroU32::new(n).map_or(Quantization::None, Quantization::Grid);
        }
        match self.precision {
            Some(p) if p > 0.0 && p.is_finite() => Quantization::Precision(p),
            _ => Quantization::Auto,
        }
    }
}

/// One output document. `name` is empty for an unsplit export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedFile {
    pub name: String,
    pub topology: Topology,
}

/// Exports layers and their shared arcs as a single topology.
pub fn export_topology<P: ArcPool>(
    layers: &[Layer],
    arcs: &P,
    opts: &ExportOptions,
) -> Result<Topology, TopoError> {
    export_topology_with_report(layers, arcs, opts).map(|(topology, _)| topology)
}

/// Like [`export_topology`], also returning a summary of what happened.
pub fn export_topology_with_report<P: ArcPool>(
    layers: &[Layer],
    arcs: &P,
    opts: &ExportOptions,
) -> Result<(Topology, ExportReport), TopoError> {
    opts.validate()?;
    let quantization = opts.quantization();
    let mut working = arcs.filtered_copy();

    let transform = resolution::quantize(&mut working, quantization);
    let inverse = transform.map(|t| t.invert());
    let wire_transform = inverse.as_ref().map(WireTransform::from_inverse);

    let table = collapse::filter_collapsed_arcs(&mut working);

    let encoding = if transform.is_some() && opts.delta_encode {
        ArcEncoding::Delta
    } else {
        ArcEncoding::Absolute
    };
    let encoded = encode::encode_arcs(&working, encoding);
    let wire_arcs = if transform.is_some() {
        ArcArray::quantized(encoded)
    } else {
        ArcArray::Raw(encoded)
    };

    let mut report = ExportReport {
        quantization: quantization.to_string(),
        encoding: encoding.name().to_string(),
        transform: wire_transform,
        input_arcs: arcs.arc_count(),
        collapsed_arcs: table.removed_count(),
        output_arcs: wire_arcs.len(),
        layers: Vec::with_capacity(layers.len()),
    };

    let mut objects = Objects::new();
    let mut bounds = Bounds::empty();

    for (position, layer) in layers.iter().enumerate() {
        let name = layer.display_name(position);
        let shapes = remap::remap_shapes(&layer.shapes, &table)?;

        let mut exporter = PathExporter::new(&working, layer.geometry_type);
        let paths = shapes
            .iter()
            .map(|shape| exporter.export_shape(shape.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let geometries = collapse_geometry_types(paths);

        let records: Vec<GeometryRecord> = geometries
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| GeometryRecord {
                geometry,
                id: i as u64,
                properties: layer.data.as_ref().map(|table| {
                    table
                        .get(i)
                        .cloned()
                        .map(Value::Object)
                        .unwrap_or(Value::Null)
                }),
            })
            .collect();

        let mut layer_bounds = exporter.bounds();
        if let Some(inv) = &inverse {
            layer_bounds = layer_bounds.transformed(inv);
        }
        bounds.merge(&layer_bounds);

        report.layers.push(LayerSummary {
            name: name.clone(),
            shapes: records.len(),
            null_geometries: records.iter().filter(|r| r.geometry.is_none()).count(),
            geometry_type: records
                .iter()
                .find_map(|r| r.geometry.as_ref())
                .map(|g| g.type_name().to_string()),
        });

        tracing::debug!(layer = %name, shapes = records.len(), "exported layer");
        objects.insert(
            name,
            GeometryCollection {
                bbox: non_empty(layer_bounds),
                geometries: records,
            },
        );
    }

    let topology = Topology {
        transform: wire_transform,
        objects,
        arcs: wire_arcs,
        bbox: non_empty(bounds),
    };
    Ok((topology, report))
}

/// Exports layers, splitting into one topology per layer when
/// `opts.split_by_layer` is set.
pub fn export_files<P: ArcPool>(
    layers: &[Layer],
    arcs: &P,
    opts: &ExportOptions,
) -> Result<(Vec<ExportedFile>, ExportReport), TopoError> {
    let (topology, report) = export_topology_with_report(layers, arcs, opts)?;
    let files = if opts.split_by_layer {
        split_topology(&topology)?
            .into_iter()
            .map(|(name, topology)| ExportedFile { name, topology })
            .collect()
    } else {
        vec![ExportedFile {
            name: String::new(),
            topology,
        }]
    };
    Ok((files, report))
}

/// Chooses singular or plural wire types for a whole layer.
///
/// If any shape exported more than one path group, every non-empty shape in
/// the layer uses the plural type; otherwise all use the singular type.
/// Shapes with no paths become null geometries.
pub fn collapse_geometry_types(paths: Vec<ExportedPaths>) -> Vec<Option<Geometry>> {
    let multi = paths.iter().any(|p| p.len() > 1);
    paths
        .into_iter()
        .map(|p| match p {
            ExportedPaths::Polygons(polys) if multi && !polys.is_empty() => {
                Some(Geometry::MultiPolygon(polys))
            }
            ExportedPaths::Polygons(polys) => polys.into_iter().next().map(Geometry::Polygon),
            ExportedPaths::Lines(lines) if multi && !lines.is_empty() => {
                Some(Geometry::MultiLineString(lines))
            }
            ExportedPaths::Lines(lines) => lines.into_iter().next().map(Geometry::LineString),
        })
        .collect()
}

fn non_empty(bounds: Bounds) -> Option<Bounds> {
    if bounds.is_empty() {
        None
    } else {
        Some(bounds)
    }
}
