//! Export report types.
//!
//! Summarizes what an export did to the arc pool and to each layer, in the
//! same spirit as a conversion report: counts first, notes after.

use serde::Serialize;
use std::fmt;

use crate::topology::WireTransform;

/// A summary of one export call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExportReport {
    /// Quantization mode that was requested (`none`, `grid N`, ...).
    pub quantization: String,
    /// Arc encoding used on the wire (`absolute` or `delta`).
    pub encoding: String,
    /// Transform written to the output, if coordinates were quantized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<WireTransform>,
    /// Arcs in the source pool.
    pub input_arcs: usize,
    /// Arcs dropped because they collapsed to a single point.
    pub collapsed_arcs: usize,
    /// Arcs written to the output.
    pub output_arcs: usize,
    pub layers: Vec<LayerSummary>,
}

/// Per-layer counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub shapes: usize,
    pub null_geometries: usize,
    /// Wire geometry type shared by the layer's non-null records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} arcs in, {} collapsed, {} arcs out ({} encoding)",
            self.input_arcs, self.collapsed_arcs, self.output_arcs, self.encoding
        )?;
        match &self.transform {
            Some(t) => writeln!(
                f,
                "  quantization: {} (scale [{}, {}], translate [{}, {}])",
                self.quantization, t.scale[0], t.scale[1], t.translate[0], t.translate[1]
            )?,
            None => writeln!(f, "  quantization: none")?,
        }

        if !self.layers.is_empty() {
            writeln!(f)?;
            writeln!(f, "Layers ({}):", self.layers.len())?;
            for layer in &self.layers {
                write!(
                    f,
                    "  - {}: {} shape(s), {}",
                    layer.name,
                    layer.shapes,
                    layer.geometry_type.as_deref().unwrap_or("no geometry")
                )?;
                if layer.null_geometries > 0 {
                    write!(f, ", {} null", layer.null_geometries)?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_layers() {
        let report = ExportReport {
            quantization: "auto".into(),
            encoding: "delta".into(),
            transform: Some(WireTransform {
                scale: [0.5, 0.25],
                translate: [1.0, 2.0],
            }),
            input_arcs: 5,
            collapsed_arcs: 1,
            output_arcs: 4,
            layers: vec![
                LayerSummary {
                    name: "states".into(),
                    shapes: 3,
                    null_geometries: 1,
                    geometry_type: Some("MultiPolygon".into()),
                },
                LayerSummary {
                    name: "empty".into(),
                    shapes: 0,
                    null_geometries: 0,
                    geometry_type: None,
                },
            ],
        };
        let text = report.to_string();
        assert!(text.contains("5 arcs in, 1 collapsed, 4 arcs out (delta encoding)"));
        assert!(text.contains("quantization: auto (scale [0.5, 0.25]"));
        assert!(text.contains("- states: 3 shape(s), MultiPolygon, 1 null"));
        assert!(text.contains("- empty: 0 shape(s), no geometry"));
    }

    #[test]
    fn test_json_omits_missing_transform() {
        let report = ExportReport {
            quantization: "none".into(),
            encoding: "absolute".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("transform").is_none());
        assert_eq!(value["collapsed_arcs"], 0);
    }
}
