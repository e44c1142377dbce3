//! Turning shapes into exportable paths.
//!
//! Line shapes export each ring as its own path. Polygon shapes are grouped
//! into polygons: clockwise rings are outer boundaries and counter-clockwise
//! rings are holes belonging to the smallest enclosing outer ring.

use crate::error::TopoError;
use crate::ir::{ArcPool, Bounds, GeometryKind, Point, Ring, Shape};

/// The paths exported from one shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportedPaths {
    /// One entry per line part.
    Lines(Vec<Ring>),
    /// One entry per polygon: outer ring first, then its holes.
    Polygons(Vec<Vec<Ring>>),
}

impl ExportedPaths {
    /// Number of path groups (line parts or polygons).
    pub fn len(&self) -> usize {
        match self {
            ExportedPaths::Lines(p) => p.len(),
            ExportedPaths::Polygons(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exports shapes against one arc pool and tracks the bounds of everything
/// exported so far.
pub struct PathExporter<'a, P: ArcPool> {
    pool: &'a P,
    kind: GeometryKind,
    bounds: Bounds,
}

impl<'a, P: ArcPool> PathExporter<'a, P> {
    pub fn new(pool: &'a P, kind: GeometryKind) -> Self {
        Self {
            pool,
            kind,
            bounds: Bounds::empty(),
        }
    }

    /// Bounds of every vertex of every path exported so far.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Exports one shape. A null shape exports no paths.
    pub fn export_shape(&mut self, shape: Option<&Shape>) -> Result<ExportedPaths, TopoError> {
        let rings = shape.map(|s| s.as_slice()).unwrap_or_default();
        match self.kind {
            GeometryKind::Polyline => self.export_lines(rings).map(ExportedPaths::Lines),
            GeometryKind::Polygon => self.export_polygons(rings).map(ExportedPaths::Polygons),
        }
    }

    fn export_lines(&mut self, rings: &[Ring]) -> Result<Vec<Ring>, TopoError> {
        let mut paths = Vec::new();
        for ring in rings.iter().filter(|r| !r.is_empty()) {
            let points = self.ring_points(ring)?;
            self.extend_bounds(&points);
            paths.push(ring.clone());
        }
        Ok(paths)
    }

    fn export_polygons(&mut self, rings: &[Ring]) -> Result<Vec<Vec<Ring>>, TopoError> {
        let mut outers: Vec<(Vec<Ring>, f64, Bounds)> = Vec::new();
        let mut holes: Vec<(&Ring, Bounds, Vec<Point>)> = Vec::new();

        for ring in rings.iter().filter(|r| !r.is_empty()) {
            let points = self.ring_points(ring)?;
            let area = ring_area(&points);
            let bounds = points_bounds(&points);
            if area > 0.0 {
                self.extend_bounds(&points);
                outers.push((vec![ring.clone()], area, bounds));
            } else if area < 0.0 {
                holes.push((ring, bounds, points));
            } else {
                tracing::debug!(arcs = ring.len(), "dropped zero-area ring");
            }
        }

        for (hole, hole_bounds, points) in holes {
            let container = outers
                .iter_mut()
                .filter(|(_, _, b)| b.contains_bounds(&hole_bounds))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match container {
                Some((group, _, _)) => {
                    group.push(hole.clone());
                    self.extend_bounds(&points);
                }
                None => tracing::warn!(arcs = hole.len(), "dropped hole with no enclosing ring"),
            }
        }

        Ok(outers.into_iter().map(|(group, _, _)| group).collect())
    }

    /// Vertices of a ring, following each arc in its referenced direction.
    fn ring_points(&self, ring: &Ring) -> Result<Vec<Point>, TopoError> {
        let mut points = Vec::new();
        for arc in ring {
            let i = arc.index();
            if i >= self.pool.arc_count() {
                return Err(TopoError::ArcIndexProblem {
                    arc: i,
                    remapped: None,
                });
            }
            let iter = self.pool.arc_points(i);
            if arc.is_reversed() {
                points.extend(iter.rev());
            } else {
                points.extend(iter);
            }
        }
        Ok(points)
    }

    fn extend_bounds(&mut self, points: &[Point]) {
        for &p in points {
            self.bounds.extend_point(p);
        }
    }
}

/// Planar area of a ring; clockwise rings are positive.
pub fn ring_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += b.x * a.y - a.x * b.y;
    }
    sum / 2.0
}

fn points_bounds(points: &[Point]) -> Bounds {
    let mut bounds = Bounds::empty();
    for &p in points {
        bounds.extend_point(p);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ArcCollection, ArcRef};

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    // arc 0: clockwise 10x10 square; arc 1: clockwise 2x2 square inside it;
    // arc 2: a clockwise square far away.
    fn pool() -> ArcCollection {
        ArcCollection::from_arcs(vec![
            pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]),
            pts(&[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0), (4.0, 4.0)]),
            pts(&[(20.0, 0.0), (20.0, 1.0), (21.0, 1.0), (21.0, 0.0), (20.0, 0.0)]),
        ])
    }

    #[test]
    fn test_ring_area_orientation() {
        let cw = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(ring_area(&cw), 1.0);
        let ccw: Vec<Point> = cw.iter().rev().copied().collect();
        assert_eq!(ring_area(&ccw), -1.0);
        assert_eq!(ring_area(&cw[..2]), 0.0);
    }

    #[test]
    fn test_polygon_with_hole() {
        let arcs = pool();
        let mut exporter = PathExporter::new(&arcs, GeometryKind::Polygon);
        let shape = vec![vec![ArcRef::forward(0)], vec![ArcRef::reverse(1)]];
        let paths = exporter.export_shape(Some(&shape)).unwrap();
        assert_eq!(
            paths,
            ExportedPaths::Polygons(vec![vec![
                vec![ArcRef::forward(0)],
                vec![ArcRef::reverse(1)]
            ]])
        );
        assert_eq!(exporter.bounds().to_array(), [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_multipolygon_groups() {
        let arcs = pool();
        let mut exporter = PathExporter::new(&arcs, GeometryKind::Polygon);
        let shape = vec![vec![ArcRef::forward(0)], vec![ArcRef::forward(2)]];
        let paths = exporter.export_shape(Some(&shape)).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(exporter.bounds().to_array(), [0.0, 0.0, 21.0, 10.0]);
    }

    #[test]
    fn test_orphan_hole_dropped() {
        let arcs = pool();
        let mut exporter = PathExporter::new(&arcs, GeometryKind::Polygon);
        let shape = vec![vec![ArcRef::forward(2)], vec![ArcRef::reverse(1)]];
        let paths = exporter.export_shape(Some(&shape)).unwrap();
        assert_eq!(
            paths,
            ExportedPaths::Polygons(vec![vec![vec![ArcRef::forward(2)]]])
        );
        assert_eq!(exporter.bounds().to_array(), [20.0, 0.0, 21.0, 1.0]);
    }

    #[test]
    fn test_lines_export_every_ring() {
        let arcs = pool();
        let mut exporter = PathExporter::new(&arcs, GeometryKind::Polyline);
        let shape = vec![vec![ArcRef::forward(1)], vec![], vec![ArcRef::reverse(2)]];
        let paths = exporter.export_shape(Some(&shape)).unwrap();
        assert_eq!(
            paths,
            ExportedPaths::Lines(vec![vec![ArcRef::forward(1)], vec![ArcRef::reverse(2)]])
        );
        assert_eq!(exporter.bounds().to_array(), [4.0, 0.0, 21.0, 6.0]);
    }

    #[test]
    fn test_null_shape_exports_nothing() {
        let arcs = pool();
        let mut exporter = PathExporter::new(&arcs, GeometryKind::Polygon);
        assert!(exporter.export_shape(None).unwrap().is_empty());
        assert!(exporter.bounds().is_empty());
    }

    #[test]
    fn test_bad_reference_is_error() {
        let arcs = pool();
        let mut exporter = PathExporter::new(&arcs, GeometryKind::Polyline);
        let shape = vec![vec![ArcRef::forward(9)]];
        assert!(exporter.export_shape(Some(&shape)).is_err());
    }
}
