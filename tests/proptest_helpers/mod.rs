#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use topopack::export::encode::decode_delta_arc;
use topopack::export::ExportOptions;
use topopack::ir::{
    ArcCollection, ArcPool, ArcRef, Bounds, Dataset, GeometryKind, Layer, Point, Ring, Shape,
};
use topopack::topology::{ArcArray, Topology};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Points on a small integer lattice, so that repeated and collapsed arcs
/// come up often.
pub fn arb_point() -> BoxedStrategy<Point> {
    (0i32..=12, 0i32..=12)
        .prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
        .boxed()
}

pub fn arb_arc(max_points: usize) -> BoxedStrategy<Vec<Point>> {
    proptest::collection::vec(arb_point(), 1..=max_points).boxed()
}

pub fn arb_pool(max_arcs: usize, max_points: usize) -> BoxedStrategy<ArcCollection> {
    proptest::collection::vec(arb_arc(max_points), 0..=max_arcs)
        .prop_map(ArcCollection::from_arcs)
        .boxed()
}

fn arb_ring(arc_count: usize) -> BoxedStrategy<Ring> {
    proptest::collection::vec((0..arc_count as u32, any::<bool>()), 0..=4)
        .prop_map(|refs| {
            refs.into_iter()
                .map(|(i, rev)| {
                    if rev {
                        ArcRef::reverse(i)
                    } else {
                        ArcRef::forward(i)
                    }
                })
                .collect()
        })
        .boxed()
}

fn arb_shape(arc_count: usize) -> BoxedStrategy<Option<Shape>> {
    proptest::option::weighted(0.85, proptest::collection::vec(arb_ring(arc_count), 0..=3))
        .boxed()
}

fn arb_layer(arc_count: usize) -> BoxedStrategy<Layer> {
    (
        prop_oneof![Just(GeometryKind::Polygon), Just(GeometryKind::Polyline)],
        proptest::collection::vec(arb_shape(arc_count), 0..=5),
        proptest::option::of("[a-z]{1,6}"),
    )
        .prop_map(|(kind, shapes, name)| {
            let layer = Layer::new(kind, shapes);
            match name {
                Some(name) => layer.with_name(name),
                None => layer,
            }
        })
        .boxed()
}

/// A pool with at least one arc plus layers whose references all point
/// into it.
pub fn arb_dataset(max_arcs: usize, max_layers: usize) -> BoxedStrategy<Dataset> {
    proptest::collection::vec(arb_arc(6), 1..=max_arcs)
        .prop_flat_map(move |arcs| {
            let n = arcs.len();
            (
                Just(ArcCollection::from_arcs(arcs)),
                proptest::collection::vec(arb_layer(n), 1..=max_layers),
            )
        })
        .prop_map(|(arcs, layers)| Dataset::new(arcs, layers))
        .boxed()
}

pub fn arb_options() -> BoxedStrategy<ExportOptions> {
    (
        proptest::option::of(prop_oneof![Just(0u32), 2u32..=2000]),
        proptest::option::of(prop_oneof![Just(0.25f64), Just(0.5), Just(1.0), Just(3.0)]),
        any::<bool>(),
    )
        .prop_map(|(resolution, precision, delta_encode)| ExportOptions {
            resolution,
            precision,
            split_by_layer: false,
            delta_encode,
        })
        .boxed()
}

/// Source-space vertices of every exported arc, decoded in memory.
///
/// `delta` says whether quantized arcs hold deltas. A TopoJSON document
/// cannot say so itself, so absolute output is decoded here rather than by
/// reading the file back.
pub fn decode_exported_arcs(topology: &Topology, delta: bool) -> Vec<Vec<Point>> {
    match &topology.arcs {
        ArcArray::Quantized(arcs) => {
            let transform = topology.transform.map(|w| w.to_transform());
            arcs.iter()
                .map(|arc| {
                    let pairs: Vec<[f64; 2]> = arc
                        .iter()
                        .flatten()
                        .map(|&[x, y]| [x as f64, y as f64])
                        .collect();
                    let grid: Vec<Point> = if delta {
                        decode_delta_arc(&pairs)
                    } else {
                        pairs.into_iter().map(Point::from).collect()
                    };
                    match transform {
                        Some(t) => grid.into_iter().map(|p| t.apply(p)).collect(),
                        None => grid,
                    }
                })
                .collect()
        }
        ArcArray::Raw(arcs) => arcs
            .iter()
            .map(|arc| arc.iter().flatten().map(|&xy| Point::from(xy)).collect())
            .collect(),
    }
}

/// Vertices of one ring, following each arc in its referenced direction.
pub fn ring_points(arcs: &ArcCollection, ring: &[ArcRef]) -> Vec<Point> {
    let mut points = Vec::new();
    for r in ring {
        let iter = arcs.arc_points(r.index());
        if r.is_reversed() {
            points.extend(iter.rev());
        } else {
            points.extend(iter);
        }
    }
    points
}

pub fn bounds_contains_with_eps(outer: &Bounds, inner: &Bounds, eps: f64) -> bool {
    inner.is_empty()
        || (inner.xmin >= outer.xmin - eps
            && inner.ymin >= outer.ymin - eps
            && inner.xmax <= outer.xmax + eps
            && inner.ymax <= outer.ymax + eps)
}

pub fn point_in_bounds_with_eps(bounds: &Bounds, p: Point, eps: f64) -> bool {
    p.x >= bounds.xmin - eps
        && p.x <= bounds.xmax + eps
        && p.y >= bounds.ymin - eps
        && p.y <= bounds.ymax + eps
}
