//! In-memory representation of layered, arc-based topology.
//!
//! Geometry is stored once, as a pool of shared boundary arcs
//! ([`ArcCollection`]). Layers hold shapes, shapes hold rings, and rings are
//! sequences of direction-tagged references ([`ArcRef`]) into that pool, so
//! two polygons sharing a border reference the same arc in opposite
//! directions.
//!
//! # Example
//!
//! ```
//! use topopack::ir::{ArcCollection, ArcPool, ArcRef, GeometryKind, Layer, Point};
//!
//! let arcs = ArcCollection::from_arcs(vec![vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 1.0),
//!     Point::new(0.0, 0.0),
//! ]]);
//! let layer = Layer::new(GeometryKind::Polygon, vec![Some(vec![vec![ArcRef::forward(0)]])])
//!     .with_name("squares");
//! assert_eq!(arcs.arc_count(), 1);
//! assert_eq!(layer.display_name(0), "squares");
//! ```

mod arc_ref;
mod arcs;
mod bounds;
pub mod io_json;
pub mod io_topojson;
mod model;
mod point;
mod table;
mod transform;

// Re-export core types for convenient access
pub use arc_ref::ArcRef;
pub use arcs::{ArcCollection, ArcPoints, ArcPool, RemapTable};
pub use bounds::Bounds;
pub use model::{Dataset, GeometryKind, Layer, Ring, Shape};
pub use point::Point;
pub use table::{DataTable, Record};
pub use transform::Transform;
