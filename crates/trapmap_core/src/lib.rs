//! Randomized incremental construction of a trapezoidal map and its
//! point-location search structure.
//!
//! The map subdivides a bounding rectangle into trapezoids induced by a set
//! of non-crossing segments; the coupled search DAG locates the trapezoid
//! containing a query point in expected logarithmic time. Both structures
//! are arenas of plain records cross-referenced by indices and are mutated
//! in lockstep by [`build_trapezoidal_map`], one segment at a time:
//!
//! ```
//! use trapmap_core::{
//!     build_trapezoidal_map, initialize_structures, query_point, Dag, TrapezoidalMap,
//!     TrapezoidalMapDataset,
//! };
//! use trapmap_geometry::{Point2d, Segment2d};
//!
//! let mut dag = Dag::new();
//! let mut map = TrapezoidalMap::new();
//! let mut dataset = TrapezoidalMapDataset::default();
//! initialize_structures(&mut dag, &mut map);
//!
//! let segment = Segment2d::new(Point2d::new(-100.0, 0.0), Point2d::new(100.0, 0.0));
//! dataset.insert_segment(segment).unwrap();
//! build_trapezoidal_map(&segment, &mut dag, &mut map, &dataset).unwrap();
//!
//! let above = query_point(Point2d::new(0.0, 10.0), &dag, &dataset);
//! assert_eq!(map.get(above).bottom(), segment);
//! ```
//!
//! Invariants hold between insertions, never during one; queries must not
//! run concurrently with [`build_trapezoidal_map`].

#![no_std]

extern crate alloc;

mod dag;
mod dataset;
mod error;
mod idx;
mod locate;
mod map;
mod node;
mod trapezoid;
mod update;

pub mod hash;
pub mod validation;

pub use dag::Dag;
pub use dataset::TrapezoidalMapDataset;
pub use error::{DatasetError, InsertError};
pub use idx::{NodeIdx, PointIdx, SegmentIdx, TrapIdx};
pub use locate::{follow_segment, query_point, query_segment, TrapezoidChain};
pub use map::{TrapezoidalMap, BOUNDING_BOX};
pub use node::Node;
pub use trapezoid::Trapezoid;
pub use update::{build_trapezoidal_map, initialize_structures};
