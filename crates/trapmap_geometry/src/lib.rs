//! Minimal 2D vector geometry for the trapezoidal-map crates.
//!
//! Provides the value types ([`Point2d`], [`Segment2d`], [`Bounds`]) and the
//! strict orientation predicates the point-location search branches on.
//! Everything is `f64`; equality of points is exact value equality, so code
//! that relies on shared endpoints must reuse registered coordinates instead
//! of recomputing them.

#![no_std]

mod bounds;
mod orientation;
mod point;
mod segment;

pub use bounds::Bounds;
pub use orientation::{point_at_left, point_at_right};
pub use point::Point2d;
pub use segment::Segment2d;
