use core::fmt;

use derive_more::derive::From;

/// A point in the plane.
///
/// Comparison is exact: two points are equal iff both coordinates compare
/// equal as `f64` values. There is no tolerance anywhere in the crate; shared
/// endpoints are shared values.
#[derive(Clone, Copy, Debug, PartialEq, From)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
