use core::fmt;

use derive_more::derive::From;

use crate::Point2d;

/// A line segment between two endpoints.
///
/// The endpoints carry no implicit order; callers that need the left-to-right
/// orientation go through [`ordered`](Self::ordered).
#[derive(Clone, Copy, Debug, PartialEq, From)]
pub struct Segment2d {
    pub p1: Point2d,
    pub p2: Point2d,
}

impl Segment2d {
    pub const fn new(p1: Point2d, p2: Point2d) -> Self {
        Self { p1, p2 }
    }

    /// Returns the segment with its endpoints in x-ascending order.
    #[must_use]
    pub fn ordered(self) -> Self {
        if self.p1.x > self.p2.x {
            Self::new(self.p2, self.p1)
        } else {
            self
        }
    }

    /// `true` when the two endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.p1 == self.p2
    }

    pub fn midpoint(&self) -> Point2d {
        Point2d::new((self.p1.x + self.p2.x) / 2.0, (self.p1.y + self.p2.y) / 2.0)
    }
}

impl fmt::Display for Segment2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.p1, self.p2)
    }
}
