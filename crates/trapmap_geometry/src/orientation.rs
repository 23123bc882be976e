use crate::{Point2d, Segment2d};

/// `true` when `p` lies strictly to the left of the directed line through
/// `s.p1` and `s.p2`.
///
/// For an x-ascending segment "left" is "above". Collinear points are neither
/// left nor right; both predicates return `false` for them, which is what the
/// search structure's below/right branching convention relies on.
#[inline]
pub fn point_at_left(s: &Segment2d, p: Point2d) -> bool {
    cross(s.p1, s.p2, p) > 0.0
}

/// `true` when `p` lies strictly to the right of the directed line through
/// `s.p1` and `s.p2`.
#[inline]
pub fn point_at_right(s: &Segment2d, p: Point2d) -> bool {
    cross(s.p1, s.p2, p) < 0.0
}

/// Cross product of (b - a) and (p - a).
#[inline]
fn cross(a: Point2d, b: Point2d, p: Point2d) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
