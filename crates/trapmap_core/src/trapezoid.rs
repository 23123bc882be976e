use trapmap_geometry::{Point2d, Segment2d};

use crate::idx::{NodeIdx, TrapIdx};

/// A face of the trapezoidal map.
///
/// Bounded above and below by two segments and on the sides by the vertical
/// lines through two points. Up to four other faces adjoin the two vertical
/// edges; a missing neighbor is `None`, which happens exactly when the
/// bounding point coincides with an endpoint of the corresponding side
/// segment (the vertical edge degenerates to a point there).
///
/// Every face carries the arena position of the search-structure leaf that
/// names it, so an insertion can replace that leaf surgically.
#[derive(Clone, Debug)]
pub struct Trapezoid {
    top: Segment2d,
    bottom: Segment2d,
    left_point: Point2d,
    right_point: Point2d,
    upper_left: Option<TrapIdx>,
    lower_left: Option<TrapIdx>,
    upper_right: Option<TrapIdx>,
    lower_right: Option<TrapIdx>,
    node: NodeIdx,
}

impl Trapezoid {
    /// A trapezoid with no neighbors, named by the leaf at `node`.
    pub(crate) fn new(
        top: Segment2d,
        bottom: Segment2d,
        left_point: Point2d,
        right_point: Point2d,
        node: NodeIdx,
    ) -> Self {
        Self {
            top,
            bottom,
            left_point,
            right_point,
            upper_left: None,
            lower_left: None,
            upper_right: None,
            lower_right: None,
            node,
        }
    }

    #[inline]
    pub fn top(&self) -> Segment2d {
        self.top
    }

    #[inline]
    pub fn bottom(&self) -> Segment2d {
        self.bottom
    }

    #[inline]
    pub fn left_point(&self) -> Point2d {
        self.left_point
    }

    #[inline]
    pub fn right_point(&self) -> Point2d {
        self.right_point
    }

    #[inline]
    pub fn upper_left(&self) -> Option<TrapIdx> {
        self.upper_left
    }

    #[inline]
    pub fn lower_left(&self) -> Option<TrapIdx> {
        self.lower_left
    }

    #[inline]
    pub fn upper_right(&self) -> Option<TrapIdx> {
        self.upper_right
    }

    #[inline]
    pub fn lower_right(&self) -> Option<TrapIdx> {
        self.lower_right
    }

    /// The search-structure leaf naming this trapezoid.
    #[inline]
    pub fn node(&self) -> NodeIdx {
        self.node
    }

    pub(crate) fn set_left_point(&mut self, p: Point2d) {
        self.left_point = p;
    }

    pub(crate) fn set_right_point(&mut self, p: Point2d) {
        self.right_point = p;
    }

    pub(crate) fn set_upper_left(&mut self, idx: Option<TrapIdx>) {
        self.upper_left = idx;
    }

    pub(crate) fn set_lower_left(&mut self, idx: Option<TrapIdx>) {
        self.lower_left = idx;
    }

    pub(crate) fn set_upper_right(&mut self, idx: Option<TrapIdx>) {
        self.upper_right = idx;
    }

    pub(crate) fn set_lower_right(&mut self, idx: Option<TrapIdx>) {
        self.lower_right = idx;
    }

    pub(crate) fn set_node(&mut self, node: NodeIdx) {
        self.node = node;
    }

    /// `true` when the left bounding point is the left endpoint of the top
    /// segment.
    pub(crate) fn left_point_on_top_endpoint(&self) -> bool {
        self.left_point == self.top.ordered().p1
    }

    /// `true` when the right bounding point is the right endpoint of the top
    /// segment.
    pub(crate) fn right_point_on_top_endpoint(&self) -> bool {
        self.right_point == self.top.ordered().p2
    }

    /// `true` when the left bounding point is the left endpoint of the
    /// bottom segment.
    pub(crate) fn left_point_on_bottom_endpoint(&self) -> bool {
        self.left_point == self.bottom.ordered().p1
    }

    /// `true` when the right bounding point is the right endpoint of the
    /// bottom segment.
    pub(crate) fn right_point_on_bottom_endpoint(&self) -> bool {
        self.right_point == self.bottom.ordered().p2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_coincidence_orders_the_side_segments() {
        let top = Segment2d::new(Point2d::new(4.0, 3.0), Point2d::new(-4.0, 3.0));
        let bottom = Segment2d::new(Point2d::new(-4.0, -3.0), Point2d::new(4.0, -3.0));
        let trapezoid = Trapezoid::new(
            top,
            bottom,
            Point2d::new(-4.0, 3.0),
            Point2d::new(1.0, 0.0),
            NodeIdx::new(0),
        );

        // The top segment is stored right-to-left; the check still compares
        // against its x-ascending left endpoint.
        assert!(trapezoid.left_point_on_top_endpoint());
        assert!(!trapezoid.left_point_on_bottom_endpoint());
        assert!(!trapezoid.right_point_on_top_endpoint());
    }
}
