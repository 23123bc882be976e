use crate::idx::{NodeIdx, PointIdx, SegmentIdx, TrapIdx};

/// A node of the point-location search structure.
///
/// Internal nodes are decisions: an [`X`](Node::X) node tests the query
/// against the vertical line through a dataset point, a [`Y`](Node::Y) node
/// tests it against a dataset segment. Leaves name trapezoids. The structure
/// is a DAG, not a tree: one leaf may be reached through several `Y` nodes
/// when a trapezoid spans multiple faces of an earlier subdivision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    /// Branch on the query's x-coordinate relative to a point.
    X {
        point: PointIdx,
        /// Taken when the query lies strictly to the left of the point.
        left: NodeIdx,
        right: NodeIdx,
    },
    /// Branch on the query's side of a segment.
    Y {
        segment: SegmentIdx,
        /// Taken when the query lies strictly above the segment.
        above: NodeIdx,
        /// Taken otherwise; queries on the segment walk below it.
        below: NodeIdx,
    },
    /// Terminal node naming the trapezoid containing the query.
    Leaf { trapezoid: TrapIdx },
}

impl Node {
    /// The trapezoid this node names, when it is a leaf.
    pub fn as_leaf(&self) -> Option<TrapIdx> {
        match self {
            Self::Leaf { trapezoid } => Some(*trapezoid),
            _ => None,
        }
    }
}
