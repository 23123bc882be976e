use smallvec::SmallVec;
use trapmap_geometry::{point_at_left, point_at_right, Point2d, Segment2d};

use crate::{
    dag::Dag, dataset::TrapezoidalMapDataset, idx::TrapIdx, map::TrapezoidalMap, node::Node,
};

/// Chain of trapezoids pierced by a segment, kept inline while short.
pub type TrapezoidChain = SmallVec<[TrapIdx; 8]>;

/// Walks the search structure from the root to the trapezoid containing `q`.
///
/// A query exactly on a stored segment walks below it, and a query exactly
/// on the vertical line through a stored point walks right of it; callers
/// needing a different on-boundary policy must perturb their queries.
pub fn query_point(q: Point2d, dag: &Dag, dataset: &TrapezoidalMapDataset) -> TrapIdx {
    let mut node = dag.root();
    loop {
        match *node {
            Node::X { point, left, right } => {
                node = if q.x < dataset.point(point).x {
                    dag.get(left)
                } else {
                    dag.get(right)
                };
            }
            Node::Y {
                segment,
                above,
                below,
            } => {
                let segment = dataset.segment(segment).ordered();
                node = if point_at_left(&segment, q) {
                    dag.get(above)
                } else {
                    dag.get(below)
                };
            }
            Node::Leaf { trapezoid } => return trapezoid,
        }
    }
}

/// Locates the trapezoid containing the left endpoint of `query`.
///
/// Differs from [`query_point`] in one case: when the left endpoint lies
/// exactly on a stored segment (it is a shared endpoint), the query's right
/// endpoint decides the branch, so the walk continues on the side the new
/// segment actually occupies.
pub fn query_segment(query: &Segment2d, dag: &Dag, dataset: &TrapezoidalMapDataset) -> TrapIdx {
    let mut node = dag.root();
    loop {
        match *node {
            Node::X { point, left, right } => {
                node = if query.p1.x < dataset.point(point).x {
                    dag.get(left)
                } else {
                    dag.get(right)
                };
            }
            Node::Y {
                segment,
                above,
                below,
            } => {
                let segment = dataset.segment(segment).ordered();
                let next = if point_at_left(&segment, query.p1) {
                    above
                } else if point_at_right(&segment, query.p1) {
                    below
                } else if point_at_left(&segment, query.p2) {
                    above
                } else {
                    below
                };
                node = dag.get(next);
            }
            Node::Leaf { trapezoid } => return trapezoid,
        }
    }
}

/// Enumerates the chain of trapezoids pierced by `segment`, left to right.
///
/// Starts from the face containing the left endpoint and walks right-hand
/// neighbors until the face containing the right endpoint is reached. The
/// segment must be x-ascending and must not cross any stored segment.
pub fn follow_segment(
    segment: &Segment2d,
    dag: &Dag,
    map: &TrapezoidalMap,
    dataset: &TrapezoidalMapDataset,
) -> TrapezoidChain {
    assert!(
        segment.p1.x < segment.p2.x,
        "follow_segment requires an x-ascending segment"
    );

    let mut chain = TrapezoidChain::new();
    let mut current = query_segment(segment, dag, dataset);
    chain.push(current);

    let mut right_point = map.get(current).right_point();
    while segment.p2.x > right_point.x {
        // The segment leaves the current face through its right edge, below
        // the corner point when the corner lies above the segment and above
        // it otherwise.
        let next = if point_at_left(segment, right_point) {
            map.get(current).lower_right()
        } else {
            map.get(current).upper_right()
        };
        current = next.expect("segment escapes the map through a missing right neighbor");
        chain.push(current);
        right_point = map.get(current).right_point();
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::initialize_structures;

    #[test]
    fn empty_map_locates_everything_in_the_bounding_trapezoid() {
        let mut dag = Dag::new();
        let mut map = TrapezoidalMap::new();
        let dataset = TrapezoidalMapDataset::default();
        initialize_structures(&mut dag, &mut map);

        assert_eq!(map.len(), 1);
        assert_eq!(dag.len(), 1);
        let found = query_point(Point2d::new(0.0, 0.0), &dag, &dataset);
        assert_eq!(found.index(), 0);
        assert_eq!(
            query_point(Point2d::new(-999_999.0, 999_999.0), &dag, &dataset),
            found
        );
    }

    #[test]
    fn follow_segment_on_the_empty_map_is_a_single_face() {
        let mut dag = Dag::new();
        let mut map = TrapezoidalMap::new();
        let mut dataset = TrapezoidalMapDataset::default();
        initialize_structures(&mut dag, &mut map);

        let segment = Segment2d::new(Point2d::new(-5.0, 1.0), Point2d::new(5.0, 2.0));
        dataset.insert_segment(segment).unwrap();
        let chain = follow_segment(&segment, &dag, &map, &dataset);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].index(), 0);
    }
}
