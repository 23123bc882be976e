//! Incremental construction: splitting pierced trapezoids and rewriting the
//! search structure, one segment at a time.

use log::{debug, trace};
use trapmap_geometry::{point_at_left, Point2d, Segment2d};

use crate::{
    dag::Dag,
    dataset::TrapezoidalMapDataset,
    error::InsertError,
    idx::{NodeIdx, PointIdx, SegmentIdx, TrapIdx},
    locate::follow_segment,
    map::{TrapezoidalMap, BOUNDING_BOX},
    node::Node,
    trapezoid::Trapezoid,
};

/// Installs the bounding-rectangle trapezoid and the single leaf naming it.
///
/// Both structures are cleared first; the trapezoidal map of the empty
/// segment set is the bounding rectangle alone.
pub fn initialize_structures(dag: &mut Dag, map: &mut TrapezoidalMap) {
    dag.clear();
    map.clear();

    let top = Segment2d::new(
        Point2d::new(-BOUNDING_BOX, BOUNDING_BOX),
        Point2d::new(BOUNDING_BOX, BOUNDING_BOX),
    );
    let bottom = Segment2d::new(
        Point2d::new(-BOUNDING_BOX, -BOUNDING_BOX),
        Point2d::new(BOUNDING_BOX, -BOUNDING_BOX),
    );
    let bounding = Trapezoid::new(top, bottom, top.p1, top.p2, NodeIdx::ROOT);

    let slot = map.add(bounding);
    let leaf = dag.add(Node::Leaf { trapezoid: slot });
    debug_assert_eq!(leaf, NodeIdx::ROOT);
}

/// Inserts one segment, splitting the trapezoids it pierces and rewriting
/// the corresponding leaves of the search structure.
///
/// The segment and both of its endpoints must be registered in `dataset`
/// before the call. Input segments must be non-vertical, must not cross any
/// previously inserted segment and must not be re-inserted; none of this is
/// checked here. Structure invariants hold between calls, not during one,
/// so queries must not run concurrently with an insertion.
pub fn build_trapezoidal_map(
    segment: &Segment2d,
    dag: &mut Dag,
    map: &mut TrapezoidalMap,
    dataset: &TrapezoidalMapDataset,
) -> Result<(), InsertError> {
    let ordered = segment.ordered();
    let segment_idx = dataset
        .find_segment(&ordered)
        .ok_or(InsertError::UnregisteredSegment(*segment))?;
    let p1 = dataset
        .find_point(ordered.p1)
        .ok_or(InsertError::UnregisteredEndpoint(ordered.p1))?;
    let p2 = dataset
        .find_point(ordered.p2)
        .ok_or(InsertError::UnregisteredEndpoint(ordered.p2))?;

    let pierced = follow_segment(&ordered, dag, map, dataset);
    debug!("segment {ordered} pierces {} trapezoid(s)", pierced.len());

    if let [only] = pierced.as_slice() {
        split_one_trapezoid(&ordered, segment_idx, p1, p2, *only, dag, map);
    } else {
        split_trapezoid_chain(&ordered, segment_idx, p1, p2, &pierced, dag, map);
    }
    Ok(())
}

fn bump(counter: &mut usize) -> usize {
    let index = *counter;
    *counter += 1;
    index
}

/// Splits the single pierced trapezoid into up to four: a top and a bottom
/// face along the segment, plus a cap on each side whose endpoint falls
/// strictly inside the face.
fn split_one_trapezoid(
    segment: &Segment2d,
    segment_idx: SegmentIdx,
    p1: PointIdx,
    p2: PointIdx,
    pierced: TrapIdx,
    dag: &mut Dag,
    map: &mut TrapezoidalMap,
) {
    let old = map.get(pierced).clone();

    // A cap only exists where the endpoint introduces a new vertical extent
    // inside the face; an endpoint sharing the boundary's x would make a
    // zero-width trapezoid.
    let left_exists = segment.p1.x != old.left_point().x;
    let right_exists = segment.p2.x != old.right_point().x;

    // Trapezoid slots. The top face reuses the pierced slot so the leaf
    // that named the old face keeps naming a valid one until the subtree
    // replacement below.
    let mut next = map.len();
    let top_idx = pierced;
    let bottom_idx = TrapIdx::new(bump(&mut next));
    let left_idx = left_exists.then(|| TrapIdx::new(bump(&mut next)));
    let right_idx = right_exists.then(|| TrapIdx::new(bump(&mut next)));

    // Search-structure slots. The subtree's root takes over the pierced
    // face's leaf slot; every other node appends.
    let root = old.node();
    let mut next_node = dag.len();
    let left_leaf = left_exists.then(|| NodeIdx::new(bump(&mut next_node)));
    let right_x = right_exists.then(|| {
        if left_exists {
            NodeIdx::new(bump(&mut next_node))
        } else {
            root
        }
    });
    let right_leaf = right_exists.then(|| NodeIdx::new(bump(&mut next_node)));
    let y_node = if left_exists || right_exists {
        NodeIdx::new(bump(&mut next_node))
    } else {
        root
    };
    let top_leaf = NodeIdx::new(bump(&mut next_node));
    let bottom_leaf = NodeIdx::new(bump(&mut next_node));

    // Whatever bordered the pierced face now borders a cap when one exists,
    // or the new face on its side of the segment.
    if let Some(lower_left) = old.lower_left() {
        map.get_mut(lower_left)
            .set_lower_right(Some(left_idx.unwrap_or(bottom_idx)));
    }
    if let Some(upper_left) = old.upper_left() {
        map.get_mut(upper_left)
            .set_upper_right(Some(left_idx.unwrap_or(top_idx)));
    }
    if let Some(upper_right) = old.upper_right() {
        map.get_mut(upper_right)
            .set_upper_left(Some(right_idx.unwrap_or(top_idx)));
    }
    if let Some(lower_right) = old.lower_right() {
        map.get_mut(lower_right)
            .set_lower_left(Some(right_idx.unwrap_or(bottom_idx)));
    }

    // Top face, between the old top segment and the new segment.
    let mut top = Trapezoid::new(old.top(), *segment, segment.p1, segment.p2, top_leaf);
    top.set_upper_left(if left_exists {
        left_idx
    } else if old.left_point_on_top_endpoint() {
        None
    } else {
        old.upper_left()
    });
    top.set_upper_right(if right_exists {
        right_idx
    } else if old.right_point_on_top_endpoint() {
        None
    } else {
        old.upper_right()
    });
    let replaced = map.replace(top, top_idx);
    debug_assert!(replaced);

    // Bottom face, between the new segment and the old bottom segment.
    let mut bottom = Trapezoid::new(*segment, old.bottom(), segment.p1, segment.p2, bottom_leaf);
    bottom.set_lower_left(if left_exists {
        left_idx
    } else if old.left_point_on_bottom_endpoint() {
        None
    } else {
        old.lower_left()
    });
    bottom.set_lower_right(if right_exists {
        right_idx
    } else if old.right_point_on_bottom_endpoint() {
        None
    } else {
        old.lower_right()
    });
    let added = map.add(bottom);
    debug_assert_eq!(added, bottom_idx);

    if let Some((cap_idx, cap_leaf)) = left_idx.zip(left_leaf) {
        let mut cap = Trapezoid::new(
            old.top(),
            old.bottom(),
            old.left_point(),
            segment.p1,
            cap_leaf,
        );
        cap.set_upper_left(old.upper_left());
        cap.set_upper_right(Some(top_idx));
        cap.set_lower_left(old.lower_left());
        cap.set_lower_right(Some(bottom_idx));
        let added = map.add(cap);
        debug_assert_eq!(added, cap_idx);
    }

    if let Some((cap_idx, cap_leaf)) = right_idx.zip(right_leaf) {
        let mut cap = Trapezoid::new(
            old.top(),
            old.bottom(),
            segment.p2,
            old.right_point(),
            cap_leaf,
        );
        cap.set_upper_left(Some(top_idx));
        cap.set_upper_right(old.upper_right());
        cap.set_lower_left(Some(bottom_idx));
        cap.set_lower_right(old.lower_right());
        let added = map.add(cap);
        debug_assert_eq!(added, cap_idx);
    }

    // Rewrite the search structure: the pierced leaf becomes the root of a
    // subtree of up to two X nodes and one Y node over the new leaves.
    if let Some((cap_idx, cap_leaf)) = left_idx.zip(left_leaf) {
        dag.replace(
            root,
            Node::X {
                point: p1,
                left: cap_leaf,
                right: right_x.unwrap_or(y_node),
            },
        );
        dag.add(Node::Leaf { trapezoid: cap_idx });
    }

    if let Some((cap_idx, cap_leaf)) = right_idx.zip(right_leaf) {
        let node = Node::X {
            point: p2,
            left: y_node,
            right: cap_leaf,
        };
        if left_exists {
            let added = dag.add(node);
            debug_assert_eq!(Some(added), right_x);
        } else {
            dag.replace(root, node);
        }
        dag.add(Node::Leaf { trapezoid: cap_idx });
    }

    let y = Node::Y {
        segment: segment_idx,
        above: top_leaf,
        below: bottom_leaf,
    };
    if left_exists || right_exists {
        let added = dag.add(y);
        debug_assert_eq!(added, y_node);
    } else {
        dag.replace(root, y);
    }
    dag.add(Node::Leaf { trapezoid: top_idx });
    dag.add(Node::Leaf { trapezoid: bottom_idx });
}

/// A top or bottom face being extended along the segment across several
/// pierced trapezoids. The record is not in the arena while it extends; it
/// commits into `slot` once its right side is known.
struct Strip {
    record: Trapezoid,
    slot: TrapIdx,
}

impl Strip {
    fn leaf(&self) -> NodeIdx {
        self.record.node()
    }
}

/// Splits a chain of two or more pierced trapezoids: one face per side of
/// the segment per span between corner points, plus the optional caps.
///
/// The two strips open at the leftmost face and are handed from pierced
/// trapezoid to pierced trapezoid; at each internal boundary exactly one of
/// them closes, decided by which side of the segment the shared corner lies
/// on. The still-extending strip's leaf is shared by every Y node along its
/// span, which is what keeps the search structure's expected depth
/// logarithmic.
fn split_trapezoid_chain(
    segment: &Segment2d,
    segment_idx: SegmentIdx,
    p1: PointIdx,
    p2: PointIdx,
    chain: &[TrapIdx],
    dag: &mut Dag,
    map: &mut TrapezoidalMap,
) {
    let first = chain[0];
    let last = chain[chain.len() - 1];
    let old = map.get(first).clone();

    let left_exists = segment.p1.x != old.left_point().x;
    let right_exists = segment.p2.x != map.get(last).right_point().x;

    // Leftmost face: allocate the left cap (if any) and open the two
    // strips. Only the cap materializes now; the strips stay ahead of the
    // arena tail until they close.
    let mut next = map.len();
    let top_slot = first;
    let left_idx = left_exists.then(|| TrapIdx::new(bump(&mut next)));
    let bottom_slot = TrapIdx::new(bump(&mut next));

    let root = old.node();
    let mut next_node = dag.len();
    let left_leaf = left_exists.then(|| NodeIdx::new(bump(&mut next_node)));
    let y_node = if left_exists {
        NodeIdx::new(bump(&mut next_node))
    } else {
        root
    };
    let top_leaf = NodeIdx::new(bump(&mut next_node));
    let bottom_leaf = NodeIdx::new(bump(&mut next_node));

    if let Some(lower_left) = old.lower_left() {
        map.get_mut(lower_left)
            .set_lower_right(Some(left_idx.unwrap_or(bottom_slot)));
    }
    if let Some(upper_left) = old.upper_left() {
        map.get_mut(upper_left)
            .set_upper_right(Some(left_idx.unwrap_or(top_slot)));
    }

    if let Some((cap_idx, cap_leaf)) = left_idx.zip(left_leaf) {
        let mut cap = Trapezoid::new(
            old.top(),
            old.bottom(),
            old.left_point(),
            segment.p1,
            cap_leaf,
        );
        cap.set_upper_left(old.upper_left());
        cap.set_upper_right(Some(top_slot));
        cap.set_lower_left(old.lower_left());
        cap.set_lower_right(Some(bottom_slot));
        let added = map.add(cap);
        debug_assert_eq!(added, cap_idx);
    }

    // The strips' right points stay at p1 until they close.
    let mut top_strip = {
        let mut record = Trapezoid::new(old.top(), *segment, segment.p1, segment.p1, top_leaf);
        record.set_upper_left(if left_exists {
            left_idx
        } else if old.left_point_on_top_endpoint() {
            None
        } else {
            old.upper_left()
        });
        Strip {
            record,
            slot: top_slot,
        }
    };
    let mut bottom_strip = {
        let mut record = Trapezoid::new(*segment, old.bottom(), segment.p1, segment.p1, bottom_leaf);
        record.set_lower_left(if left_exists {
            left_idx
        } else if old.left_point_on_bottom_endpoint() {
            None
        } else {
            old.lower_left()
        });
        Strip {
            record,
            slot: bottom_slot,
        }
    };

    if let Some((cap_idx, cap_leaf)) = left_idx.zip(left_leaf) {
        dag.replace(
            root,
            Node::X {
                point: p1,
                left: cap_leaf,
                right: y_node,
            },
        );
        dag.add(Node::Leaf { trapezoid: cap_idx });
    }
    let y = Node::Y {
        segment: segment_idx,
        above: top_leaf,
        below: bottom_leaf,
    };
    if left_exists {
        let added = dag.add(y);
        debug_assert_eq!(added, y_node);
    } else {
        dag.replace(root, y);
    }
    dag.add(Node::Leaf { trapezoid: top_slot });
    dag.add(Node::Leaf { trapezoid: bottom_slot });

    // Internal faces: at each boundary one strip closes at the face's left
    // point and a fresh one opens in the pierced slot; the pierced leaf
    // becomes a Y node over the fresh leaf and the extending strip's one.
    let mut prev_old = old;
    for &pierced in &chain[1..chain.len() - 1] {
        let current = map.get(pierced).clone();
        let top_ends = point_at_left(segment, prev_old.right_point());
        let y_node = current.node();
        trace!(
            "{} strip closes at face {pierced}",
            if top_ends { "top" } else { "bottom" }
        );

        if top_ends {
            if let Some(upper_right) = prev_old.upper_right() {
                map.get_mut(upper_right)
                    .set_upper_left(Some(top_strip.slot));
            }

            let new_leaf = NodeIdx::new(dag.len());

            let mut closed = top_strip;
            closed.record.set_right_point(current.left_point());
            closed.record.set_upper_right(prev_old.upper_right());
            closed.record.set_lower_right(Some(pierced));
            let closed_slot = closed.slot;
            map.commit(closed.record, closed.slot);

            let mut record = Trapezoid::new(
                current.top(),
                *segment,
                current.left_point(),
                current.right_point(),
                new_leaf,
            );
            record.set_upper_left(current.upper_left());
            record.set_lower_left(Some(closed_slot));
            top_strip = Strip {
                record,
                slot: pierced,
            };

            dag.replace(
                y_node,
                Node::Y {
                    segment: segment_idx,
                    above: new_leaf,
                    below: bottom_strip.leaf(),
                },
            );
            dag.add(Node::Leaf { trapezoid: pierced });
        } else {
            if let Some(lower_right) = prev_old.lower_right() {
                map.get_mut(lower_right)
                    .set_lower_left(Some(bottom_strip.slot));
            }

            let new_leaf = NodeIdx::new(dag.len());

            let mut closed = bottom_strip;
            closed.record.set_right_point(current.left_point());
            closed.record.set_upper_right(Some(pierced));
            closed.record.set_lower_right(prev_old.lower_right());
            let closed_slot = closed.slot;
            map.commit(closed.record, closed.slot);

            let mut record = Trapezoid::new(
                *segment,
                current.bottom(),
                current.left_point(),
                current.right_point(),
                new_leaf,
            );
            record.set_upper_left(Some(closed_slot));
            record.set_lower_left(current.lower_left());
            bottom_strip = Strip {
                record,
                slot: pierced,
            };

            dag.replace(
                y_node,
                Node::Y {
                    segment: segment_idx,
                    above: top_strip.leaf(),
                    below: new_leaf,
                },
            );
            dag.add(Node::Leaf { trapezoid: pierced });
        }

        prev_old = current;
    }

    // Rightmost face: one strip closes at its left point, the other runs
    // through to the segment's endpoint, and the slot is refilled by a
    // fresh face on the closing strip's side.
    let current = map.get(last).clone();
    let top_ends = point_at_left(segment, prev_old.right_point());

    let root = current.node();
    let mut next_node = dag.len();
    let right_leaf = right_exists.then(|| NodeIdx::new(bump(&mut next_node)));
    let y_node = if right_exists {
        NodeIdx::new(bump(&mut next_node))
    } else {
        root
    };
    let new_strip_leaf = NodeIdx::new(bump(&mut next_node));

    if let Some(upper_right) = prev_old.upper_right() {
        map.get_mut(upper_right)
            .set_upper_left(Some(top_strip.slot));
    }
    if let Some(lower_right) = prev_old.lower_right() {
        map.get_mut(lower_right)
            .set_lower_left(Some(bottom_strip.slot));
    }

    let prev_top_leaf = top_strip.leaf();
    let prev_bottom_leaf = bottom_strip.leaf();
    let (final_top_slot, final_bottom_slot);

    if top_ends {
        let mut closed = top_strip;
        closed.record.set_right_point(current.left_point());
        closed.record.set_upper_right(prev_old.upper_right());
        closed.record.set_lower_right(Some(last));
        let closed_slot = closed.slot;
        map.commit(closed.record, closed.slot);

        let mut through = bottom_strip;
        through.record.set_right_point(segment.p2);
        through.record.set_upper_right(None);
        if !right_exists {
            through
                .record
                .set_lower_right(if current.right_point_on_bottom_endpoint() {
                    None
                } else {
                    current.lower_right()
                });
        }
        let through_slot = through.slot;
        map.commit(through.record, through.slot);

        let mut record = Trapezoid::new(
            current.top(),
            *segment,
            current.left_point(),
            segment.p2,
            new_strip_leaf,
        );
        record.set_upper_left(current.upper_left());
        if !right_exists {
            record.set_upper_right(if current.right_point_on_top_endpoint() {
                None
            } else {
                current.upper_right()
            });
        }
        record.set_lower_left(Some(closed_slot));
        map.commit(record, last);

        final_top_slot = last;
        final_bottom_slot = through_slot;
    } else {
        let mut closed = bottom_strip;
        closed.record.set_right_point(current.left_point());
        closed.record.set_upper_right(Some(last));
        closed.record.set_lower_right(prev_old.lower_right());
        let closed_slot = closed.slot;
        map.commit(closed.record, closed.slot);

        let mut through = top_strip;
        through.record.set_right_point(segment.p2);
        through.record.set_lower_right(None);
        if !right_exists {
            through
                .record
                .set_upper_right(if current.right_point_on_top_endpoint() {
                    None
                } else {
                    current.upper_right()
                });
        }
        let through_slot = through.slot;
        map.commit(through.record, through.slot);

        let mut record = Trapezoid::new(
            *segment,
            current.bottom(),
            current.left_point(),
            segment.p2,
            new_strip_leaf,
        );
        record.set_upper_left(Some(closed_slot));
        record.set_lower_left(current.lower_left());
        if !right_exists {
            record.set_lower_right(if current.right_point_on_bottom_endpoint() {
                None
            } else {
                current.lower_right()
            });
        }
        map.commit(record, last);

        final_top_slot = through_slot;
        final_bottom_slot = last;
    }

    // Right cap: the last face's geometry survives right of the endpoint.
    let right_cap = right_leaf.map(|cap_leaf| {
        let mut cap = current.clone();
        cap.set_left_point(segment.p2);
        cap.set_upper_left(Some(final_top_slot));
        cap.set_lower_left(Some(final_bottom_slot));
        cap.set_node(cap_leaf);
        let slot = map.add(cap);
        map.get_mut(final_top_slot).set_upper_right(Some(slot));
        map.get_mut(final_bottom_slot).set_lower_right(Some(slot));
        (slot, cap_leaf)
    });

    if let Some(upper_right) = current.upper_right() {
        let neighbor = right_cap.map_or(final_top_slot, |(slot, _)| slot);
        map.get_mut(upper_right).set_upper_left(Some(neighbor));
    }
    if let Some(lower_right) = current.lower_right() {
        let neighbor = right_cap.map_or(final_bottom_slot, |(slot, _)| slot);
        map.get_mut(lower_right).set_lower_left(Some(neighbor));
    }

    // Rightmost subtree: an X node over the cap when it exists, then the Y
    // node sharing the through strip's leaf.
    if let Some((slot, cap_leaf)) = right_cap {
        dag.replace(
            root,
            Node::X {
                point: p2,
                left: y_node,
                right: cap_leaf,
            },
        );
        dag.add(Node::Leaf { trapezoid: slot });
    }
    let (above, below) = if top_ends {
        (new_strip_leaf, prev_bottom_leaf)
    } else {
        (prev_top_leaf, new_strip_leaf)
    };
    let y = Node::Y {
        segment: segment_idx,
        above,
        below,
    };
    if right_exists {
        let added = dag.add(y);
        debug_assert_eq!(added, y_node);
    } else {
        dag.replace(root, y);
    }
    dag.add(Node::Leaf { trapezoid: last });
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use trapmap_geometry::point_at_right;

    use super::*;
    use crate::{
        locate::{query_point, query_segment},
        validation,
    };

    fn setup() -> (Dag, TrapezoidalMap, TrapezoidalMapDataset) {
        let mut dag = Dag::new();
        let mut map = TrapezoidalMap::new();
        initialize_structures(&mut dag, &mut map);
        (dag, map, TrapezoidalMapDataset::default())
    }

    fn insert(
        segment: Segment2d,
        dag: &mut Dag,
        map: &mut TrapezoidalMap,
        dataset: &mut TrapezoidalMapDataset,
    ) {
        dataset.insert_segment(segment).unwrap();
        build_trapezoidal_map(&segment, dag, map, dataset).unwrap();
    }

    /// Post-insertion properties: structural invariants, endpoint and
    /// midpoint location, and follow/query round trips for every segment
    /// inserted so far.
    fn check_invariants(
        dag: &Dag,
        map: &TrapezoidalMap,
        dataset: &TrapezoidalMapDataset,
        inserted: &[Segment2d],
    ) {
        validation::validate(dag, map).unwrap();

        // Every registered endpoint locates a face it bounds.
        for p in dataset.points() {
            let face = map.get(query_point(p, dag, dataset));
            assert!(
                face.left_point() == p || face.right_point() == p,
                "endpoint {p} located a face it does not bound",
            );
        }

        for s in inserted {
            let ordered = s.ordered();

            // The midpoint locates a face the segment bounds.
            let face = map.get(query_point(ordered.midpoint(), dag, dataset));
            assert!(
                face.top() == ordered || face.bottom() == ordered,
                "midpoint of {ordered} located a face it does not bound",
            );

            // The pierced chain covers both endpoints and is contiguous.
            let chain = follow_segment(&ordered, dag, map, dataset);
            let first = map.get(chain[0]);
            let last = map.get(chain[chain.len() - 1]);
            assert!(first.left_point().x <= ordered.p1.x && ordered.p1.x <= first.right_point().x);
            assert!(last.left_point().x <= ordered.p2.x && ordered.p2.x <= last.right_point().x);
            for pair in chain.windows(2) {
                assert_eq!(
                    map.get(pair[0]).right_point().x,
                    map.get(pair[1]).left_point().x,
                );
            }

            // Query results are stable across repeated calls.
            assert_eq!(follow_segment(&ordered, dag, map, dataset), chain);
            assert_eq!(
                query_segment(&ordered, dag, dataset),
                query_segment(&ordered, dag, dataset),
            );
        }
    }

    /// Scans every live face for intersection with an x-ascending segment
    /// that crosses no stored segment.
    fn brute_force_pierced(segment: &Segment2d, dag: &Dag, map: &TrapezoidalMap) -> Vec<TrapIdx> {
        let slope = (segment.p2.y - segment.p1.y) / (segment.p2.x - segment.p1.x);
        let mut pierced = Vec::new();
        for index in validation::live_trapezoids(dag, map).ones() {
            let idx = TrapIdx::new(index);
            let t = map.get(idx);
            let lo = segment.p1.x.max(t.left_point().x);
            let hi = segment.p2.x.min(t.right_point().x);
            if lo >= hi {
                continue;
            }
            let mid_x = (lo + hi) / 2.0;
            let probe = Point2d::new(mid_x, segment.p1.y + slope * (mid_x - segment.p1.x));
            if point_at_right(&t.top().ordered(), probe)
                && point_at_left(&t.bottom().ordered(), probe)
            {
                pierced.push(idx);
            }
        }
        pierced
    }

    #[test]
    fn interior_segment_splits_the_box_into_four() {
        let (mut dag, mut map, mut dataset) = setup();
        let s = Segment2d::new(Point2d::new(-100.0, 0.0), Point2d::new(100.0, 0.0));
        insert(s, &mut dag, &mut map, &mut dataset);

        assert_eq!(map.len(), 4);
        let top = query_point(Point2d::new(0.0, 10.0), &dag, &dataset);
        let bottom = query_point(Point2d::new(0.0, -10.0), &dag, &dataset);
        let left = query_point(Point2d::new(-500.0, 0.0), &dag, &dataset);
        let right = query_point(Point2d::new(500.0, 0.0), &dag, &dataset);

        assert_eq!(map.get(top).bottom(), s);
        assert_eq!(map.get(bottom).top(), s);
        assert_eq!(map.get(left).right_point(), s.p1);
        assert_eq!(map.get(right).left_point(), s.p2);

        // The pierced slot is reused by the top face; the rest append.
        assert_eq!(top.index(), 0);
        assert_eq!(bottom.index(), 1);
        assert_eq!(left.index(), 2);
        assert_eq!(right.index(), 3);

        // One X node per endpoint, one Y node, four leaves.
        assert_eq!(dag.len(), 7);
        let (mut xs, mut ys, mut leaves) = (0, 0, 0);
        for node in dag.nodes() {
            match node {
                Node::X { .. } => xs += 1,
                Node::Y { .. } => ys += 1,
                Node::Leaf { .. } => leaves += 1,
            }
        }
        assert_eq!((xs, ys, leaves), (2, 1, 4));
        assert!(matches!(dag.root(), Node::X { .. }));

        check_invariants(&dag, &map, &dataset, &[s]);
    }

    #[test]
    fn endpoint_on_the_left_boundary_skips_the_left_cap() {
        let (mut dag, mut map, mut dataset) = setup();
        let s = Segment2d::new(Point2d::new(-BOUNDING_BOX, 0.0), Point2d::new(0.0, 0.0));
        insert(s, &mut dag, &mut map, &mut dataset);

        // Top, bottom and right cap only; no zero-width face on the left.
        assert_eq!(map.len(), 3);
        let top = query_point(Point2d::new(-100.0, 10.0), &dag, &dataset);
        let bottom = query_point(Point2d::new(-100.0, -10.0), &dag, &dataset);
        let right = query_point(Point2d::new(100.0, 0.0), &dag, &dataset);
        assert_eq!(top.index(), 0);
        assert_eq!(map.get(top).bottom(), s);
        assert_eq!(map.get(bottom).top(), s);
        assert_eq!(map.get(right).left_point(), s.p2);
        assert!(map.get(top).upper_left().is_none());
        assert!(map.get(bottom).lower_left().is_none());

        check_invariants(&dag, &map, &dataset, &[s]);
    }

    #[test]
    fn disjoint_segments_leave_the_middle_face_intact() {
        let (mut dag, mut map, mut dataset) = setup();
        let s1 = Segment2d::new(Point2d::new(-200.0, 10.0), Point2d::new(-100.0, 10.0));
        let s2 = Segment2d::new(Point2d::new(100.0, -10.0), Point2d::new(200.0, -10.0));
        insert(s1, &mut dag, &mut map, &mut dataset);
        check_invariants(&dag, &map, &dataset, &[s1]);
        insert(s2, &mut dag, &mut map, &mut dataset);

        // Between the two x-ranges the full height of the box survives.
        let middle = map.get(query_point(Point2d::new(0.0, 0.0), &dag, &dataset));
        assert_eq!(middle.top().p1.y, BOUNDING_BOX);
        assert_eq!(middle.bottom().p1.y, -BOUNDING_BOX);
        assert_eq!(middle.left_point(), s1.p2);
        assert_eq!(middle.right_point(), s2.p1);

        check_invariants(&dag, &map, &dataset, &[s1, s2]);
    }

    #[test]
    fn segment_piercing_three_faces_builds_strips() {
        let (mut dag, mut map, mut dataset) = setup();
        let s1 = Segment2d::new(Point2d::new(0.0, 50.0), Point2d::new(100.0, 80.0));
        insert(s1, &mut dag, &mut map, &mut dataset);
        assert_eq!(map.len(), 4);

        // The new segment crosses the vertical walls dropped from both of
        // the first segment's endpoints.
        let h = Segment2d::new(Point2d::new(-50.0, 0.0), Point2d::new(200.0, 0.0));
        let chain = follow_segment(&h, &dag, &map, &dataset);
        assert_eq!(chain.len(), 3);
        insert(h, &mut dag, &mut map, &mut dataset);
        assert_eq!(map.len(), 7);

        // Below the segment a single strip runs under both walls.
        let below = map.get(query_point(Point2d::new(50.0, -10.0), &dag, &dataset));
        assert_eq!(below.top(), h);
        assert_eq!(below.left_point(), h.p1);
        assert_eq!(below.right_point(), h.p2);

        // Above it the walls split the strip at x = 0 and x = 100.
        let between = map.get(query_point(Point2d::new(50.0, 10.0), &dag, &dataset));
        assert_eq!(between.top(), s1);
        assert_eq!(between.bottom(), h);
        let after = map.get(query_point(Point2d::new(150.0, 10.0), &dag, &dataset));
        assert_eq!(after.bottom(), h);
        assert_eq!(after.left_point(), s1.p2);

        check_invariants(&dag, &map, &dataset, &[s1, h]);
    }

    #[test]
    fn follow_segment_matches_brute_force_across_flips() {
        let (mut dag, mut map, mut dataset) = setup();
        let s1 = Segment2d::new(Point2d::new(-100.0, 50.0), Point2d::new(50.0, 10.0));
        let s2 = Segment2d::new(Point2d::new(-50.0, -10.0), Point2d::new(100.0, -50.0));
        insert(s1, &mut dag, &mut map, &mut dataset);
        insert(s2, &mut dag, &mut map, &mut dataset);
        check_invariants(&dag, &map, &dataset, &[s1, s2]);

        // Probe between the two segments: the chain leaves its first face
        // through the upper-right neighbor and the next through the
        // lower-right one.
        let probe = Segment2d::new(Point2d::new(-80.0, 0.0), Point2d::new(80.0, 0.0));
        let chain = follow_segment(&probe, &dag, &map, &dataset);
        assert_eq!(chain.len(), 3);

        let mut walked: Vec<TrapIdx> = chain.iter().copied().collect();
        let mut expected = brute_force_pierced(&probe, &dag, &map);
        walked.sort_unstable_by_key(|idx| idx.index());
        expected.sort_unstable_by_key(|idx| idx.index());
        assert_eq!(walked, expected);

        // Inserting the probe as a third segment keeps everything sound.
        insert(probe, &mut dag, &mut map, &mut dataset);
        check_invariants(&dag, &map, &dataset, &[s1, s2, probe]);
    }

    #[test]
    fn insertion_accepts_either_endpoint_order() {
        let (mut dag, mut map, mut dataset) = setup();
        let s = Segment2d::new(Point2d::new(100.0, 0.0), Point2d::new(-100.0, 0.0));
        insert(s, &mut dag, &mut map, &mut dataset);
        assert_eq!(map.len(), 4);
        check_invariants(&dag, &map, &dataset, &[s]);
    }

    #[test]
    fn incremental_insertions_preserve_invariants() {
        let (mut dag, mut map, mut dataset) = setup();
        let segments = [
            Segment2d::new(Point2d::new(-400.0, 200.0), Point2d::new(-50.0, 250.0)),
            Segment2d::new(Point2d::new(-300.0, -150.0), Point2d::new(150.0, -100.0)),
            Segment2d::new(Point2d::new(-200.0, 20.0), Point2d::new(300.0, 60.0)),
            Segment2d::new(Point2d::new(350.0, -250.0), Point2d::new(500.0, 150.0)),
            Segment2d::new(Point2d::new(-450.0, -300.0), Point2d::new(520.0, -280.0)),
        ];
        let mut inserted: Vec<Segment2d> = Vec::new();
        for segment in segments {
            insert(segment, &mut dag, &mut map, &mut dataset);
            inserted.push(segment);
            check_invariants(&dag, &map, &dataset, &inserted);
        }
        // The arena only ever grows; every live face stays reachable.
        let live = validation::live_trapezoids(&dag, &map);
        assert!(live.count_ones(..) <= map.len());
    }

    #[test]
    fn unregistered_segments_are_rejected() {
        let (mut dag, mut map, dataset) = setup();
        let s = Segment2d::new(Point2d::new(-1.0, 0.0), Point2d::new(1.0, 0.0));
        assert_eq!(
            build_trapezoidal_map(&s, &mut dag, &mut map, &dataset),
            Err(InsertError::UnregisteredSegment(s))
        );
    }
}
