//! Structural checks for the coupled map and search structures.
//!
//! Everything here describes the quiescent state between insertions.
//! Running the checks mid-insertion is meaningless: an insertion edits both
//! structures through a sequence of local, transiently inconsistent steps.

use alloc::vec::Vec;

use fixedbitset::FixedBitSet;

use crate::{
    dag::Dag,
    hash::HashMap,
    idx::{NodeIdx, TrapIdx},
    map::TrapezoidalMap,
    node::Node,
};

/// A violated structural invariant.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// A right neighbor does not start at this trapezoid's right extent.
    #[error("trapezoid {trapezoid} ends at x = {at} but right neighbor {neighbor} starts elsewhere")]
    MisalignedNeighbor {
        trapezoid: TrapIdx,
        neighbor: TrapIdx,
        at: f64,
    },
    /// A left neighbor does not name this trapezoid as its right neighbor.
    #[error("trapezoid {trapezoid} has left neighbor {neighbor}, which does not point back")]
    AsymmetricNeighbor { trapezoid: TrapIdx, neighbor: TrapIdx },
    /// A live trapezoid's back-index does not lead to its own leaf.
    #[error("trapezoid {trapezoid} references node {node}, which is not the leaf naming it")]
    BrokenBackIndex { trapezoid: TrapIdx, node: NodeIdx },
    /// A trapezoid is named by more than one reachable leaf.
    #[error("trapezoid {trapezoid} is named by {leaves} reachable leaves")]
    DuplicateLeaf { trapezoid: TrapIdx, leaves: usize },
}

/// Walks the search structure from the root and counts, per trapezoid, the
/// reachable leaves naming it. Shared leaves are counted once; the walk
/// visits every node at most once.
fn reachable_leaf_counts(dag: &Dag) -> HashMap<TrapIdx, usize> {
    let mut counts = HashMap::default();
    if dag.is_empty() {
        return counts;
    }

    let mut visited = FixedBitSet::with_capacity(dag.len());
    let mut stack: Vec<NodeIdx> = Vec::new();
    stack.push(NodeIdx::ROOT);
    while let Some(idx) = stack.pop() {
        if visited.put(idx.index()) {
            continue;
        }
        match *dag.get(idx) {
            Node::X { left, right, .. } => {
                stack.push(left);
                stack.push(right);
            }
            Node::Y { above, below, .. } => {
                stack.push(above);
                stack.push(below);
            }
            Node::Leaf { trapezoid } => *counts.entry(trapezoid).or_insert(0) += 1,
        }
    }
    counts
}

/// The set of live trapezoids: those named by a leaf reachable from the
/// root. Orphaned slots stay in the arena but drop out of this set.
pub fn live_trapezoids(dag: &Dag, map: &TrapezoidalMap) -> FixedBitSet {
    let mut live = FixedBitSet::with_capacity(map.len());
    for trapezoid in reachable_leaf_counts(dag).keys() {
        live.insert(trapezoid.index());
    }
    live
}

/// Checks the quiescent-state invariants over the live set: vertical edges
/// align with their right neighbors, left neighbors point back, and the
/// reachable leaves are in bijection with the live trapezoids through the
/// back-indices.
pub fn validate(dag: &Dag, map: &TrapezoidalMap) -> Result<(), ValidationError> {
    for (&trapezoid, &leaves) in &reachable_leaf_counts(dag) {
        if leaves != 1 {
            return Err(ValidationError::DuplicateLeaf { trapezoid, leaves });
        }
        let t = map.get(trapezoid);
        if dag.get(t.node()).as_leaf() != Some(trapezoid) {
            return Err(ValidationError::BrokenBackIndex {
                trapezoid,
                node: t.node(),
            });
        }

        for neighbor in [t.upper_right(), t.lower_right()].into_iter().flatten() {
            if map.get(neighbor).left_point().x != t.right_point().x {
                return Err(ValidationError::MisalignedNeighbor {
                    trapezoid,
                    neighbor,
                    at: t.right_point().x,
                });
            }
        }

        if let Some(neighbor) = t.upper_left() {
            if map.get(neighbor).upper_right() != Some(trapezoid) {
                return Err(ValidationError::AsymmetricNeighbor {
                    trapezoid,
                    neighbor,
                });
            }
        }
        if let Some(neighbor) = t.lower_left() {
            if map.get(neighbor).lower_right() != Some(trapezoid) {
                return Err(ValidationError::AsymmetricNeighbor {
                    trapezoid,
                    neighbor,
                });
            }
        }
    }
    Ok(())
}
