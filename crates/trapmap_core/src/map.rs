use alloc::vec::Vec;

use trapmap_geometry::{Bounds, Point2d};

use crate::{idx::TrapIdx, trapezoid::Trapezoid};

/// Half-extent of the bounding rectangle. Every input segment must lie
/// within `[-BOUNDING_BOX, BOUNDING_BOX]` on both axes.
pub const BOUNDING_BOX: f64 = 1e6;

/// The trapezoidal map: an arena of [`Trapezoid`] slots.
///
/// Slots are appended or overwritten, never removed. The insertion
/// algorithms reuse the slot of the first pierced trapezoid for the new top
/// trapezoid, so the leaf that named the old face keeps naming a valid one
/// while the search structure is rewritten around it; a face replaced at
/// some other slot is simply orphaned and becomes unreachable.
#[derive(Clone, Debug)]
pub struct TrapezoidalMap {
    trapezoids: Vec<Trapezoid>,
    bounds: Bounds,
}

impl TrapezoidalMap {
    pub fn new() -> Self {
        Self {
            trapezoids: Vec::new(),
            bounds: Bounds::new(
                Point2d::new(-BOUNDING_BOX, -BOUNDING_BOX),
                Point2d::new(BOUNDING_BOX, BOUNDING_BOX),
            ),
        }
    }

    /// Appends a trapezoid and returns its slot.
    pub(crate) fn add(&mut self, trapezoid: Trapezoid) -> TrapIdx {
        let idx = TrapIdx::new(self.trapezoids.len());
        self.trapezoids.push(trapezoid);
        idx
    }

    /// Overwrites slot `idx`. Returns `false` when the slot does not exist
    /// yet, leaving the arena untouched; callers then fall back to
    /// [`add`](Self::add).
    pub(crate) fn replace(&mut self, trapezoid: Trapezoid, idx: TrapIdx) -> bool {
        match self.trapezoids.get_mut(idx.index()) {
            Some(slot) => {
                *slot = trapezoid;
                true
            }
            None => false,
        }
    }

    /// Replace-or-append: lands `trapezoid` on slot `idx` whether or not the
    /// slot exists yet. Strips are laid out ahead of the arena tail during a
    /// chain insertion; their first commit is the append that materializes
    /// the predicted slot.
    pub(crate) fn commit(&mut self, trapezoid: Trapezoid, idx: TrapIdx) {
        if let Some(slot) = self.trapezoids.get_mut(idx.index()) {
            *slot = trapezoid;
        } else {
            debug_assert_eq!(idx.index(), self.trapezoids.len());
            self.trapezoids.push(trapezoid);
        }
    }

    pub fn get(&self, idx: TrapIdx) -> &Trapezoid {
        &self.trapezoids[idx.index()]
    }

    pub(crate) fn get_mut(&mut self, idx: TrapIdx) -> &mut Trapezoid {
        &mut self.trapezoids[idx.index()]
    }

    pub fn len(&self) -> usize {
        self.trapezoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trapezoids.is_empty()
    }

    pub fn trapezoids(&self) -> &[Trapezoid] {
        &self.trapezoids
    }

    /// The bounding rectangle all inserted segments must stay within.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn clear(&mut self) {
        self.trapezoids.clear();
    }
}

impl Default for TrapezoidalMap {
    fn default() -> Self {
        Self::new()
    }
}
