use trapmap_geometry::{Bounds, Point2d, Segment2d};

use crate::{
    error::DatasetError,
    hash::IndexMap,
    idx::{PointIdx, SegmentIdx},
    map::BOUNDING_BOX,
};

/// A registered point, identified by the exact bit patterns of its
/// coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct PointKey(u64, u64);

impl PointKey {
    fn new(p: Point2d) -> Self {
        Self(p.x.to_bits(), p.y.to_bits())
    }
}

/// A registered segment, identified by its unordered pair of endpoint
/// indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct SegmentKey(PointIdx, PointIdx);

impl SegmentKey {
    fn new(a: PointIdx, b: PointIdx) -> Self {
        if b.index() < a.index() {
            Self(b, a)
        } else {
            Self(a, b)
        }
    }
}

/// Registry assigning stable indices to distinct input points and segments.
///
/// The search structure stores dataset indices, never coordinates, so
/// endpoint identity is exact (`==` on registered values) rather than
/// derived from the orientation predicate. Both registries are
/// insertion-ordered maps: the map position *is* the stable index.
#[derive(Clone, Debug, Default)]
pub struct TrapezoidalMapDataset {
    points: IndexMap<PointKey, Point2d>,
    /// Values keep the endpoint indices in registration order; keys are
    /// unordered so lookup is orientation-insensitive.
    segments: IndexMap<SegmentKey, (PointIdx, PointIdx)>,
}

impl TrapezoidalMapDataset {
    const BOUNDS: Bounds = Bounds::new(
        Point2d::new(-BOUNDING_BOX, -BOUNDING_BOX),
        Point2d::new(BOUNDING_BOX, BOUNDING_BOX),
    );

    /// Registers a point, returning its stable index. Registering the same
    /// point again returns the index it already has.
    pub fn insert_point(&mut self, p: Point2d) -> PointIdx {
        let (index, _) = self.points.insert_full(PointKey::new(p), p);
        PointIdx(index)
    }

    /// Registers a segment and both of its endpoints, returning the
    /// segment's stable index.
    pub fn insert_segment(&mut self, s: Segment2d) -> Result<SegmentIdx, DatasetError> {
        if s.is_degenerate() {
            return Err(DatasetError::Degenerate(s.p1));
        }
        for endpoint in [s.p1, s.p2] {
            if !Self::BOUNDS.contains(endpoint) {
                return Err(DatasetError::OutOfBounds(endpoint));
            }
        }

        let p1 = self.insert_point(s.p1);
        let p2 = self.insert_point(s.p2);
        match self.segments.entry(SegmentKey::new(p1, p2)) {
            indexmap::map::Entry::Occupied(_) => Err(DatasetError::AlreadyRegistered(s)),
            indexmap::map::Entry::Vacant(entry) => {
                let index = entry.index();
                entry.insert((p1, p2));
                Ok(SegmentIdx(index))
            }
        }
    }

    /// The stable index of a previously registered point.
    pub fn find_point(&self, p: Point2d) -> Option<PointIdx> {
        self.points.get_index_of(&PointKey::new(p)).map(PointIdx)
    }

    /// The stable index of a previously registered segment, regardless of
    /// endpoint orientation.
    pub fn find_segment(&self, s: &Segment2d) -> Option<SegmentIdx> {
        let p1 = self.find_point(s.p1)?;
        let p2 = self.find_point(s.p2)?;
        self.segments
            .get_index_of(&SegmentKey::new(p1, p2))
            .map(SegmentIdx)
    }

    /// Coordinates of the point with stable index `idx`.
    pub fn point(&self, idx: PointIdx) -> Point2d {
        self.points[idx.index()]
    }

    /// The segment with stable index `idx`, in registration orientation.
    pub fn segment(&self, idx: SegmentIdx) -> Segment2d {
        let (a, b) = self.segments[idx.index()];
        Segment2d::new(self.point(a), self.point(b))
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Iterates over all registered points.
    pub fn points(&self) -> impl Iterator<Item = Point2d> + '_ {
        self.points.values().copied()
    }

    /// Iterates over all registered segments, in registration orientation.
    pub fn segments(&self) -> impl Iterator<Item = Segment2d> + '_ {
        self.segments
            .values()
            .map(|&(a, b)| Segment2d::new(self.point(a), self.point(b)))
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
    }
}
