use derive_more::derive::Display;
use nonmax::NonMaxUsize;

/// Position of a trapezoid in the [`TrapezoidalMap`](crate::TrapezoidalMap)
/// arena.
///
/// Backed by [`NonMaxUsize`], so `Option<TrapIdx>` is a single word: the
/// all-ones niche is the "no neighbor" sentinel and can never name a live
/// slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[repr(transparent)]
pub struct TrapIdx(NonMaxUsize);

/// Position of a node in the [`Dag`](crate::Dag) arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[repr(transparent)]
pub struct NodeIdx(NonMaxUsize);

macro_rules! impl_arena_idx {
    ($ty:ident) => {
        impl $ty {
            pub(crate) const fn new(index: usize) -> Self {
                match NonMaxUsize::new(index) {
                    Some(index) => Self(index),
                    None => panic!("arena index overflow"),
                }
            }

            /// The raw arena position.
            #[inline]
            pub const fn index(self) -> usize {
                self.0.get()
            }
        }
    };
}

impl_arena_idx!(TrapIdx);
impl_arena_idx!(NodeIdx);

impl NodeIdx {
    /// The root of the search structure. It never moves.
    pub const ROOT: Self = Self::new(0);
}

/// Stable index assigned by the dataset to a registered input point.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[repr(transparent)]
pub struct PointIdx(pub(crate) usize);

/// Stable index assigned by the dataset to a registered input segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[repr(transparent)]
pub struct SegmentIdx(pub(crate) usize);

impl PointIdx {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl SegmentIdx {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}
