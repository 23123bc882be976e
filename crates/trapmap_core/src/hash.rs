//! Deterministic hashing for the registry and validation maps, based on
//! [`foldhash`].

use core::hash::BuildHasher;

pub use foldhash::fast::{FixedState, FoldHasher as DefaultHasher};

const FIXED_HASHER: FixedState =
    FixedState::with_seed(0b0110001101011110011110010010110111010001010110000101011011101001);

/// Deterministic hasher based upon a random but fixed state.
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHasher;

impl BuildHasher for FixedHasher {
    type Hasher = DefaultHasher<'static>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASHER.build_hasher()
    }
}

/// [`indexmap::IndexMap`] defaulting to [`FixedHasher`].
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, FixedHasher>;

/// [`hashbrown::HashMap`] defaulting to [`FixedHasher`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHasher>;
