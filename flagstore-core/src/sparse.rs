//! Sparse flag storage as a membership set of set indices

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::error::Result;
use crate::traits::FlagStore;

/// Sparse flag store holding only the indices that are set
///
/// Memory is proportional to the number of set flags rather than to the
/// highest index, which suits mostly-empty index spaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SparseFlags {
    set: HashSet<usize>,
}

impl SparseFlags {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `expected` set flags
    pub fn with_expected(expected: usize) -> Self {
        Self {
            set: HashSet::with_capacity(expected),
        }
    }

    /// Create a store with the given flags set
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        indices.into_iter().collect()
    }

    /// Iterate over set indices in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.set.iter().copied()
    }
}

impl FlagStore for SparseFlags {
    fn set(&mut self, index: usize) -> Result<()> {
        self.set.insert(index);
        Ok(())
    }

    fn clear(&mut self, index: usize) {
        self.set.remove(&index);
    }

    fn test(&self, index: usize) -> bool {
        self.set.contains(&index)
    }

    fn toggle(&mut self, index: usize) -> Result<bool> {
        if self.set.remove(&index) {
            Ok(false)
        } else {
            self.set.insert(index);
            Ok(true)
        }
    }

    fn count(&self) -> usize {
        self.set.len()
    }

    fn clear_all(&mut self) {
        self.set.clear();
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn ones(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.set.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    fn highest(&self) -> Option<usize> {
        self.set.iter().copied().max()
    }
}

impl FromIterator<usize> for SparseFlags {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for SparseFlags {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.set.extend(iter);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SparseFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ones())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SparseFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let indices = Vec::<usize>::deserialize(deserializer)?;
        Ok(Self::from_indices(indices))
    }
}
