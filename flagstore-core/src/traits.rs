//! Core flag store traits
//!
//! This module defines the uniform contract shared by every backing
//! representation, and the word trait that parameterizes the bounded store.

use alloc::vec::Vec;

use crate::error::Result;

/// Uniform boolean-flag semantics over a non-negative index space
///
/// Every backing representation honours the same contract: a fresh store
/// reports `false` for every index, `set` and `clear` are idempotent, and
/// flags at distinct indices never interfere with each other.
pub trait FlagStore {
    /// Mark the flag at `index` true
    ///
    /// Only bounded stores can fail, with [`FlagError::OutOfRange`] when
    /// `index` is not covered by the current capacity.
    ///
    /// [`FlagError::OutOfRange`]: crate::FlagError::OutOfRange
    fn set(&mut self, index: usize) -> Result<()>;

    /// Mark the flag at `index` false
    ///
    /// Clearing a flag that is already false, or that lies beyond a bounded
    /// store's capacity, succeeds without changing anything.
    fn clear(&mut self, index: usize);

    /// Get the current state of the flag at `index`
    fn test(&self, index: usize) -> bool;

    /// Flip the flag at `index` and return its new state
    fn toggle(&mut self, index: usize) -> Result<bool>;

    /// Get the number of flags currently set
    fn count(&self) -> usize;

    /// Check whether no flag is set
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Clear every flag, keeping any allocated capacity
    fn clear_all(&mut self);

    /// Get the addressable capacity, or `None` when the store grows implicitly
    fn capacity(&self) -> Option<usize>;

    /// Get all set flag indices in ascending order
    fn ones(&self) -> Vec<usize>;

    /// Get the highest set flag index
    fn highest(&self) -> Option<usize> {
        self.ones().last().copied()
    }
}

/// Fixed-width unsigned word used as a bit-packed container
///
/// Bit manipulation happens in the `u64` domain; every supported width
/// divides 64 so a `u64` digit splits evenly into words.
pub trait Word: Copy + Clone + PartialEq + Eq + Default + core::fmt::Debug {
    /// Number of flag bits held by one word
    const BITS: usize;

    /// Widen to `u64`
    fn to_u64(self) -> u64;

    /// Narrow from `u64`, dropping bits above [`Word::BITS`]
    fn from_u64(value: u64) -> Self;
}

impl Word for u8 {
    const BITS: usize = 8;

    fn to_u64(self) -> u64 {
        self as u64
    }

    fn from_u64(value: u64) -> Self {
        value as u8
    }
}

impl Word for u16 {
    const BITS: usize = 16;

    fn to_u64(self) -> u64 {
        self as u64
    }

    fn from_u64(value: u64) -> Self {
        value as u16
    }
}

impl Word for u32 {
    const BITS: usize = 32;

    fn to_u64(self) -> u64 {
        self as u64
    }

    fn from_u64(value: u64) -> Self {
        value as u32
    }
}

impl Word for u64 {
    const BITS: usize = 64;

    fn to_u64(self) -> u64 {
        self
    }

    fn from_u64(value: u64) -> Self {
        value
    }
}
