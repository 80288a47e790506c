//! Dense bounded flag storage over a fixed-width word array
//!
//! Flag `i` lives in word `i / W::BITS` at bit `i % W::BITS`. The word array
//! only grows through an explicit [`BoundedFlags::resize`] or
//! [`BoundedFlags::grow_to_include`], never as a side effect of `set`.

use alloc::vec;
use alloc::vec::Vec;

use num_bigint::BigUint;

use crate::error::{FlagError, Result};
use crate::traits::{FlagStore, Word};

/// Dense flag store with an explicit, word-granular capacity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BoundedFlags<W: Word = u64> {
    /// Packed flag bits, lowest index in the lowest bit of word 0
    words: Vec<W>,
}

impl<W: Word> BoundedFlags<W> {
    /// Create an empty store with zero capacity
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Create an empty store covering at least `capacity` flags
    ///
    /// Capacity is rounded up to a whole number of words.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![W::default(); Self::words_for(capacity)],
        }
    }

    /// Create an empty store covering at least `capacity` flags, reporting
    /// allocation failure instead of aborting
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut flags = Self::new();
        flags.try_resize(capacity)?;
        Ok(flags)
    }

    /// Create a store from raw words
    pub fn from_words(words: Vec<W>) -> Self {
        Self { words }
    }

    /// Get the raw words (for serialization)
    pub fn words(&self) -> &[W] {
        &self.words
    }

    /// Get the number of backing words
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the number of addressable flags (words × word width)
    pub fn bit_capacity(&self) -> usize {
        self.words.len() * W::BITS
    }

    /// Reallocate the word array to cover `capacity` flags
    ///
    /// Flags below the new (word-rounded) capacity keep their state and
    /// position. Shrinking discards flags at or above the new capacity.
    pub fn resize(&mut self, capacity: usize) {
        self.words.resize(Self::words_for(capacity), W::default());
    }

    /// Fallible [`resize`](Self::resize): fails with `AllocationFailed` and
    /// leaves the store unchanged when the word array cannot grow
    pub fn try_resize(&mut self, capacity: usize) -> Result<()> {
        let words = Self::words_for(capacity);
        if let Some(additional) = words.checked_sub(self.words.len()) {
            self.words
                .try_reserve_exact(additional)
                .map_err(|_| FlagError::AllocationFailed { capacity })?;
        }
        self.words.resize(words, W::default());
        Ok(())
    }

    /// Grow just enough for `index` to become addressable
    pub fn grow_to_include(&mut self, index: usize) {
        if index >= self.bit_capacity() {
            self.resize(index.saturating_add(1));
        }
    }

    /// Fallible [`grow_to_include`](Self::grow_to_include)
    pub fn try_grow_to_include(&mut self, index: usize) -> Result<()> {
        if index >= self.bit_capacity() {
            self.try_resize(index.saturating_add(1))?;
        }
        Ok(())
    }

    /// Grow to cover `index` if needed, then set it
    ///
    /// This is the explicit resize step followed by `set`, folded into one
    /// call for callers that opt into growth.
    pub fn set_growing(&mut self, index: usize) {
        self.grow_to_include(index);
        let (word, bit) = Self::locate(index);
        if let Some(word) = self.words.get_mut(word) {
            *word = W::from_u64(word.to_u64() | (1 << bit));
        }
    }

    /// Drop trailing words that hold no set flag
    pub fn shrink_to_fit(&mut self) {
        while self.words.last().is_some_and(|word| word.to_u64() == 0) {
            self.words.pop();
        }
        self.words.shrink_to_fit();
    }

    /// Encode as an unsigned integer where bit `b` is flag `b`
    pub fn to_integer(&self) -> BigUint {
        let digits: Vec<u32> = self
            .words
            .chunks(Self::words_per_digit())
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (k, word)| acc | (word.to_u64() << (k * W::BITS)))
            })
            .flat_map(|digit| [digit as u32, (digit >> 32) as u32])
            .collect();
        BigUint::new(digits)
    }

    /// Decode an unsigned integer into a store of at least `capacity` flags
    ///
    /// Fails when `value` has a bit set at or beyond the rounded capacity,
    /// or when the word array cannot be allocated.
    pub fn from_integer(value: &BigUint, capacity: usize) -> Result<Self> {
        let rounded = Self::words_for(capacity).saturating_mul(W::BITS);
        let bits = usize::try_from(value.bits()).unwrap_or(usize::MAX);
        if bits > rounded {
            return Err(FlagError::OutOfRange {
                index: bits - 1,
                capacity: rounded,
            });
        }

        let mut flags = Self::try_with_capacity(capacity)?;

        for (position, digit) in value.iter_u64_digits().enumerate() {
            flags.store_digit(position, digit);
        }
        Ok(flags)
    }

    /// Encode as a single `u64`, if every set flag is below 64
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.to_integer()).ok()
    }

    /// Decode a single `u64` into a store with capacity 64
    pub fn from_u64(value: u64) -> Self {
        let mut flags = Self::with_capacity(64);
        flags.store_digit(0, value);
        flags
    }

    fn words_for(capacity: usize) -> usize {
        capacity.div_ceil(W::BITS)
    }

    fn words_per_digit() -> usize {
        64 / W::BITS
    }

    fn locate(index: usize) -> (usize, u32) {
        (index / W::BITS, (index % W::BITS) as u32)
    }

    /// Spread one 64-bit digit over the words it covers
    fn store_digit(&mut self, position: usize, digit: u64) {
        let per_digit = Self::words_per_digit();
        for k in 0..per_digit {
            if let Some(word) = self.words.get_mut(position * per_digit + k) {
                *word = W::from_u64(digit >> (k * W::BITS));
            }
        }
    }
}

impl<W: Word> FlagStore for BoundedFlags<W> {
    fn set(&mut self, index: usize) -> Result<()> {
        let capacity = self.bit_capacity();
        let (word, bit) = Self::locate(index);
        let word = self
            .words
            .get_mut(word)
            .ok_or(FlagError::OutOfRange { index, capacity })?;
        *word = W::from_u64(word.to_u64() | (1 << bit));
        Ok(())
    }

    fn clear(&mut self, index: usize) {
        let (word, bit) = Self::locate(index);
        if let Some(word) = self.words.get_mut(word) {
            *word = W::from_u64(word.to_u64() & !(1 << bit));
        }
    }

    fn test(&self, index: usize) -> bool {
        let (word, bit) = Self::locate(index);
        self.words
            .get(word)
            .is_some_and(|word| word.to_u64() & (1 << bit) != 0)
    }

    fn toggle(&mut self, index: usize) -> Result<bool> {
        let capacity = self.bit_capacity();
        let (word, bit) = Self::locate(index);
        let word = self
            .words
            .get_mut(word)
            .ok_or(FlagError::OutOfRange { index, capacity })?;
        let flipped = word.to_u64() ^ (1 << bit);
        *word = W::from_u64(flipped);
        Ok(flipped & (1 << bit) != 0)
    }

    fn count(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.to_u64().count_ones() as usize)
            .sum()
    }

    fn clear_all(&mut self) {
        self.words.fill(W::default());
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.bit_capacity())
    }

    fn ones(&self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.count());
        for (position, word) in self.words.iter().enumerate() {
            let mut bits = word.to_u64();
            while bits != 0 {
                indices.push(position * W::BITS + bits.trailing_zeros() as usize);
                bits &= bits - 1;
            }
        }
        indices
    }

    fn highest(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, word)| word.to_u64() != 0)
            .map(|(position, word)| {
                position * W::BITS + (63 - word.to_u64().leading_zeros() as usize)
            })
    }
}

/// Bounded store over bytes
pub type BoundedFlags8 = BoundedFlags<u8>;

/// Bounded store over 16-bit words
pub type BoundedFlags16 = BoundedFlags<u16>;

/// Bounded store over 32-bit words
pub type BoundedFlags32 = BoundedFlags<u32>;

/// Bounded store over 64-bit words
pub type BoundedFlags64 = BoundedFlags<u64>;
