//! Dense unbounded flag storage over one arbitrary-precision integer

use alloc::vec::Vec;

use num_bigint::BigUint;

use crate::error::Result;
use crate::traits::FlagStore;

/// Dense flag store that grows implicitly as higher flags are set
///
/// Flag `i` is bit `i` of a single [`BigUint`]. Clearing the highest set
/// flag lets the integer shrink again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnboundedFlags {
    value: BigUint,
}

impl UnboundedFlags {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given flags set
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        indices.into_iter().collect()
    }

    /// Get the backing integer
    pub fn as_integer(&self) -> &BigUint {
        &self.value
    }

    /// Encode as an unsigned integer where bit `b` is flag `b`
    pub fn to_integer(&self) -> BigUint {
        self.value.clone()
    }

    /// Decode an unsigned integer where bit `b` is flag `b`
    pub fn from_integer(value: BigUint) -> Self {
        Self { value }
    }

    /// Get the number of significant bits (highest set flag + 1)
    pub fn bit_len(&self) -> u64 {
        self.value.bits()
    }
}

impl FlagStore for UnboundedFlags {
    fn set(&mut self, index: usize) -> Result<()> {
        self.value.set_bit(index as u64, true);
        Ok(())
    }

    fn clear(&mut self, index: usize) {
        self.value.set_bit(index as u64, false);
    }

    fn test(&self, index: usize) -> bool {
        self.value.bit(index as u64)
    }

    fn toggle(&mut self, index: usize) -> Result<bool> {
        let state = !self.value.bit(index as u64);
        self.value.set_bit(index as u64, state);
        Ok(state)
    }

    fn count(&self) -> usize {
        self.value.count_ones() as usize
    }

    fn is_empty(&self) -> bool {
        self.value.bits() == 0
    }

    fn clear_all(&mut self) {
        self.value = BigUint::default();
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn ones(&self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.count());
        for (position, digit) in self.value.iter_u64_digits().enumerate() {
            let mut bits = digit;
            while bits != 0 {
                indices.push(position * 64 + bits.trailing_zeros() as usize);
                bits &= bits - 1;
            }
        }
        indices
    }

    fn highest(&self) -> Option<usize> {
        self.value.bits().checked_sub(1).map(|bit| bit as usize)
    }
}

impl FromIterator<usize> for UnboundedFlags {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut flags = Self::new();
        flags.extend(iter);
        flags
    }
}

impl Extend<usize> for UnboundedFlags {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.value.set_bit(index as u64, true);
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UnboundedFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ones())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UnboundedFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let indices = Vec::<usize>::deserialize(deserializer)?;
        Ok(Self::from_indices(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_set_without_capacity() {
        let mut flags = UnboundedFlags::new();
        assert!(!flags.test(1000));

        flags.set(1000).unwrap();
        assert!(flags.test(1000));
        assert_eq!(flags.bit_len(), 1001);

        flags.clear(1000);
        assert!(!flags.test(1000));
        assert!(flags.is_empty());
        assert_eq!(flags.bit_len(), 0);
    }

    #[test]
    fn test_idempotent_and_isolated() {
        let mut flags = UnboundedFlags::new();
        flags.set(63).unwrap();
        flags.set(64).unwrap();
        flags.set(64).unwrap();
        assert_eq!(flags.count(), 2);

        flags.clear(63);
        flags.clear(63);
        assert!(!flags.test(63));
        assert!(flags.test(64));
        flags.clear(5_000);
        assert_eq!(flags.count(), 1);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut flags = UnboundedFlags::from_indices([3, 9]);
        assert_eq!(flags.toggle(200), Ok(true));
        assert_eq!(flags.toggle(200), Ok(false));
        assert_eq!(flags.toggle(3), Ok(false));
        assert_eq!(flags.toggle(3), Ok(true));
        assert_eq!(flags.ones(), vec![3, 9]);
    }

    #[test]
    fn test_ones_and_highest() {
        let flags = UnboundedFlags::from_indices([130, 0, 64, 130, 7]);
        assert_eq!(flags.ones(), vec![0, 7, 64, 130]);
        assert_eq!(flags.highest(), Some(130));
        assert_eq!(UnboundedFlags::new().highest(), None);
    }

    #[test]
    fn test_integer_round_trip() {
        let flags = UnboundedFlags::from_indices([1, 65, 300]);
        let decoded = UnboundedFlags::from_integer(flags.to_integer());
        assert_eq!(decoded, flags);
        assert_eq!(decoded.ones(), vec![1, 65, 300]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_index_list() {
        let flags = UnboundedFlags::from_indices([70, 2]);
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "[2,70]");
        let decoded: UnboundedFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, flags);
    }
}
