//! Tiered flag storage with density-driven backing selection
//!
//! [`TieredFlags`] wraps one of the three backings behind a single type.
//! The backing is picked explicitly with a [`Tier`], or derived from the
//! expected flag count and index span through a [`TierPolicy`].

use alloc::vec::Vec;

use crate::bounded::BoundedFlags;
use crate::error::Result;
use crate::sparse::SparseFlags;
use crate::traits::FlagStore;
use crate::unbounded::UnboundedFlags;

/// Backing representation of a tiered store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tier {
    /// Fixed-width word array with explicit capacity
    Bounded,
    /// Arbitrary-precision integer growing implicitly
    Unbounded,
    /// Membership set of set indices
    Sparse,
}

impl Tier {
    /// Get the lowercase name
    pub const fn name(&self) -> &'static str {
        match self {
            Tier::Bounded => "bounded",
            Tier::Unbounded => "unbounded",
            Tier::Sparse => "sparse",
        }
    }
}

impl core::fmt::Display for Tier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Tier {
    type Err = crate::FlagError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        [Tier::Bounded, Tier::Unbounded, Tier::Sparse]
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s))
            .ok_or(crate::FlagError::UnknownTier)
    }
}

/// Configuration for choosing a backing from expected usage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPolicy {
    /// Expected density below which the sparse set wins
    pub sparse_density: f64,
    /// Largest index span that still gets a fixed word array
    pub bounded_limit: usize,
}

impl TierPolicy {
    /// Set the density threshold for sparse storage
    pub fn with_sparse_density(mut self, sparse_density: f64) -> Self {
        self.sparse_density = sparse_density;
        self
    }

    /// Set the largest span stored as a fixed word array
    pub fn with_bounded_limit(mut self, bounded_limit: usize) -> Self {
        self.bounded_limit = bounded_limit;
        self
    }

    /// Choose a tier for `expected_set` flags spread over `span` indices
    ///
    /// A known span is judged by density first, then by size. With no known
    /// span an empty expectation stays sparse and anything else goes to the
    /// unbounded integer.
    pub fn select(&self, expected_set: usize, span: Option<usize>) -> Tier {
        match span {
            Some(0) => Tier::Sparse,
            Some(span) => {
                let density = expected_set as f64 / span as f64;
                if density < self.sparse_density {
                    Tier::Sparse
                } else if span <= self.bounded_limit {
                    Tier::Bounded
                } else {
                    Tier::Unbounded
                }
            }
            None if expected_set == 0 => Tier::Sparse,
            None => Tier::Unbounded,
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            // A hash entry costs on the order of 128 bits against one bit per
            // index for the dense tiers
            sparse_density: 1.0 / 128.0,
            bounded_limit: 1 << 20,
        }
    }
}

/// Flag store over any of the three backings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "tier", content = "flags", rename_all = "snake_case")
)]
pub enum TieredFlags {
    Bounded(BoundedFlags<u64>),
    Unbounded(UnboundedFlags),
    Sparse(SparseFlags),
}

impl TieredFlags {
    /// Create an empty store of the given tier
    ///
    /// `capacity` only applies to [`Tier::Bounded`].
    pub fn new(tier: Tier, capacity: usize) -> Self {
        match tier {
            Tier::Bounded => TieredFlags::Bounded(BoundedFlags::with_capacity(capacity)),
            Tier::Unbounded => TieredFlags::Unbounded(UnboundedFlags::new()),
            Tier::Sparse => TieredFlags::Sparse(SparseFlags::new()),
        }
    }

    /// Create an empty store with the tier `policy` picks
    ///
    /// A bounded store is sized to cover `span`.
    pub fn with_policy(policy: &TierPolicy, expected_set: usize, span: Option<usize>) -> Self {
        match policy.select(expected_set, span) {
            Tier::Sparse => TieredFlags::Sparse(SparseFlags::with_expected(expected_set)),
            tier => Self::new(tier, span.unwrap_or(0)),
        }
    }

    /// Create a store of the given tier with `indices` set
    ///
    /// A bounded store is sized to cover the highest index.
    pub fn from_indices<I: IntoIterator<Item = usize>>(tier: Tier, indices: I) -> Self {
        match tier {
            Tier::Unbounded => TieredFlags::Unbounded(indices.into_iter().collect()),
            Tier::Sparse => TieredFlags::Sparse(indices.into_iter().collect()),
            Tier::Bounded => {
                let mut flags = BoundedFlags::new();
                for index in indices {
                    flags.set_growing(index);
                }
                TieredFlags::Bounded(flags)
            }
        }
    }

    /// Get the backing tier
    pub fn tier(&self) -> Tier {
        match self {
            TieredFlags::Bounded(_) => Tier::Bounded,
            TieredFlags::Unbounded(_) => Tier::Unbounded,
            TieredFlags::Sparse(_) => Tier::Sparse,
        }
    }

    /// Copy every set flag into a store of another tier
    ///
    /// Conversion to a dense tier allocates one bit per index up to the
    /// highest set flag and aborts if that allocation fails; use
    /// [`try_convert`](Self::try_convert) for stores built from untrusted input.
    pub fn convert(&self, tier: Tier) -> TieredFlags {
        if tier == self.tier() {
            return self.clone();
        }
        TieredFlags::from_indices(tier, self.ones())
    }

    /// Copy every set flag into a store of another tier, failing with
    /// `AllocationFailed` when a dense target cannot be allocated
    pub fn try_convert(&self, tier: Tier) -> Result<TieredFlags> {
        if tier == self.tier() {
            return Ok(self.clone());
        }
        match tier {
            Tier::Sparse => Ok(TieredFlags::Sparse(self.ones().into_iter().collect())),
            Tier::Bounded => Ok(TieredFlags::Bounded(self.dense_copy()?)),
            Tier::Unbounded => Ok(TieredFlags::Unbounded(UnboundedFlags::from_integer(
                self.dense_copy()?.to_integer(),
            ))),
        }
    }

    /// Grow a bounded store so `index` becomes addressable
    ///
    /// The other tiers grow implicitly, so this is a no-op for them.
    pub fn grow_to_include(&mut self, index: usize) {
        if let TieredFlags::Bounded(flags) = self {
            flags.grow_to_include(index);
        }
    }

    /// Fallible [`grow_to_include`](Self::grow_to_include)
    pub fn try_grow_to_include(&mut self, index: usize) -> Result<()> {
        match self {
            TieredFlags::Bounded(flags) => flags.try_grow_to_include(index),
            _ => Ok(()),
        }
    }

    /// Borrow the word array of a bounded store
    pub fn as_bounded(&self) -> Option<&BoundedFlags<u64>> {
        match self {
            TieredFlags::Bounded(flags) => Some(flags),
            _ => None,
        }
    }

    /// Word array sized to the highest set flag, allocated up front
    fn dense_copy(&self) -> Result<BoundedFlags<u64>> {
        let capacity = self.highest().map_or(0, |highest| highest.saturating_add(1));
        let mut flags = BoundedFlags::try_with_capacity(capacity)?;
        for index in self.ones() {
            flags.set(index)?;
        }
        Ok(flags)
    }

    fn store(&self) -> &dyn FlagStore {
        match self {
            TieredFlags::Bounded(flags) => flags,
            TieredFlags::Unbounded(flags) => flags,
            TieredFlags::Sparse(flags) => flags,
        }
    }

    fn store_mut(&mut self) -> &mut dyn FlagStore {
        match self {
            TieredFlags::Bounded(flags) => flags,
            TieredFlags::Unbounded(flags) => flags,
            TieredFlags::Sparse(flags) => flags,
        }
    }
}

impl FlagStore for TieredFlags {
    fn set(&mut self, index: usize) -> Result<()> {
        self.store_mut().set(index)
    }

    fn clear(&mut self, index: usize) {
        self.store_mut().clear(index)
    }

    fn test(&self, index: usize) -> bool {
        self.store().test(index)
    }

    fn toggle(&mut self, index: usize) -> Result<bool> {
        self.store_mut().toggle(index)
    }

    fn count(&self) -> usize {
        self.store().count()
    }

    fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    fn clear_all(&mut self) {
        self.store_mut().clear_all()
    }

    fn capacity(&self) -> Option<usize> {
        self.store().capacity()
    }

    fn ones(&self) -> Vec<usize> {
        self.store().ones()
    }

    fn highest(&self) -> Option<usize> {
        self.store().highest()
    }
}

impl From<BoundedFlags<u64>> for TieredFlags {
    fn from(flags: BoundedFlags<u64>) -> Self {
        TieredFlags::Bounded(flags)
    }
}

impl From<UnboundedFlags> for TieredFlags {
    fn from(flags: UnboundedFlags) -> Self {
        TieredFlags::Unbounded(flags)
    }
}

impl From<SparseFlags> for TieredFlags {
    fn from(flags: SparseFlags) -> Self {
        TieredFlags::Sparse(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlagError;
    use alloc::vec;

    const TIERS: [Tier; 3] = [Tier::Bounded, Tier::Unbounded, Tier::Sparse];

    #[test]
    fn test_uniform_contract_across_tiers() {
        for tier in TIERS {
            let mut flags = TieredFlags::new(tier, 128);
            assert_eq!(flags.tier(), tier);
            for index in 0..200 {
                assert!(!flags.test(index), "{tier} starts empty");
            }

            flags.set(63).unwrap();
            flags.set(64).unwrap();
            flags.set(64).unwrap();
            flags.clear(63);
            flags.clear(63);
            assert!(!flags.test(63), "{tier}");
            assert!(flags.test(64), "{tier}");

            assert_eq!(flags.toggle(10), Ok(true));
            assert_eq!(flags.toggle(10), Ok(false));
            assert_eq!(flags.ones(), vec![64], "{tier}");
            assert_eq!(flags.count(), 1);

            flags.clear_all();
            assert!(flags.is_empty());
        }
    }

    #[test]
    fn test_bounded_tier_requires_growth() {
        let mut flags = TieredFlags::new(Tier::Bounded, 64);
        flags.set(5).unwrap();
        assert_eq!(
            flags.set(100),
            Err(FlagError::OutOfRange {
                index: 100,
                capacity: 64
            })
        );
        assert_eq!(flags.capacity(), Some(64));

        flags.grow_to_include(100);
        flags.set(100).unwrap();
        assert_eq!(flags.ones(), vec![5, 100]);

        let mut sparse = TieredFlags::new(Tier::Sparse, 0);
        sparse.grow_to_include(100);
        assert_eq!(sparse.capacity(), None);
    }

    #[test]
    fn test_policy_selection() {
        let policy = TierPolicy::default();
        assert_eq!(policy.select(64, Some(128)), Tier::Bounded);
        assert_eq!(policy.select(1, Some(1_000_000)), Tier::Sparse);
        assert_eq!(policy.select(500_000, Some(1 << 24)), Tier::Unbounded);
        assert_eq!(policy.select(0, None), Tier::Sparse);
        assert_eq!(policy.select(10, None), Tier::Unbounded);
        assert_eq!(policy.select(0, Some(0)), Tier::Sparse);

        let policy = policy.with_sparse_density(0.5).with_bounded_limit(16);
        assert_eq!(policy.select(4, Some(16)), Tier::Sparse);
        assert_eq!(policy.select(8, Some(16)), Tier::Bounded);
        assert_eq!(policy.select(20, Some(32)), Tier::Unbounded);
    }

    #[test]
    fn test_with_policy_sizes_bounded() {
        let flags = TieredFlags::with_policy(&TierPolicy::default(), 100, Some(1000));
        assert_eq!(flags.tier(), Tier::Bounded);
        assert_eq!(flags.capacity(), Some(1024));
    }

    #[test]
    fn test_convert_preserves_flags() {
        let original = TieredFlags::from_indices(Tier::Sparse, [3, 64, 1000]);
        for tier in TIERS {
            let converted = original.convert(tier);
            assert_eq!(converted.tier(), tier);
            assert_eq!(converted.ones(), vec![3, 64, 1000]);
            assert_eq!(converted.convert(Tier::Sparse), original);
        }

        let bounded = original.convert(Tier::Bounded);
        assert_eq!(bounded.capacity(), Some(1024));
        assert_eq!(bounded.as_bounded().map(|flags| flags.word_count()), Some(16));
    }

    #[test]
    fn test_try_convert_matches_convert() {
        let original = TieredFlags::from_indices(Tier::Sparse, [3, 64, 1000]);
        for tier in TIERS {
            assert_eq!(original.try_convert(tier), Ok(original.convert(tier)));
        }

        let empty = TieredFlags::new(Tier::Sparse, 0);
        assert_eq!(
            empty.try_convert(Tier::Bounded).map(|flags| flags.capacity()),
            Ok(Some(0))
        );
    }

    #[test]
    fn test_try_convert_huge_index_fails_cleanly() {
        let flags = TieredFlags::from_indices(Tier::Sparse, [usize::MAX - 1]);
        for tier in [Tier::Bounded, Tier::Unbounded] {
            assert!(matches!(
                flags.try_convert(tier),
                Err(FlagError::AllocationFailed { .. })
            ));
        }
        assert_eq!(flags.try_convert(Tier::Sparse), Ok(flags.clone()));
    }

    #[test]
    fn test_try_grow_to_include() {
        let mut flags = TieredFlags::new(Tier::Bounded, 64);
        assert!(flags.try_grow_to_include(usize::MAX - 1).is_err());
        assert_eq!(flags.capacity(), Some(64));

        flags.try_grow_to_include(100).unwrap();
        flags.set(100).unwrap();
        assert_eq!(flags.capacity(), Some(128));

        let mut sparse = TieredFlags::new(Tier::Sparse, 0);
        assert_eq!(sparse.try_grow_to_include(usize::MAX), Ok(()));
    }

    #[test]
    fn test_tier_names() {
        for tier in TIERS {
            assert_eq!(tier.name().parse::<Tier>(), Ok(tier));
        }
        assert_eq!("dense".parse::<Tier>(), Err(FlagError::UnknownTier));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_tagged() {
        let flags = TieredFlags::from_indices(Tier::Sparse, [2, 1]);
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, r#"{"tier":"sparse","flags":[1,2]}"#);

        let mut bounded = TieredFlags::new(Tier::Bounded, 64);
        bounded.set(1).unwrap();
        let json = serde_json::to_string(&bounded).unwrap();
        assert_eq!(json, r#"{"tier":"bounded","flags":[2]}"#);
        let decoded: TieredFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, bounded);
    }
}
