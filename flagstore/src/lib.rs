//! Flagstore - Tiered Bit-Flag Storage
//!
//! This library provides boolean flags over a non-negative index space with a
//! choice of backing representation, plus the pieces needed to persist and
//! share them.
//!
//! ## Architecture
//!
//! Flagstore follows the same split as its core crate:
//!
//! - **flagstore-core**: flag store trait, backings, encodings (`no_std`, no I/O)
//! - **flagstore**: JSON persistence records, a lock-guarded handle, the `flagctl` tool
//!
//! ## Quick Start
//!
//! ```rust
//! use flagstore::{FlagStore, Tier, TierPolicy, TieredFlags};
//!
//! fn example() -> flagstore::Result<()> {
//!     // Bounded stores never grow on their own
//!     let mut flags = TieredFlags::new(Tier::Bounded, 128);
//!     flags.set(70)?;
//!     assert!(flags.test(70));
//!     assert!(flags.set(200).is_err());
//!
//!     // Let the policy pick a backing from expected usage
//!     let sparse = TieredFlags::with_policy(&TierPolicy::default(), 10, Some(1 << 30));
//!     assert_eq!(sparse.tier(), Tier::Sparse);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Three backings**: word array, arbitrary-precision integer, sparse set
//! - **Tier policy**: density-driven backing selection and conversion
//! - **Records**: integer / index-list persistence as JSON (`serde` feature)
//! - **Permissions**: named flags packed into one word

// Re-export core abstractions
pub use flagstore_core::{
    // Core traits
    FlagStore, Word,
    // Backings
    BoundedFlags, BoundedFlags16, BoundedFlags32, BoundedFlags64, BoundedFlags8, SparseFlags,
    Tier, TierPolicy, TieredFlags, UnboundedFlags,
    // Named permissions
    permission, Permission, PermissionSet,
    // Encodings
    codec, format_decimal, format_hex, format_index_list, parse_index_list, parse_integer,
    BigUint,
    // Error handling
    FlagError, Result,
};

#[cfg(feature = "serde")]
pub mod record;
pub mod shared;

#[cfg(feature = "serde")]
pub use record::{FlagRecord, RecordError, RecordResult, MAX_RECORD_CAPACITY};
pub use shared::SharedFlags;
