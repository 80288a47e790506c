#![no_std]

//! Flagstore Core - Tiered Bit-Flag Storage Definitions
//!
//! This crate provides the flag store trait, its three backing
//! representations, and the pure encodings used to persist them. It performs
//! no I/O and never logs.
//!
//! | backing            | capacity               | suited to                       |
//! |--------------------|------------------------|---------------------------------|
//! | [`BoundedFlags`]   | explicit, word-rounded | dense flags over a known range  |
//! | [`UnboundedFlags`] | grows implicitly       | dense flags over an open range  |
//! | [`SparseFlags`]    | grows implicitly       | few flags over a huge range     |

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bounded;
pub mod codec;
pub mod error;
pub mod permission;
pub mod sparse;
pub mod tiered;
pub mod traits;
pub mod unbounded;

pub use bounded::*;
pub use codec::{format_decimal, format_hex, format_index_list, parse_index_list, parse_integer};
pub use error::*;
pub use permission::{Permission, PermissionSet};
pub use sparse::SparseFlags;
pub use tiered::{Tier, TierPolicy, TieredFlags};
pub use traits::{FlagStore, Word};
pub use unbounded::UnboundedFlags;

pub use num_bigint::BigUint;
