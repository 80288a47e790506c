//! JSON persistence records for flag stores
//!
//! A record is the shape a flag store takes inside one external field. Bounded
//! stores are written as a single integer (hex text, bit `b` is flag `b`) next
//! to their capacity; unbounded and sparse stores as an ascending index list.
//!
//! ```json
//! {"tier":"bounded","capacity":128,"value":"0x400000000000000000"}
//! {"tier":"sparse","indices":[3,1000000]}
//! ```

use flagstore_core::{codec, BoundedFlags, FlagError, FlagStore, Tier, TieredFlags};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading or writing a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid record contents: {0}")]
    Flag(#[from] FlagError),
}

/// Result type for record operations
pub type RecordResult<T> = std::result::Result<T, RecordError>;

/// Largest bounded capacity, and one past the largest unbounded index, a
/// record may describe
///
/// Both dense tiers allocate one bit per flag up to this bound (512 MiB).
/// Sparse records carry no limit since their size follows the index count.
pub const MAX_RECORD_CAPACITY: usize = u32::MAX as usize;

/// Persisted form of a [`TieredFlags`] store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum FlagRecord {
    /// Word-array store; `value` is decimal or `0x` hex text
    Bounded { capacity: usize, value: String },
    /// Arbitrary-precision store as set indices
    Unbounded { indices: Vec<usize> },
    /// Sparse store as set indices
    Sparse { indices: Vec<usize> },
}

impl FlagRecord {
    /// Capture the current state of a store
    pub fn from_flags(flags: &TieredFlags) -> Self {
        match flags {
            TieredFlags::Bounded(flags) => FlagRecord::Bounded {
                capacity: flags.bit_capacity(),
                value: codec::format_hex(&flags.to_integer()),
            },
            TieredFlags::Unbounded(flags) => FlagRecord::Unbounded {
                indices: flags.ones(),
            },
            TieredFlags::Sparse(flags) => FlagRecord::Sparse {
                indices: flags.ones(),
            },
        }
    }

    /// Rebuild the store this record describes
    ///
    /// Dense records above [`MAX_RECORD_CAPACITY`] are rejected before any
    /// storage is allocated.
    pub fn into_flags(self) -> RecordResult<TieredFlags> {
        let flags = match self {
            FlagRecord::Bounded { capacity, value } => {
                if capacity > MAX_RECORD_CAPACITY {
                    return Err(FlagError::CapacityExceeded {
                        requested: capacity,
                        limit: MAX_RECORD_CAPACITY,
                    }
                    .into());
                }
                let integer = codec::parse_integer(&value)?;
                TieredFlags::Bounded(BoundedFlags::from_integer(&integer, capacity)?)
            }
            FlagRecord::Unbounded { indices } => {
                if let Some(&index) = indices.iter().find(|&&index| index >= MAX_RECORD_CAPACITY) {
                    return Err(FlagError::OutOfRange {
                        index,
                        capacity: MAX_RECORD_CAPACITY,
                    }
                    .into());
                }
                TieredFlags::from_indices(Tier::Unbounded, indices)
            }
            FlagRecord::Sparse { indices } => TieredFlags::from_indices(Tier::Sparse, indices),
        };

        tracing::debug!(
            tier = %flags.tier(),
            count = flags.count(),
            "decoded flag record"
        );
        Ok(flags)
    }

    /// Get the tier this record describes
    pub fn tier(&self) -> Tier {
        match self {
            FlagRecord::Bounded { .. } => Tier::Bounded,
            FlagRecord::Unbounded { .. } => Tier::Unbounded,
            FlagRecord::Sparse { .. } => Tier::Sparse,
        }
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> RecordResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> RecordResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record from JSON
    pub fn from_json(text: &str) -> RecordResult<Self> {
        let record: FlagRecord = serde_json::from_str(text)?;
        tracing::trace!(tier = %record.tier(), "parsed flag record");
        Ok(record)
    }
}

impl From<&TieredFlags> for FlagRecord {
    fn from(flags: &TieredFlags) -> Self {
        FlagRecord::from_flags(flags)
    }
}

impl TryFrom<FlagRecord> for TieredFlags {
    type Error = RecordError;

    fn try_from(record: FlagRecord) -> RecordResult<Self> {
        record.into_flags()
    }
}
