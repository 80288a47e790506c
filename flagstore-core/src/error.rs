//! Error types for flag store operations

/// Errors that can occur during flag store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagError {
    /// Flag index at or beyond the capacity of a bounded store
    OutOfRange { index: usize, capacity: usize },
    /// Integer text is neither decimal nor `0x`-prefixed hex
    InvalidNumber,
    /// Index list contains a token that is not a flag index
    InvalidIndexList,
    /// Permission word carries bits with no named permission
    UnknownBits(u32),
    /// Permission name not recognised
    UnknownPermission,
    /// Tier name not recognised
    UnknownTier,
    /// Word array for the requested capacity could not be allocated
    AllocationFailed { capacity: usize },
    /// Requested capacity is above the accepted limit
    CapacityExceeded { requested: usize, limit: usize },
}

impl core::fmt::Display for FlagError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlagError::OutOfRange { index, capacity } => {
                write!(f, "Flag index {index} out of range for capacity {capacity}")
            }
            FlagError::InvalidNumber => write!(f, "Invalid integer representation"),
            FlagError::InvalidIndexList => write!(f, "Invalid flag index list"),
            FlagError::UnknownBits(bits) => write!(f, "Unknown permission bits {bits:#x}"),
            FlagError::UnknownPermission => write!(f, "Unknown permission name"),
            FlagError::UnknownTier => write!(f, "Unknown storage tier"),
            FlagError::AllocationFailed { capacity } => {
                write!(f, "Failed to allocate storage for {capacity} flags")
            }
            FlagError::CapacityExceeded { requested, limit } => {
                write!(f, "Capacity {requested} exceeds limit {limit}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FlagError {}

/// Result type for flag store operations
pub type Result<T> = core::result::Result<T, FlagError>;
