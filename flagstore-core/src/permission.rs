//! Named permission flags packed into one word
//!
//! A closed set of permissions, each mapped to a fixed bit position. The
//! packed word is what gets stored in an external record field.

use core::fmt;
use core::ops::{BitAnd, BitOr};
use core::str::FromStr;

use alloc::vec;

use crate::bounded::BoundedFlags;
use crate::error::{FlagError, Result};
use crate::traits::{FlagStore, Word};

/// Bit masks for each named permission
pub mod bits {
    /// May read the resource
    pub const READ: u32 = 1 << 0;
    /// May modify the resource
    pub const WRITE: u32 = 1 << 1;
    /// May delete the resource
    pub const DELETE: u32 = 1 << 2;
    /// May administer the resource
    pub const ADMIN: u32 = 1 << 3;
    /// Every named permission
    pub const ALL: u32 = READ | WRITE | DELETE | ADMIN;
}

/// A named permission, valued by its bit position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Permission {
    Read = 0,
    Write = 1,
    Delete = 2,
    Admin = 3,
}

impl Permission {
    /// Every permission in bit order
    pub const ALL: [Permission; 4] = [
        Permission::Read,
        Permission::Write,
        Permission::Delete,
        Permission::Admin,
    ];

    /// Get the bit position
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Get the single-bit mask
    pub const fn mask(self) -> u32 {
        1 << self as u32
    }

    /// Get the lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
            Permission::Admin => "admin",
        }
    }

    /// Look up the permission at a bit position
    pub const fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            0 => Some(Permission::Read),
            1 => Some(Permission::Write),
            2 => Some(Permission::Delete),
            3 => Some(Permission::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Permission {
    type Err = FlagError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Permission::ALL
            .into_iter()
            .find(|permission| permission.name().eq_ignore_ascii_case(s))
            .ok_or(FlagError::UnknownPermission)
    }
}

/// Set of named permissions packed into one `u32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct PermissionSet {
    bits: u32,
}

impl PermissionSet {
    /// Create a set with no permissions
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Create a set with every permission
    pub const fn all() -> Self {
        Self { bits: bits::ALL }
    }

    /// Create a set from a packed word, rejecting unnamed bits
    pub const fn from_bits(bits: u32) -> Result<Self> {
        if bits & !bits::ALL != 0 {
            return Err(FlagError::UnknownBits(bits & !bits::ALL));
        }
        Ok(Self { bits })
    }

    /// Create a set from a packed word, dropping unnamed bits
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self {
            bits: bits & bits::ALL,
        }
    }

    /// Get the packed word
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Return a copy with `permission` added
    pub const fn with(self, permission: Permission) -> Self {
        Self {
            bits: self.bits | permission.mask(),
        }
    }

    /// Check a single permission
    pub const fn has(&self, permission: Permission) -> bool {
        self.bits & permission.mask() != 0
    }

    /// Check that every permission in `other` is present
    pub const fn contains_all(&self, other: PermissionSet) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Check whether no permission is present
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Get the number of permissions present
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Add a permission
    pub fn grant(&mut self, permission: Permission) {
        self.bits |= permission.mask();
    }

    /// Remove a permission
    pub fn revoke(&mut self, permission: Permission) {
        self.bits &= !permission.mask();
    }

    /// Flip a permission and return whether it is now present
    pub fn toggle(&mut self, permission: Permission) -> bool {
        self.bits ^= permission.mask();
        self.has(permission)
    }

    /// Permissions present in either set
    pub const fn union(self, other: PermissionSet) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Permissions present in both sets
    pub const fn intersection(self, other: PermissionSet) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Permissions in `self` but not in `other`
    pub const fn difference(self, other: PermissionSet) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    /// Iterate over present permissions in bit order
    pub fn iter(&self) -> impl Iterator<Item = Permission> {
        let set = *self;
        Permission::ALL
            .into_iter()
            .filter(move |permission| set.has(*permission))
    }

    /// Read a permission set out of a bounded flag store
    ///
    /// Any set flag beyond the last named permission is out of range.
    pub fn from_flags<W: Word>(flags: &BoundedFlags<W>) -> Result<Self> {
        let mut set = Self::empty();
        for index in flags.ones() {
            let permission = u8::try_from(index)
                .ok()
                .and_then(Permission::from_bit)
                .ok_or(FlagError::OutOfRange {
                    index,
                    capacity: Permission::ALL.len(),
                })?;
            set.grant(permission);
        }
        Ok(set)
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        Self::empty().with(permission)
    }
}

impl From<PermissionSet> for u32 {
    fn from(set: PermissionSet) -> Self {
        set.bits
    }
}

impl TryFrom<u32> for PermissionSet {
    type Error = FlagError;

    fn try_from(bits: u32) -> Result<Self> {
        Self::from_bits(bits)
    }
}

impl From<PermissionSet> for BoundedFlags<u32> {
    fn from(set: PermissionSet) -> Self {
        BoundedFlags::from_words(vec![set.bits])
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl BitOr for Permission {
    type Output = PermissionSet;

    fn bitor(self, rhs: Permission) -> PermissionSet {
        PermissionSet::from(self).with(rhs)
    }
}

impl BitOr<Permission> for PermissionSet {
    type Output = PermissionSet;

    fn bitor(self, rhs: Permission) -> PermissionSet {
        self.with(rhs)
    }
}

impl BitOr for PermissionSet {
    type Output = PermissionSet;

    fn bitor(self, rhs: PermissionSet) -> PermissionSet {
        self.union(rhs)
    }
}

impl BitAnd for PermissionSet {
    type Output = PermissionSet;

    fn bitand(self, rhs: PermissionSet) -> PermissionSet {
        self.intersection(rhs)
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (position, permission) in self.iter().enumerate() {
            if position > 0 {
                f.write_str("|")?;
            }
            f.write_str(permission.name())?;
        }
        Ok(())
    }
}

impl FromStr for PermissionSet {
    type Err = FlagError;

    /// Parse `read|write` style text; `none` or empty text is the empty set
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(Self::empty());
        }
        s.split('|').map(Permission::from_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn test_masks_match_bit_positions() {
        assert_eq!(Permission::Read.mask(), bits::READ);
        assert_eq!(Permission::Write.mask(), bits::WRITE);
        assert_eq!(Permission::Delete.mask(), bits::DELETE);
        assert_eq!(Permission::Admin.mask(), bits::ADMIN);
        assert_eq!(PermissionSet::all().bits(), bits::ALL);
        for permission in Permission::ALL {
            assert_eq!(Permission::from_bit(permission.bit()), Some(permission));
        }
        assert_eq!(Permission::from_bit(4), None);
    }

    #[test]
    fn test_grant_revoke_toggle() {
        let mut set = Permission::Read | Permission::Write;
        assert!(set.has(Permission::Read));
        assert!(!set.has(Permission::Admin));

        set.grant(Permission::Read);
        assert_eq!(set.len(), 2);

        set.revoke(Permission::Write);
        set.revoke(Permission::Write);
        assert_eq!(set.bits(), bits::READ);

        assert!(set.toggle(Permission::Delete));
        assert!(!set.toggle(Permission::Delete));
        assert_eq!(set.bits(), bits::READ);
    }

    #[test]
    fn test_set_algebra() {
        let editor = Permission::Read | Permission::Write;
        let admin = PermissionSet::all();

        assert!(admin.contains_all(editor));
        assert!(!editor.contains_all(admin));
        assert_eq!(admin & editor, editor);
        assert_eq!(
            admin.difference(editor),
            Permission::Delete | Permission::Admin
        );
        assert_eq!(editor | Permission::Admin, editor.with(Permission::Admin));
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(
            PermissionSet::from_bits(0b1_0001),
            Err(FlagError::UnknownBits(0b1_0000))
        );
        assert_eq!(
            PermissionSet::from_bits_truncate(0b1_0001),
            PermissionSet::from(Permission::Read)
        );
        assert_eq!(PermissionSet::try_from(0b1010).unwrap().len(), 2);
    }

    #[test]
    fn test_text_round_trip() {
        let set = Permission::Delete | Permission::Read;
        assert_eq!(set.to_string(), "read|delete");
        assert_eq!("read|delete".parse::<PermissionSet>(), Ok(set));
        assert_eq!(" Read | DELETE ".parse::<PermissionSet>(), Ok(set));
        assert_eq!(PermissionSet::empty().to_string(), "none");
        assert_eq!("none".parse::<PermissionSet>(), Ok(PermissionSet::empty()));
        assert_eq!(
            "read|execute".parse::<PermissionSet>(),
            Err(FlagError::UnknownPermission)
        );
    }

    #[test]
    fn test_bounded_flags_bridge() {
        let set = Permission::Write | Permission::Admin;
        let flags = BoundedFlags::<u32>::from(set);
        assert_eq!(flags.ones(), vec![1, 3]);
        assert_eq!(PermissionSet::from_flags(&flags), Ok(set));

        let mut wide = BoundedFlags::<u64>::with_capacity(64);
        wide.set(0).unwrap();
        wide.set(9).unwrap();
        assert_eq!(
            PermissionSet::from_flags(&wide),
            Err(FlagError::OutOfRange {
                index: 9,
                capacity: 4
            })
        );
    }

    #[test]
    fn test_iter_in_bit_order() {
        let set: PermissionSet = [Permission::Admin, Permission::Read].into_iter().collect();
        let names: Vec<&str> = set.iter().map(Permission::name).collect();
        assert_eq!(names, ["read", "admin"]);
    }
}
