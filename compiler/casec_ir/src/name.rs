//! Interned identifier.
//!
//! Provides compact 32-bit identifiers for pattern variables, symbols and
//! the synthetic subject variables created during compilation.

use std::fmt;

/// Interned string identifier.
///
/// The value is an index into the owning [`StringInterner`]. Two names are
/// equal exactly when they were interned from the same string.
///
/// [`StringInterner`]: crate::StringInterner
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Pre-interned `nil` symbol (false, the empty list).
    pub const NIL: Name = Name(1);

    /// Pre-interned `t` symbol (canonical true).
    pub const T: Name = Name(2);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Index into the interner's string table.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
