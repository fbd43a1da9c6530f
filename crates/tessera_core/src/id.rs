//! # Identifiers
//!
//! Two kinds of identity live in the engine:
//! - [`StringId`]: the stable, name-derived id an element is registered under
//! - [`PanelId`]: a generational arena index for a panel in a scene

use std::fmt;

/// Name-derived element identifier (CRC-32 of the UTF-8 name).
///
/// Two elements registered under the same name collide by construction,
/// which is exactly what the registry's duplicate check relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct StringId(u32);

impl StringId {
    /// Hashes a name into an id.
    #[inline]
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(crc32fast::hash(name.as_bytes()))
    }

    /// Wraps an already computed hash.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw hash value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<&str> for StringId {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for StringId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

/// Generational index of a panel inside a scene arena.
///
/// - Lower 32 bits: slot index
/// - Upper 32 bits: generation of the slot when the panel was created
///
/// A slot's generation is bumped every time it is reclaimed, so an id that
/// outlived its panel never resolves to whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PanelId(u64);

impl PanelId {
    /// Null/invalid panel id.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates a panel id from slot index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this id is the null id.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_id_is_stable() {
        assert_eq!(StringId::from_name("OK"), StringId::from("OK"));
        assert_ne!(StringId::from_name("OK"), StringId::from_name("Cancel"));
    }

    #[test]
    fn test_panel_id_packing() {
        let id = PanelId::new(7, 3);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert!(!id.is_null());
        assert!(PanelId::default().is_null());
        assert_ne!(PanelId::new(7, 3), PanelId::new(7, 4));
    }
}
