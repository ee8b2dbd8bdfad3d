//! Stable element identities.
//!
//! The tree is rebuilt every frame, so interaction state is keyed by an
//! [`ElementId`] rather than by node. Ids come from an explicit caller string or
//! from hashing rendered content (label text, texture handle). Hashing is keyed
//! SipHash-1-3 with fixed keys, so the same input yields the same id across
//! frames and across runs.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Fixed SipHash keys. Changing them changes every derived id.
const ID_KEY_0: u64 = 0x7461_6e64_656d_5f75;
const ID_KEY_1: u64 = 0x695f_6964_656e_7469;

/// Domain separators so a label reading "ok" and a group named "ok" differ.
const DOMAIN_EXPLICIT: u8 = 0x01;
const DOMAIN_CONTENT: u8 = 0x02;
const DOMAIN_TEXTURE: u8 = 0x03;

/// Unique identifier for an element across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Identity of every group started without an explicit id.
    pub const DEFAULT_GROUP: Self = Self(0);

    /// Creates an id from a caller-supplied name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(hash_with_domain(DOMAIN_EXPLICIT, name.as_bytes()))
    }

    /// Derives an id from rendered text content.
    #[must_use]
    pub fn from_content(text: &str) -> Self {
        Self(hash_with_domain(DOMAIN_CONTENT, text.as_bytes()))
    }

    /// Derives an id from a texture handle.
    #[must_use]
    pub fn from_texture(texture_id: u32) -> Self {
        Self(hash_with_domain(DOMAIN_TEXTURE, &texture_id.to_le_bytes()))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns true for the shared default-group sentinel.
    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == Self::DEFAULT_GROUP.0
    }
}

impl From<&str> for ElementId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

fn hash_with_domain(domain: u8, bytes: &[u8]) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(ID_KEY_0, ID_KEY_1);
    hasher.write_u8(domain);
    hasher.write(bytes);
    match hasher.finish() {
        // Never collide with the default-group sentinel.
        0 => 1,
        h => h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_deterministic() {
        assert_eq!(ElementId::new("play"), ElementId::new("play"));
        assert_eq!(ElementId::from_content("Play"), ElementId::from_content("Play"));
        assert_ne!(ElementId::new("play"), ElementId::new("quit"));
    }

    #[test]
    fn test_domains_are_separated() {
        assert_ne!(ElementId::new("ok"), ElementId::from_content("ok"));
        assert!(!ElementId::new("").is_default());
        assert!(ElementId::DEFAULT_GROUP.is_default());
    }
}
