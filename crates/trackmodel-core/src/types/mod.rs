//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the trackmodel CORE:
//! - Identifiers (`Identifier`, `SlotId`) and their validity rules
//! - Metadata storage type
//! - Error types (`TrackError` and the per-operation mutation outcomes)
//!
//! ## Determinism Guarantees
//!
//! Identifiers implement `Ord` consistently with `str`, so every
//! identifier-keyed `BTreeMap` iterates in plain lexical order and can be
//! queried with a `&str`.

use crate::primitives::RESERVED_PREFIX;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Index of a connector on a node.
pub type SlotId = u8;

/// Free-form string key/value pairs attached to an entity.
pub type Metadata = BTreeMap<String, String>;

/// Returns `true` if `id` is a valid identifier.
///
/// Valid identifiers are non-empty and do not start with `#`.
#[must_use]
pub fn is_id(id: &str) -> bool {
    id.chars().next().is_some_and(|c| c != RESERVED_PREFIX)
}

/// Returns `true` if `id` is a valid identifier or the null reference.
#[must_use]
pub fn is_id_or_null(id: &str) -> bool {
    id.is_empty() || is_id(id)
}

/// A short string naming a node or a section.
///
/// The empty identifier is the null reference. Identifiers starting with
/// `#` are reserved sentinels and are never admitted into a `Model`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from any string. No validation happens here.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The null reference.
    #[must_use]
    pub const fn null() -> Self {
        Self(String::new())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is a valid, non-reserved identifier.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_id(&self.0)
    }

    /// Check whether this is the null reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Identifier {
    /// Null identifiers render as `#null`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("#null")
        } else {
            f.write_str(&self.0)
        }
    }
}

// =============================================================================
// MUTATION OUTCOMES
// =============================================================================

/// Reasons `Model::add_node` and `Model::add_section` refuse an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddError {
    /// The identifier is empty or reserved.
    #[error("invalid identifier")]
    BadId,

    /// The identifier, or the destination address, is already taken.
    #[error("duplicate identifier or destination address")]
    Duplicate,

    /// The entity already references other entities.
    #[error("entity already holds references")]
    HasRef,
}

/// Reasons `Model::remove_node` and `Model::remove_section` refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemoveError {
    /// No entity with that identifier exists.
    #[error("entity not found")]
    NotFound,

    /// The entity is still linked and must be unlinked first.
    #[error("entity is still referenced")]
    Referenced,
}

/// Reasons `Model::link` refuses. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The section or a node is missing, or a slot is out of range.
    #[error("section, node or slot not found")]
    NotFound,

    /// Start and end name the same node.
    #[error("cannot link a section to the same node twice")]
    SameNode,

    /// One of the targeted connectors is already in use.
    #[error("node connector already occupied")]
    NodeOccupied,

    /// The section is already linked.
    #[error("section already linked")]
    SectionOccupied,
}

/// Reasons `Model::unlink` refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnlinkError {
    /// No section with that identifier exists.
    #[error("section not found")]
    NotFound,

    /// The section is not currently linked.
    #[error("section is not linked")]
    NotLinked,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised at the format and I/O boundary.
///
/// - Mutations report through their own closed enums above
/// - Correctness checks report booleans, never errors
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum TrackError {
    /// The input could not be understood as a model document.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The input was well-formed but describes an illegal model.
    #[error("Illegal model: {0}")]
    IllegalModel(String),

    /// A serialization error occurred while encoding a model.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_validity() {
        assert!(is_id("n1"));
        assert!(is_id("a#b"));
        assert!(!is_id(""));
        assert!(!is_id("#invalid"));
        assert!(!is_id("#"));
    }

    #[test]
    fn id_or_null_accepts_null() {
        assert!(is_id_or_null(""));
        assert!(is_id_or_null("s1"));
        assert!(!is_id_or_null("#invalid"));
    }

    #[test]
    fn identifier_orders_like_str() {
        let mut ids = vec![Identifier::new("b"), Identifier::new("a10"), Identifier::new("a2")];
        ids.sort();
        let ordered: Vec<&str> = ids.iter().map(Identifier::as_str).collect();
        assert_eq!(ordered, vec!["a10", "a2", "b"]);
    }

    #[test]
    fn null_identifier_display() {
        assert_eq!(Identifier::null().to_string(), "#null");
        assert_eq!(Identifier::new("s1").to_string(), "s1");
    }

    #[test]
    fn identifier_clear_makes_null() {
        let mut id = Identifier::new("s1");
        assert!(id.is_valid());
        id.clear();
        assert!(id.is_null());
        assert!(!id.is_valid());
    }
}
