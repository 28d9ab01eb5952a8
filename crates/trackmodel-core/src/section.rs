//! # Section and Destination
//!
//! A section is a graph edge: a stretch of track between two node
//! connectors. It records which nodes it joins (`start`, `end`) and in
//! which direction routed travel may use it. A section may additionally be
//! a destination, a named stopping point with a model-wide unique address.

use crate::metadata::HasMetadata;
use crate::primitives::ID_INVALID;
use crate::types::{Identifier, Metadata, SlotId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Routed travel permitted on a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Directionality {
    /// Routed travel is forbidden. Trains may still occupy the section.
    None,
    /// Travel from start to end only.
    #[default]
    Unidir,
    /// Travel in either direction.
    Bidir,
}

impl Directionality {
    /// Name as written in documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Unidir => "UNIDIR",
            Self::Bidir => "BIDIR",
        }
    }
}

impl fmt::Display for Directionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// DESTINATION
// =============================================================================

/// A named, addressed stopping point.
///
/// Address and name are fixed at construction. The address must be unique
/// across a `Model`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    address: String,
    name: String,
    metadata: Metadata,
}

impl Destination {
    /// Create a destination with empty metadata.
    #[must_use]
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            metadata: Metadata::new(),
        }
    }

    /// Address, unique within a model.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl HasMetadata for Destination {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// A track segment between two node connectors.
///
/// `start` and `end` are either both null or both set; `Model` is the only
/// writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: Identifier,
    start: Identifier,
    end: Identifier,
    directionality: Directionality,
    length: Option<u64>,
    destination: Option<Destination>,
    metadata: Metadata,
}

impl Section {
    /// Create an unconnected section.
    #[must_use]
    pub fn new(id: impl Into<Identifier>, directionality: Directionality) -> Self {
        Self {
            id: id.into(),
            start: Identifier::null(),
            end: Identifier::null(),
            directionality,
            length: None,
            destination: None,
            metadata: Metadata::new(),
        }
    }

    /// Attach a destination.
    #[must_use]
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Attach an opaque length.
    #[must_use]
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Identifier of this section.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Node at the start of the section, or `ID_NULL`.
    #[must_use]
    pub fn start(&self) -> &str {
        self.start.as_str()
    }

    /// Node at the end of the section, or `ID_NULL`.
    #[must_use]
    pub fn end(&self) -> &str {
        self.end.as_str()
    }

    /// Travel restriction on this section.
    #[must_use]
    pub fn directionality(&self) -> Directionality {
        self.directionality
    }

    /// Whether trains may travel both ways.
    #[must_use]
    pub fn is_bidir(&self) -> bool {
        self.directionality == Directionality::Bidir
    }

    /// Whether trains may travel from start to end only.
    #[must_use]
    pub fn is_unidir(&self) -> bool {
        self.directionality == Directionality::Unidir
    }

    /// Whether any routed travel is permitted.
    #[must_use]
    pub fn allows_travel(&self) -> bool {
        self.directionality != Directionality::None
    }

    /// Whether the section is linked to two nodes.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.start.is_null()
    }

    /// `start()` for index 0, `end()` for index 1, `ID_INVALID` otherwise.
    #[must_use]
    pub fn node_at(&self, index: SlotId) -> &str {
        match index {
            0 => self.start(),
            1 => self.end(),
            _ => ID_INVALID,
        }
    }

    /// Whether travel from endpoint `from` to endpoint `to` is permitted.
    ///
    /// Endpoint 0 is `start`, endpoint 1 is `end`.
    #[must_use]
    pub fn can_traverse(&self, from: SlotId, to: SlotId) -> bool {
        match self.directionality {
            Directionality::None => false,
            Directionality::Unidir => from == 0 && to == 1,
            Directionality::Bidir => (from == 0 && to == 1) || (from == 1 && to == 0),
        }
    }

    /// Opaque length, if one was given.
    #[must_use]
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// The destination attached to this section, if any.
    #[must_use]
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Whether a destination is attached.
    #[must_use]
    pub fn is_destination(&self) -> bool {
        self.destination.is_some()
    }

    pub(crate) fn has_any_endpoint(&self) -> bool {
        !self.start.is_null() || !self.end.is_null()
    }

    pub(crate) fn set_endpoints(&mut self, start: Identifier, end: Identifier) {
        self.start = start;
        self.end = end;
    }

    pub(crate) fn clear_endpoints(&mut self) {
        self.start.clear();
        self.end.clear();
    }
}

impl HasMetadata for Section {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl fmt::Display for Section {
    /// `[Section ID start/end]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Section {} {}/{}]", self.id, self.start, self.end)
    }
}
