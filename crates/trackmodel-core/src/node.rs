//! # Node
//!
//! A graph vertex: a switch, crossing, or track boundary.
//!
//! A node holds one section reference per connector. Those references are
//! written only by `Model`, which keeps them symmetric with the endpoints
//! recorded on each `Section`.

use crate::metadata::HasMetadata;
use crate::node_type::NodeType;
use crate::primitives::{ID_INVALID, MAX_SLOTS, SLOT_INVALID};
use crate::types::{Identifier, Metadata, SlotId};
use std::fmt;

/// A node at the joint or intersection of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    node_type: NodeType,
    id: Identifier,
    slots: [Identifier; MAX_SLOTS],
    metadata: Metadata,
}

impl Node {
    /// Create an unconnected node.
    #[must_use]
    pub fn new(node_type: NodeType, id: impl Into<Identifier>) -> Self {
        Self {
            node_type,
            id: id.into(),
            slots: Default::default(),
            metadata: Metadata::new(),
        }
    }

    /// The node's type descriptor.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Identifier of this node.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Number of connectors, fixed by the node type.
    #[must_use]
    pub fn connector_count(&self) -> SlotId {
        self.node_type.slot_count()
    }

    /// Section in `slot`, `ID_NULL` if unconnected, `ID_INVALID` if no such slot.
    #[must_use]
    pub fn connector_at(&self, slot: SlotId) -> &str {
        if slot >= self.connector_count() {
            return ID_INVALID;
        }
        self.slots
            .get(usize::from(slot))
            .map_or(ID_INVALID, Identifier::as_str)
    }

    /// Slot occupied by `section_id`, or `SLOT_INVALID`.
    ///
    /// Result is unspecified when `section_id` is `ID_NULL`.
    #[must_use]
    pub fn slot_of(&self, section_id: &str) -> SlotId {
        self.connectors()
            .position(|id| id == section_id)
            .map_or(SLOT_INVALID, |slot| slot as SlotId)
    }

    /// Whether travel from `from` to `to` would be possible with suitable sections.
    ///
    /// Depends only on the node type, never on what is connected.
    #[must_use]
    pub fn could_traverse(&self, from: SlotId, to: SlotId) -> bool {
        self.node_type.could_traverse(from, to)
    }

    /// Whether every connector holds a section reference.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.connectors().all(|id| !id.is_empty())
    }

    /// Iterate over the meaningful connector entries in slot order.
    pub fn connectors(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .take(usize::from(self.connector_count()))
            .map(Identifier::as_str)
    }

    pub(crate) fn has_any_connection(&self) -> bool {
        self.connectors().any(|id| !id.is_empty())
    }

    pub(crate) fn set_connector(&mut self, slot: SlotId, section_id: Identifier) {
        if let Some(entry) = self.slots.get_mut(usize::from(slot)) {
            *entry = section_id;
        }
    }

    /// Clear the first connector holding `section_id`. Returns whether one was found.
    pub(crate) fn release(&mut self, section_id: &str) -> bool {
        match self.slots.iter_mut().find(|entry| *entry == section_id) {
            Some(entry) => {
                entry.clear();
                true
            }
            None => false,
        }
    }
}

impl HasMetadata for Node {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl fmt::Display for Node {
    /// `[TYPE node ID s0/s1/...]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} node {} ", self.node_type.name(), self.id)?;
        let count = usize::from(self.connector_count());
        for (i, slot) in self.slots.iter().take(count).enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", slot)?;
        }
        f.write_str("]")
    }
}
