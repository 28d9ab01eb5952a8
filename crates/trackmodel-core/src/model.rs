//! # Model
//!
//! The container owning every node and section of a rail network.
//!
//! `Model` is the only writer of connector and endpoint references. Every
//! mutating call validates its preconditions fully before touching any
//! state, so a refused call leaves the model exactly as it was.
//!
//! ## Invariants
//!
//! Between calls the following always hold:
//! - every identifier is valid and unique within its collection
//! - every non-null connector or endpoint names an existing entity
//! - node connectors and section endpoints reference each other symmetrically
//! - destination addresses are unique
//!
//! Uses `BTreeMap` exclusively for deterministic iteration order.

use crate::metadata::HasMetadata;
use crate::node::Node;
use crate::node_type::NodeType;
use crate::section::{Directionality, Section};
use crate::types::{
    AddError, Identifier, LinkError, Metadata, RemoveError, SlotId, UnlinkError, is_id,
};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// A rail network: nodes and the sections joining them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// Node storage: id -> Node
    nodes: BTreeMap<Identifier, Node>,

    /// Section storage: id -> Section
    sections: BTreeMap<Identifier, Section>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Look up a node. The reference is valid until the next mutation.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a section. The reference is valid until the next mutation.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Mutable access to a node's metadata.
    ///
    /// The node itself is never handed out mutably, so its id, type and
    /// connectors stay under `Model`'s control.
    pub fn node_metadata_mut(&mut self, id: &str) -> Option<&mut Metadata> {
        self.nodes.get_mut(id).map(|node| node.metadata_mut())
    }

    /// Mutable access to a section's metadata.
    pub fn section_metadata_mut(&mut self, id: &str) -> Option<&mut Metadata> {
        self.sections.get_mut(id).map(|section| section.metadata_mut())
    }

    /// All nodes in identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All sections in identifier order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Number of admitted nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of admitted sections.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Whether the model holds no nodes and no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.sections.is_empty()
    }

    // =========================================================================
    // ADD / REMOVE
    // =========================================================================

    /// Admit an unconnected node.
    pub fn add_node(&mut self, node: Node) -> Result<(), AddError> {
        if !is_id(node.id()) {
            debug!(id = node.id(), "add_node refused: bad id");
            return Err(AddError::BadId);
        }
        if self.nodes.contains_key(node.id()) {
            debug!(id = node.id(), "add_node refused: duplicate");
            return Err(AddError::Duplicate);
        }
        if node.has_any_connection() {
            debug!(id = node.id(), "add_node refused: node holds references");
            return Err(AddError::HasRef);
        }

        self.nodes.insert(Identifier::new(node.id()), node);
        Ok(())
    }

    /// Construct and admit a node.
    pub fn new_node(&mut self, node_type: NodeType, id: &str) -> Result<(), AddError> {
        self.add_node(Node::new(node_type, id))
    }

    /// Admit an unconnected section.
    pub fn add_section(&mut self, section: Section) -> Result<(), AddError> {
        if !is_id(section.id()) {
            debug!(id = section.id(), "add_section refused: bad id");
            return Err(AddError::BadId);
        }
        if self.sections.contains_key(section.id()) {
            debug!(id = section.id(), "add_section refused: duplicate");
            return Err(AddError::Duplicate);
        }
        if let Some(dest) = section.destination()
            && self.destination_address_taken(dest.address())
        {
            debug!(
                id = section.id(),
                address = dest.address(),
                "add_section refused: duplicate destination address"
            );
            return Err(AddError::Duplicate);
        }
        if section.has_any_endpoint() {
            debug!(id = section.id(), "add_section refused: section holds references");
            return Err(AddError::HasRef);
        }

        self.sections.insert(Identifier::new(section.id()), section);
        Ok(())
    }

    /// Construct and admit a section without a destination.
    pub fn new_section(
        &mut self,
        id: &str,
        directionality: Directionality,
    ) -> Result<(), AddError> {
        self.add_section(Section::new(id, directionality))
    }

    /// Remove an unconnected node.
    pub fn remove_node(&mut self, id: &str) -> Result<(), RemoveError> {
        let node = self.nodes.get(id).ok_or(RemoveError::NotFound)?;
        if node.has_any_connection() {
            debug!(id, "remove_node refused: still referenced");
            return Err(RemoveError::Referenced);
        }
        self.nodes.remove(id);
        Ok(())
    }

    /// Remove an unconnected section.
    pub fn remove_section(&mut self, id: &str) -> Result<(), RemoveError> {
        let section = self.sections.get(id).ok_or(RemoveError::NotFound)?;
        if section.has_any_endpoint() {
            debug!(id, "remove_section refused: still referenced");
            return Err(RemoveError::Referenced);
        }
        self.sections.remove(id);
        Ok(())
    }

    // =========================================================================
    // LINK / UNLINK
    // =========================================================================

    /// Connect `section_id` from `start_slot` of `start_node_id` to
    /// `end_slot` of `end_node_id`.
    ///
    /// Errors are checked in this order: `NotFound`, `SameNode`,
    /// `NodeOccupied`, `SectionOccupied`.
    pub fn link(
        &mut self,
        section_id: &str,
        start_node_id: &str,
        start_slot: SlotId,
        end_node_id: &str,
        end_slot: SlotId,
    ) -> Result<(), LinkError> {
        let (Some(section), Some(start), Some(end)) = (
            self.sections.get(section_id),
            self.nodes.get(start_node_id),
            self.nodes.get(end_node_id),
        ) else {
            debug!(section_id, start_node_id, end_node_id, "link refused: not found");
            return Err(LinkError::NotFound);
        };

        if start_slot >= start.connector_count() || end_slot >= end.connector_count() {
            debug!(section_id, start_slot, end_slot, "link refused: slot out of range");
            return Err(LinkError::NotFound);
        }

        if start_node_id == end_node_id {
            debug!(section_id, start_node_id, "link refused: same node");
            return Err(LinkError::SameNode);
        }

        if !start.connector_at(start_slot).is_empty() || !end.connector_at(end_slot).is_empty() {
            debug!(section_id, start_node_id, end_node_id, "link refused: node occupied");
            return Err(LinkError::NodeOccupied);
        }

        if section.is_connected() {
            debug!(section_id, "link refused: section occupied");
            return Err(LinkError::SectionOccupied);
        }

        // All preconditions hold; nothing below can fail.
        if let Some(node) = self.nodes.get_mut(start_node_id) {
            node.set_connector(start_slot, Identifier::new(section_id));
        }
        if let Some(node) = self.nodes.get_mut(end_node_id) {
            node.set_connector(end_slot, Identifier::new(section_id));
        }
        if let Some(section) = self.sections.get_mut(section_id) {
            section.set_endpoints(Identifier::new(start_node_id), Identifier::new(end_node_id));
        }

        trace!(section_id, start_node_id, start_slot, end_node_id, end_slot, "linked");
        Ok(())
    }

    /// Disconnect `section_id` from both of its nodes.
    pub fn unlink(&mut self, section_id: &str) -> Result<(), UnlinkError> {
        let section = self
            .sections
            .get_mut(section_id)
            .ok_or(UnlinkError::NotFound)?;

        if !section.is_connected() {
            debug!(section_id, "unlink refused: not linked");
            return Err(UnlinkError::NotLinked);
        }

        let start = Identifier::new(section.start());
        let end = Identifier::new(section.end());
        section.clear_endpoints();

        for node_id in [&start, &end] {
            let released = self
                .nodes
                .get_mut(node_id.as_str())
                .is_some_and(|node| node.release(section_id));
            if !released {
                warn!(section_id, node_id = node_id.as_str(), "node did not reference unlinked section");
            }
        }

        trace!(section_id, "unlinked");
        Ok(())
    }

    fn destination_address_taken(&self, address: &str) -> bool {
        self.sections
            .values()
            .filter_map(Section::destination)
            .any(|dest| dest.address() == address)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_type::{CROSSING, END, MOTORIZED, THRU};
    use crate::primitives::ID_NULL;
    use crate::section::Destination;

    fn two_thru() -> Model {
        let mut model = Model::new();
        model.new_node(THRU, "n1").expect("n1");
        model.new_node(THRU, "n2").expect("n2");
        model.new_section("s1", Directionality::Bidir).expect("s1");
        model
    }

    #[test]
    fn add_node_rejects_bad_ids() {
        let mut model = Model::new();
        assert_eq!(model.new_node(THRU, ""), Err(AddError::BadId));
        assert_eq!(model.new_node(THRU, "#invalid"), Err(AddError::BadId));
        assert_eq!(model.node_count(), 0);
    }

    #[test]
    fn add_node_rejects_duplicates() {
        let mut model = Model::new();
        model.new_node(THRU, "n1").expect("first");
        assert_eq!(model.new_node(END, "n1"), Err(AddError::Duplicate));
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.node("n1").map(Node::node_type), Some(THRU));
    }

    #[test]
    fn add_node_rejects_connected_node() {
        let mut model = two_thru();
        model.link("s1", "n1", 0, "n2", 0).expect("link");

        let copy = model.node("n1").cloned().expect("n1");
        let mut other = Model::new();
        assert_eq!(other.add_node(copy), Err(AddError::HasRef));
    }

    #[test]
    fn add_section_rejects_bad_and_duplicate_ids() {
        let mut model = Model::new();
        assert_eq!(model.new_section("", Directionality::None), Err(AddError::BadId));
        assert_eq!(model.new_section("#x", Directionality::None), Err(AddError::BadId));
        model.new_section("s1", Directionality::None).expect("s1");
        assert_eq!(model.new_section("s1", Directionality::Bidir), Err(AddError::Duplicate));
    }

    #[test]
    fn add_section_rejects_duplicate_address() {
        let mut model = Model::new();
        model
            .add_section(
                Section::new("s1", Directionality::Bidir).with_destination(Destination::new("A1", "One")),
            )
            .expect("s1");
        let clash = Section::new("s2", Directionality::Bidir)
            .with_destination(Destination::new("A1", "Two"));
        assert_eq!(model.add_section(clash), Err(AddError::Duplicate));

        let fine = Section::new("s2", Directionality::Bidir)
            .with_destination(Destination::new("A2", "Two"));
        assert_eq!(model.add_section(fine), Ok(()));
    }

    #[test]
    fn add_section_rejects_connected_section() {
        let mut model = two_thru();
        model.link("s1", "n1", 0, "n2", 0).expect("link");
        let copy = model.section("s1").cloned().expect("s1");
        let mut other = Model::new();
        assert_eq!(other.add_section(copy), Err(AddError::HasRef));
    }

    #[test]
    fn link_writes_both_sides() {
        let mut model = two_thru();
        model.link("s1", "n1", 1, "n2", 0).expect("link");

        let s1 = model.section("s1").expect("s1");
        assert_eq!(s1.start(), "n1");
        assert_eq!(s1.end(), "n2");
        assert_eq!(model.node("n1").expect("n1").connector_at(1), "s1");
        assert_eq!(model.node("n2").expect("n2").connector_at(0), "s1");
        assert_eq!(model.node("n1").expect("n1").slot_of("s1"), 1);
    }

    #[test]
    fn link_not_found_cases() {
        let mut model = two_thru();
        assert_eq!(model.link("s9", "n1", 0, "n2", 0), Err(LinkError::NotFound));
        assert_eq!(model.link("s1", "n9", 0, "n2", 0), Err(LinkError::NotFound));
        assert_eq!(model.link("s1", "n1", 0, "n9", 0), Err(LinkError::NotFound));
        assert_eq!(model.link("s1", "n1", 2, "n2", 0), Err(LinkError::NotFound));
        assert_eq!(model.link("s1", "n1", 0, "n2", 7), Err(LinkError::NotFound));
    }

    #[test]
    fn link_same_node_refused() {
        let mut model = two_thru();
        assert_eq!(model.link("s1", "n1", 0, "n1", 1), Err(LinkError::SameNode));
        // Out-of-range slot wins over same node
        assert_eq!(model.link("s1", "n1", 0, "n1", 5), Err(LinkError::NotFound));
    }

    #[test]
    fn link_occupied_cases() {
        let mut model = two_thru();
        model.new_section("s2", Directionality::Bidir).expect("s2");
        model.new_node(CROSSING, "x").expect("x");
        model.link("s1", "n1", 0, "n2", 0).expect("link");

        assert_eq!(model.link("s2", "n1", 0, "n2", 1), Err(LinkError::NodeOccupied));
        assert_eq!(model.link("s2", "n1", 1, "n2", 0), Err(LinkError::NodeOccupied));
        assert_eq!(model.link("s1", "n1", 1, "x", 0), Err(LinkError::SectionOccupied));
    }

    #[test]
    fn failed_link_leaves_model_unchanged() {
        let mut model = two_thru();
        model.link("s1", "n1", 0, "n2", 0).expect("link");
        model.new_section("s2", Directionality::Bidir).expect("s2");
        let before = model.clone();

        assert!(model.link("s2", "n1", 1, "n2", 0).is_err());
        assert!(model.link("s2", "n1", 1, "n1", 0).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn unlink_restores_state() {
        let mut model = two_thru();
        let before = model.clone();
        model.link("s1", "n1", 1, "n2", 0).expect("link");
        model.unlink("s1").expect("unlink");
        assert_eq!(model, before);

        let s1 = model.section("s1").expect("s1");
        assert_eq!(s1.start(), ID_NULL);
        assert_eq!(s1.end(), ID_NULL);
    }

    #[test]
    fn unlink_errors() {
        let mut model = two_thru();
        assert_eq!(model.unlink("s9"), Err(UnlinkError::NotFound));
        assert_eq!(model.unlink("s1"), Err(UnlinkError::NotLinked));
    }

    #[test]
    fn remove_requires_unlink() {
        let mut model = two_thru();
        model.link("s1", "n1", 0, "n2", 0).expect("link");

        assert_eq!(model.remove_node("n1"), Err(RemoveError::Referenced));
        assert_eq!(model.remove_section("s1"), Err(RemoveError::Referenced));
        assert!(model.node("n1").is_some());

        model.unlink("s1").expect("unlink");
        assert_eq!(model.remove_section("s1"), Ok(()));
        assert_eq!(model.remove_node("n1"), Ok(()));
        assert_eq!(model.remove_node("n1"), Err(RemoveError::NotFound));
        assert_eq!(model.remove_section("s1"), Err(RemoveError::NotFound));
    }

    #[test]
    fn remove_section_frees_destination_address() {
        let mut model = Model::new();
        let dest = || Destination::new("D", "Dock");
        model
            .add_section(Section::new("s1", Directionality::Bidir).with_destination(dest()))
            .expect("s1");
        model.remove_section("s1").expect("remove");
        model
            .add_section(Section::new("s2", Directionality::Bidir).with_destination(dest()))
            .expect("address reusable");
    }

    #[test]
    fn metadata_through_mut_lookup() {
        let mut model = Model::new();
        model.new_node(MOTORIZED, "m1").expect("m1");
        model.new_section("s1", Directionality::Bidir).expect("s1");
        model
            .node_metadata_mut("m1")
            .expect("m1")
            .insert("controller".to_string(), "c7".to_string());
        model
            .section_metadata_mut("s1")
            .expect("s1")
            .insert("speed".to_string(), "40".to_string());

        assert_eq!(model.node("m1").expect("m1").metadata_value("controller"), "c7");
        assert_eq!(model.section("s1").expect("s1").metadata_value("speed"), "40");
        assert!(model.node_metadata_mut("zz").is_none());
        assert!(model.section_metadata_mut("zz").is_none());
    }

    #[test]
    fn metadata_edit_keeps_linkage() {
        let mut model = two_thru();
        model.link("s1", "n1", 0, "n2", 0).expect("link");
        let before_nodes: Vec<Node> = model.nodes().cloned().collect();

        model
            .section_metadata_mut("s1")
            .expect("s1")
            .insert("note".to_string(), "relaid".to_string());

        let s1 = model.section("s1").expect("s1");
        assert_eq!(s1.id(), "s1");
        assert_eq!(s1.start(), "n1");
        assert_eq!(s1.end(), "n2");
        assert_eq!(model.nodes().cloned().collect::<Vec<_>>(), before_nodes);
        model.unlink("s1").expect("unlink");
        model.remove_node("n1").expect("n1 removable");
    }

    #[test]
    fn iteration_is_ordered() {
        let mut model = Model::new();
        for id in ["c", "a", "b"] {
            model.new_node(END, id).expect("add");
        }
        let ids: Vec<&str> = model.nodes().map(Node::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(!model.is_empty());
        assert!(Model::new().is_empty());
    }
}
