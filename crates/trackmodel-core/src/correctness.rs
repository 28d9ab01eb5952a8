//! # Correctness Engine
//!
//! Read-only checks over a finished `Model`.
//!
//! - A model is *complete* when every node connector and every section
//!   endpoint is linked.
//! - A node is *locally correct* when the travel each connector could see,
//!   given the node type's route table, matches the directionality and
//!   orientation of the section attached there.
//! - A model is *correct* when it is complete and every node is locally
//!   correct.
//!
//! Local correctness at every node rules out dead ends and unreachable
//! origins globally: any permitted movement into a node can leave it
//! through a slot whose section is oriented to accept that flow.

use crate::model::Model;
use crate::node::Node;
use crate::node_type::END;
use crate::primitives::MAX_SLOTS;
use crate::section::Section;
use crate::types::SlotId;
use serde::Serialize;

/// Check that nothing in the model is left dangling.
///
/// The empty model is complete.
#[must_use]
pub fn is_complete(model: &Model) -> bool {
    model.nodes().all(Node::is_complete) && model.sections().all(Section::is_connected)
}

/// Check a single node against the sections attached to it.
///
/// Returns `false` when `id` names no node or when any connector does not
/// resolve to a section.
#[must_use]
pub fn is_locally_correct(model: &Model, id: &str) -> bool {
    let Some(node) = model.node(id) else {
        return false;
    };

    let Some(sections) = attached_sections(model, node) else {
        return false;
    };

    if node.node_type() == END {
        // A terminus must not sit in the middle of a one-way flow
        return sections
            .first()
            .is_some_and(|section| !section.is_unidir());
    }

    let (inward, outward) = classify_slots(node, &sections);

    sections.iter().enumerate().all(|(slot, section)| {
        let is_in = inward.get(slot).copied().unwrap_or(false);
        let is_out = outward.get(slot).copied().unwrap_or(false);
        slot_matches(id, section, is_in, is_out)
    })
}

/// Check that the model is complete and every node is locally correct.
///
/// The empty model is correct.
#[must_use]
pub fn is_correct(model: &Model) -> bool {
    if !is_complete(model) {
        return false;
    }
    model
        .nodes()
        .all(|node| is_locally_correct(model, node.id()))
}

// =============================================================================
// SLOT CLASSIFICATION
// =============================================================================

/// Sections in slot order, or `None` if any connector fails to resolve.
fn attached_sections<'m>(model: &'m Model, node: &Node) -> Option<Vec<&'m Section>> {
    node.connectors().map(|id| model.section(id)).collect()
}

/// Mark every slot a train could enter through (`inward`) and leave
/// through (`outward`).
///
/// A route `start -> end` through the node counts only if the section at
/// `start` can deliver a train into the node: it is bidirectional, or it
/// is unidirectional and ends here.
fn classify_slots(node: &Node, sections: &[&Section]) -> ([bool; MAX_SLOTS], [bool; MAX_SLOTS]) {
    let mut inward = [false; MAX_SLOTS];
    let mut outward = [false; MAX_SLOTS];

    for (start, section) in sections.iter().enumerate() {
        let delivers = section.is_bidir() || (section.is_unidir() && section.end() == node.id());
        if !delivers {
            continue;
        }
        for end in 0..sections.len() {
            if start == end || !node.could_traverse(start as SlotId, end as SlotId) {
                continue;
            }
            if let Some(flag) = inward.get_mut(start) {
                *flag = true;
            }
            if let Some(flag) = outward.get_mut(end) {
                *flag = true;
            }
        }
    }

    (inward, outward)
}

/// Validate one slot's classification against its section.
fn slot_matches(node_id: &str, section: &Section, is_in: bool, is_out: bool) -> bool {
    match (is_in, is_out) {
        (true, true) => section.is_bidir(),
        (false, false) => !section.allows_travel(),
        (true, false) => section.is_unidir() && section.end() == node_id,
        (false, true) => section.is_unidir() && section.end() != node_id,
    }
}

// =============================================================================
// REPORT
// =============================================================================

/// Itemised result of checking a whole model.
///
/// All lists are in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectnessReport {
    /// Nodes with at least one empty connector.
    pub incomplete_nodes: Vec<String>,
    /// Sections not linked to any node.
    pub unlinked_sections: Vec<String>,
    /// Complete nodes that fail the local correctness check.
    pub incorrect_nodes: Vec<String>,
}

impl CorrectnessReport {
    /// No incomplete nodes and no unlinked sections.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incomplete_nodes.is_empty() && self.unlinked_sections.is_empty()
    }

    /// Complete, with no incorrect nodes.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_complete() && self.incorrect_nodes.is_empty()
    }
}

/// Check every entity and collect the defects found.
#[must_use]
pub fn check(model: &Model) -> CorrectnessReport {
    let mut report = CorrectnessReport::default();

    for node in model.nodes() {
        if !node.is_complete() {
            report.incomplete_nodes.push(node.id().to_string());
        } else if !is_locally_correct(model, node.id()) {
            report.incorrect_nodes.push(node.id().to_string());
        }
    }

    report.unlinked_sections = model
        .sections()
        .filter(|section| !section.is_connected())
        .map(|section| section.id().to_string())
        .collect();

    tracing::debug!(
        incomplete_nodes = report.incomplete_nodes.len(),
        unlinked_sections = report.unlinked_sections.len(),
        incorrect_nodes = report.incorrect_nodes.len(),
        "model checked"
    );

    report
}

// =============================================================================
// TESTS
// =============================================================================
