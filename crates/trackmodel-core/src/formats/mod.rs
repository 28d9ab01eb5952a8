//! # Formats
//!
//! Encoders and decoders for models.
//!
//! - `document`: the JSON interchange document (human-edited layouts)
//! - `snapshot`: header + postcard payload (fast reload)
//!
//! Both are pure transformations over strings and byte buffers. File I/O
//! is in the app layer. Decoding always rebuilds the model through
//! `Model::add_node`, `Model::add_section` and `Model::link`, so a decoded
//! model satisfies every invariant a hand-built one does.

pub mod document;
pub mod snapshot;

pub use document::{read_model, read_model_from, write_model, write_model_to};
pub use snapshot::{SnapshotHeader, model_from_bytes, model_to_bytes};

use crate::model::Model;
use crate::node::Node;
use crate::node_type::{NodeType, NodeTypeInfo};
use crate::section::Section;
use crate::types::{SlotId, TrackError};
use serde::{Deserialize, Serialize};

/// Where a linked section attaches, as stored in both formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkRecord {
    pub start_node: String,
    pub start_slot: SlotId,
    pub end_node: String,
    pub end_slot: SlotId,
}

impl LinkRecord {
    /// Read the link of `section` back out of `model`.
    ///
    /// `None` for unlinked sections.
    pub(crate) fn of(model: &Model, section: &Section) -> Option<Self> {
        if !section.is_connected() {
            return None;
        }
        let start = model.node(section.start())?;
        let end = model.node(section.end())?;
        Some(Self {
            start_node: start.id().to_string(),
            start_slot: start.slot_of(section.id()),
            end_node: end.id().to_string(),
            end_slot: end.slot_of(section.id()),
        })
    }
}

pub(crate) fn resolve_node_type(name: &str) -> Result<NodeType, TrackError> {
    NodeTypeInfo::by_name(name)
        .ok_or_else(|| TrackError::InvalidFormat(format!("unknown node type \"{}\"", name)))
}

pub(crate) fn admit_node(model: &mut Model, node: Node) -> Result<(), TrackError> {
    let id = node.id().to_string();
    model
        .add_node(node)
        .map_err(|e| TrackError::IllegalModel(format!("node \"{}\": {}", id, e)))
}

/// Add `section` and, if given, link it straight away.
pub(crate) fn admit_section(
    model: &mut Model,
    section: Section,
    link: Option<&LinkRecord>,
) -> Result<(), TrackError> {
    let id = section.id().to_string();
    model
        .add_section(section)
        .map_err(|e| TrackError::IllegalModel(format!("section \"{}\": {}", id, e)))?;

    if let Some(link) = link {
        model
            .link(
                &id,
                &link.start_node,
                link.start_slot,
                &link.end_node,
                link.end_slot,
            )
            .map_err(|e| {
                TrackError::IllegalModel(format!("linkage inconsistency in \"{}\": {}", id, e))
            })?;
    }
    Ok(())
}
