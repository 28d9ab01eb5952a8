//! # JSON Document Format
//!
//! The interchange format for hand-written and tool-generated layouts.
//!
//! A document is a JSON array of exactly two objects:
//!
//! ```json
//! [
//!   { "n1": { "type": "THRU" }, "n2": { "type": "END", "metadata": { "k": "v" } } },
//!   { "s1": {
//!       "link": { "startNode": "n1", "startSlot": 0, "endNode": "n2", "endSlot": 0 },
//!       "dir": "BIDIR",
//!       "length": 120,
//!       "dest": { "address": "1.4", "name": "Yard" }
//!   } }
//! ]
//! ```
//!
//! `dir` defaults to `UNIDIR`. Unknown fields are rejected. Nodes are
//! admitted first, then each section is admitted and linked in document
//! order.

use super::{LinkRecord, admit_node, admit_section, resolve_node_type};
use crate::metadata::HasMetadata;
use crate::model::Model;
use crate::node::Node;
use crate::section::{Destination, Directionality, Section};
use crate::types::{Metadata, TrackError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{Read, Write};
use std::marker::PhantomData;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parse a model from a JSON document.
pub fn read_model(input: &str) -> Result<Model, TrackError> {
    let document: Document = serde_json::from_str(input).map_err(format_error)?;
    document.into_model()
}

/// Parse a model from a JSON document read from `reader`.
pub fn read_model_from(reader: impl Read) -> Result<Model, TrackError> {
    let document: Document = serde_json::from_reader(reader).map_err(format_error)?;
    document.into_model()
}

/// Render a model as a pretty-printed JSON document.
pub fn write_model(model: &Model) -> Result<String, TrackError> {
    serde_json::to_string_pretty(&Document::from_model(model))
        .map_err(|e| TrackError::SerializationError(e.to_string()))
}

/// Write a model as a pretty-printed JSON document to `writer`.
pub fn write_model_to(writer: impl Write, model: &Model) -> Result<(), TrackError> {
    serde_json::to_writer_pretty(writer, &Document::from_model(model)).map_err(|e| {
        if e.is_io() {
            TrackError::IoError(e.to_string())
        } else {
            TrackError::SerializationError(e.to_string())
        }
    })
}

fn format_error(e: serde_json::Error) -> TrackError {
    if e.is_io() {
        TrackError::IoError(e.to_string())
    } else {
        TrackError::InvalidFormat(e.to_string())
    }
}

// =============================================================================
// DOCUMENT SHAPE
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Document(Entries<NodeRecord>, Entries<SectionRecord>);

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeRecord {
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<LinkRecord>,
    #[serde(default)]
    dir: Directionality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dest: Option<DestinationRecord>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DestinationRecord {
    address: String,
    name: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

/// Object entries in document order.
///
/// Repeated keys are kept so that `Model` can refuse them as duplicates
/// instead of one silently replacing the other.
#[derive(Debug)]
struct Entries<T>(Vec<(String, T)>);

impl<T: Serialize> Serialize for Entries<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = Entries<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by identifier")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = access.next_entry::<String, T>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

impl Document {
    fn from_model(model: &Model) -> Self {
        let nodes = model
            .nodes()
            .map(|node| {
                let record = NodeRecord {
                    node_type: node.node_type().name().to_string(),
                    metadata: node.metadata().clone(),
                };
                (node.id().to_string(), record)
            })
            .collect();

        let sections = model
            .sections()
            .map(|section| {
                let record = SectionRecord {
                    link: LinkRecord::of(model, section),
                    dir: section.directionality(),
                    length: section.length(),
                    dest: section.destination().map(|dest| DestinationRecord {
                        address: dest.address().to_string(),
                        name: dest.name().to_string(),
                        metadata: dest.metadata().clone(),
                    }),
                    metadata: section.metadata().clone(),
                };
                (section.id().to_string(), record)
            })
            .collect();

        Self(Entries(nodes), Entries(sections))
    }

    fn into_model(self) -> Result<Model, TrackError> {
        let Self(Entries(nodes), Entries(sections)) = self;
        let mut model = Model::new();

        for (id, record) in nodes {
            let mut node = Node::new(resolve_node_type(&record.node_type)?, id);
            *node.metadata_mut() = record.metadata;
            admit_node(&mut model, node)?;
        }

        for (id, record) in sections {
            let mut section = Section::new(id, record.dir);
            if let Some(length) = record.length {
                section = section.with_length(length);
            }
            if let Some(dest) = record.dest {
                let mut destination = Destination::new(dest.address, dest.name);
                *destination.metadata_mut() = dest.metadata;
                section = section.with_destination(destination);
            }
            *section.metadata_mut() = record.metadata;
            admit_section(&mut model, section, record.link.as_ref())?;
        }

        tracing::debug!(
            nodes = model.node_count(),
            sections = model.section_count(),
            "document decoded"
        );
        Ok(model)
    }
}

// =============================================================================
// TESTS
// =============================================================================
