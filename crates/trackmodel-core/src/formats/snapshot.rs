//! # Snapshot Format
//!
//! Compact binary encoding of a model.
//!
//! Format: Header (5 bytes) + postcard-serialized model data.
//! - 4 bytes: Magic ("TRKM")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded, and the
//! decoded records are replayed through `Model` so that a tampered payload
//! cannot produce a model violating its invariants.

use super::{LinkRecord, admit_node, admit_section, resolve_node_type};
use crate::metadata::HasMetadata;
use crate::model::Model;
use crate::node::Node;
use crate::primitives::{FORMAT_VERSION, MAGIC_BYTES, MAX_SNAPSHOT_SIZE};
use crate::section::{Destination, Directionality, Section};
use crate::types::{Metadata, TrackError};
use serde::{Deserialize, Serialize};

/// Header length in bytes.
const HEADER_SIZE: usize = 5;

// =============================================================================
// HEADER
// =============================================================================

/// The snapshot header precedes all model data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Validate magic bytes and version.
    pub fn validate(&self) -> Result<(), TrackError> {
        if &self.magic != MAGIC_BYTES {
            return Err(TrackError::InvalidFormat("Invalid magic bytes".to_string()));
        }
        if self.version != FORMAT_VERSION {
            return Err(TrackError::InvalidFormat(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrackError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(TrackError::InvalidFormat("Header too short".to_string()));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }

    /// Whether `bytes` begin with the snapshot magic.
    #[must_use]
    pub fn is_snapshot(bytes: &[u8]) -> bool {
        bytes.starts_with(MAGIC_BYTES)
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotModel {
    nodes: Vec<SnapshotNode>,
    sections: Vec<SnapshotSection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotNode {
    id: String,
    node_type: String,
    metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotSection {
    id: String,
    directionality: Directionality,
    length: Option<u64>,
    link: Option<LinkRecord>,
    destination: Option<SnapshotDestination>,
    metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDestination {
    address: String,
    name: String,
    metadata: Metadata,
}

impl From<&Model> for SnapshotModel {
    fn from(model: &Model) -> Self {
        Self {
            nodes: model
                .nodes()
                .map(|node| SnapshotNode {
                    id: node.id().to_string(),
                    node_type: node.node_type().name().to_string(),
                    metadata: node.metadata().clone(),
                })
                .collect(),
            sections: model
                .sections()
                .map(|section| SnapshotSection {
                    id: section.id().to_string(),
                    directionality: section.directionality(),
                    length: section.length(),
                    link: LinkRecord::of(model, section),
                    destination: section.destination().map(|dest| SnapshotDestination {
                        address: dest.address().to_string(),
                        name: dest.name().to_string(),
                        metadata: dest.metadata().clone(),
                    }),
                    metadata: section.metadata().clone(),
                })
                .collect(),
        }
    }
}

impl SnapshotModel {
    fn into_model(self) -> Result<Model, TrackError> {
        let mut model = Model::new();

        for record in self.nodes {
            let mut node = Node::new(resolve_node_type(&record.node_type)?, record.id);
            *node.metadata_mut() = record.metadata;
            admit_node(&mut model, node)?;
        }

        for record in self.sections {
            let mut section = Section::new(record.id, record.directionality);
            if let Some(length) = record.length {
                section = section.with_length(length);
            }
            if let Some(dest) = record.destination {
                let mut destination = Destination::new(dest.address, dest.name);
                *destination.metadata_mut() = dest.metadata;
                section = section.with_destination(destination);
            }
            *section.metadata_mut() = record.metadata;
            admit_section(&mut model, section, record.link.as_ref())?;
        }

        Ok(model)
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a model to bytes (header + payload).
pub fn model_to_bytes(model: &Model) -> Result<Vec<u8>, TrackError> {
    let header = SnapshotHeader::new();
    let payload = postcard::to_stdvec(&SnapshotModel::from(model))
        .map_err(|e| TrackError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a model from bytes.
///
/// Validates, in order: minimum size, maximum size, header. Only then is
/// the payload decoded.
pub fn model_from_bytes(bytes: &[u8]) -> Result<Model, TrackError> {
    if bytes.len() < HEADER_SIZE {
        return Err(TrackError::InvalidFormat(format!(
            "Data too short: minimum {} bytes required",
            HEADER_SIZE
        )));
    }

    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(TrackError::InvalidFormat(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[HEADER_SIZE..];
    let snapshot: SnapshotModel = postcard::from_bytes(payload).map_err(|e| {
        TrackError::InvalidFormat(format!("Failed to decode snapshot data: {}", e))
    })?;

    snapshot.into_model()
}

// =============================================================================
// TESTS
// =============================================================================
