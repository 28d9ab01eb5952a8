//! # trackmodel-core
//!
//! The rail network model for trackmodel - THE MODEL.
//!
//! A rail network is a directed graph. Nodes are switches, crossings and
//! track boundaries; sections are track segments between node connectors,
//! each with a travel restriction. This crate owns that graph, refuses any
//! mutation that would make it inconsistent, and certifies finished layouts
//! as complete and correct.
//!
//! ## Layers
//!
//! - `primitives`, `types`: identifiers, slots, sentinels, error types
//! - `node_type`: the static per-kind descriptor table
//! - `node`, `section`, `metadata`: entities
//! - `model`: the container and sole mutator of references
//! - `correctness`: read-only completeness and correctness checks
//! - `formats`: JSON document and binary snapshot codecs
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous; callers provide their own locking
//! - No file or network I/O; the app layer handles files
//! - Deterministic iteration: every collection is a `BTreeMap`

// =============================================================================
// MODULES
// =============================================================================

pub mod correctness;
pub mod formats;
pub mod metadata;
pub mod model;
pub mod node;
pub mod node_type;
pub mod primitives;
pub mod section;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    AddError, Identifier, LinkError, Metadata, RemoveError, SlotId, TrackError, UnlinkError,
    is_id, is_id_or_null,
};

// =============================================================================
// RE-EXPORTS: Entities and Model
// =============================================================================

pub use metadata::HasMetadata;
pub use model::Model;
pub use node::Node;
pub use node_type::{
    ALL_NODE_TYPES, CROSSING, END, FIXED, MOTORIZED, NodeType, NodeTypeInfo, PASSIVE, THRU,
};
pub use section::{Destination, Directionality, Section};

// =============================================================================
// RE-EXPORTS: Correctness Engine
// =============================================================================

pub use correctness::{CorrectnessReport, check, is_complete, is_correct, is_locally_correct};

// =============================================================================
// RE-EXPORTS: Formats
// =============================================================================

pub use formats::{
    LinkRecord, SnapshotHeader, model_from_bytes, model_to_bytes, read_model, read_model_from,
    write_model, write_model_to,
};
