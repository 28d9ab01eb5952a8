//! # Primitives
//!
//! Fixed constants for the trackmodel CORE.
//!
//! These values are compiled into the binary and never change at runtime.
//! They describe the shape of every node (slot limits), the reserved
//! identifier sentinels, and the framing of the binary snapshot format.

use crate::types::SlotId;

/// Maximum number of connectors any node type may declare.
///
/// The widest node kind is `CROSSING` with four connectors.
pub const MAX_SLOTS: usize = 4;

/// Slot value returned when a connector lookup has no answer.
pub const SLOT_INVALID: SlotId = 255;

/// The null reference. An unconnected slot or endpoint holds this value.
pub const ID_NULL: &str = "";

/// Reserved sentinel returned for out-of-range lookups.
///
/// Any string starting with `#` is reserved and never a valid identifier.
pub const ID_INVALID: &str = "#invalid";

/// Prefix that marks reserved identifiers.
pub const RESERVED_PREFIX: char = '#';

// =============================================================================
// SWITCH SLOTS
// =============================================================================

/// Slot of the common track on a three-way switch.
pub const COMMON: SlotId = 0;

/// Slot of the straight track on a three-way switch.
pub const STRAIGHT: SlotId = 1;

/// Slot of the diverging track on a three-way switch.
pub const DIVERGING: SlotId = 2;

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the binary snapshot header.
///
/// - File Header = Magic Bytes ("TRKM") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"TRKM";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot layout.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum accepted snapshot size (64 MB).
///
/// Checked before any decoding takes place.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024 * 1024;
