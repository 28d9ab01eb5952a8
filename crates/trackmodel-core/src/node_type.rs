//! # Node Type Table
//!
//! One immutable descriptor per node kind.
//!
//! A node does not carry behaviour of its own: it points at the shared
//! descriptor of its kind, which states how many connectors the node has
//! and between which connectors a train could ever be routed. The
//! traversal matrix is a property of the hardware, independent of what is
//! actually connected.
//!
//! ## Switches
//!
//! Three-connector switches use `COMMON` (0), `STRAIGHT` (1) and
//! `DIVERGING` (2). Travel between straight and diverging is physically
//! impossible.
//!
//! - `MOTORIZED`: entered only through common; a routing table picks the exit.
//! - `PASSIVE`: exited only through common; needs no controller.
//! - `FIXED`: entered through common and always exits straight; trains
//!   arriving on diverging leave through common.
//!
//! ## Crossings
//!
//! Track A joins slots 0 and 1, track B joins slots 2 and 3. Both tracks
//! are traversable either way; moving between tracks is forbidden.

use crate::primitives::MAX_SLOTS;
use crate::types::SlotId;
use std::fmt;

/// Static description of a node kind.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeTypeInfo {
    name: &'static str,
    slot_count: SlotId,
    allowed_routes: [[bool; MAX_SLOTS]; MAX_SLOTS],
}

/// Handle to a shared node type descriptor.
pub type NodeType = &'static NodeTypeInfo;

impl NodeTypeInfo {
    /// Name used in documents and diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of connectors every node of this type has.
    #[must_use]
    pub const fn slot_count(&self) -> SlotId {
        self.slot_count
    }

    /// Whether a train could be routed from connector `from` to connector `to`.
    ///
    /// Returns `false` for any slot at or beyond `slot_count`.
    #[must_use]
    pub fn could_traverse(&self, from: SlotId, to: SlotId) -> bool {
        if from >= self.slot_count || to >= self.slot_count {
            return false;
        }
        self.allowed_routes
            .get(usize::from(from))
            .and_then(|row| row.get(usize::from(to)))
            .copied()
            .unwrap_or(false)
    }

    /// Resolve a node type by its name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<NodeType> {
        ALL_NODE_TYPES.iter().copied().find(|t| t.name == name)
    }
}

impl fmt::Display for NodeTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// DESCRIPTORS
// =============================================================================

const T: bool = true;
const F: bool = false;

/// A node joining two sections of a single track.
pub const THRU: NodeType = &NodeTypeInfo {
    name: "THRU",
    slot_count: 2,
    // 0 <-> 1
    allowed_routes: [
        [F, T, F, F],
        [T, F, F, F],
        [F, F, F, F],
        [F, F, F, F],
    ],
};

/// A motorized switch operated by a routing table.
pub const MOTORIZED: NodeType = &NodeTypeInfo {
    name: "MOTORIZED",
    slot_count: 3,
    // 0 -> 1, 0 -> 2
    allowed_routes: [
        [F, T, T, F],
        [F, F, F, F],
        [F, F, F, F],
        [F, F, F, F],
    ],
};

/// A switch that cannot be entered from the common track.
pub const PASSIVE: NodeType = &NodeTypeInfo {
    name: "PASSIVE",
    slot_count: 3,
    // 1 -> 0, 2 -> 0
    allowed_routes: [
        [F, F, F, F],
        [T, F, F, F],
        [T, F, F, F],
        [F, F, F, F],
    ],
};

/// A switch fixed in a single position.
pub const FIXED: NodeType = &NodeTypeInfo {
    name: "FIXED",
    slot_count: 3,
    // 0 -> 1, 2 -> 0
    allowed_routes: [
        [F, T, F, F],
        [F, F, F, F],
        [T, F, F, F],
        [F, F, F, F],
    ],
};

/// A level crossing of two tracks.
pub const CROSSING: NodeType = &NodeTypeInfo {
    name: "CROSSING",
    slot_count: 4,
    // 0 <-> 1, 2 <-> 3
    allowed_routes: [
        [F, T, F, F],
        [T, F, F, F],
        [F, F, F, T],
        [F, F, T, F],
    ],
};

/// A terminus.
pub const END: NodeType = &NodeTypeInfo {
    name: "END",
    slot_count: 1,
    allowed_routes: [[F; MAX_SLOTS]; MAX_SLOTS],
};

/// Every known node type, in declaration order.
pub const ALL_NODE_TYPES: [NodeType; 6] = [THRU, MOTORIZED, PASSIVE, FIXED, CROSSING, END];
