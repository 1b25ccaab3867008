//! Events emitted by module callbacks.

use crate::domain::value_objects::PacketKind;
use serde::{Deserialize, Serialize};

/// Module event, returned to the host for indexing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkEvent {
    /// A packet was received and processed.
    PacketReceived {
        /// Packet variant
        kind: PacketKind,
        /// Whether a link was written
        success: bool,
    },

    /// A link was written to the store.
    LinkCreated {
        /// Link key
        source_address: String,
        /// Bound address
        destination_address: String,
    },

    /// An acknowledgement arrived for a sent packet.
    AcknowledgementReceived {
        /// Packet variant
        kind: PacketKind,
        /// Acknowledgement as received
        acknowledgement: String,
    },

    /// The counterparty wrote the link.
    AcknowledgementSuccess {
        /// Packet variant
        kind: PacketKind,
        /// Source address echoed by the receiver
        source_address: String,
    },

    /// The counterparty rejected the packet.
    AcknowledgementError {
        /// Packet variant
        kind: PacketKind,
        /// Rejection reason
        error: String,
    },
}

impl LinkEvent {
    /// Event type string.
    pub fn event_type(&self) -> &'static str {
        match self {
            LinkEvent::PacketReceived { kind, .. }
            | LinkEvent::AcknowledgementReceived { kind, .. } => kind.event_type(),
            LinkEvent::LinkCreated { .. } => "link_created",
            LinkEvent::AcknowledgementSuccess { .. } => "acknowledgement_success",
            LinkEvent::AcknowledgementError { .. } => "acknowledgement_error",
        }
    }
}
