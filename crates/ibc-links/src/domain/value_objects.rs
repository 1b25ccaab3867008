//! # Domain Value Objects
//!
//! Channel, capability and packet-lifecycle value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Packets may be delivered in any order.
    Unordered,
    /// Packets are delivered strictly by sequence.
    Ordered,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Unordered => write!(f, "UNORDERED"),
            Order::Ordered => write!(f, "ORDERED"),
        }
    }
}

/// Channel handshake state as reported by the channel substrate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelState {
    /// OpenInit executed locally.
    #[default]
    Init,
    /// OpenTry executed locally.
    TryOpen,
    /// Handshake complete.
    Open,
    /// Channel closed.
    Closed,
}

/// The other end of a channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Counterparty port.
    pub port_id: String,
    /// Counterparty channel (empty during OpenInit).
    pub channel_id: String,
}

impl Counterparty {
    /// Create a counterparty reference.
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// A channel end stored by the channel substrate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEnd {
    /// Handshake state.
    pub state: ChannelState,
    /// Ordering.
    pub ordering: Order,
    /// Counterparty end.
    pub counterparty: Counterparty,
    /// Connection hops.
    pub connection_hops: Vec<String>,
    /// Negotiated version.
    pub version: String,
}

/// Counterparty block height used as a timeout bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Height {
    /// Revision (chain upgrade) number.
    pub revision_number: u64,
    /// Height within the revision.
    pub revision_height: u64,
}

impl Height {
    /// Create a height.
    pub fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// The zero height disables the height bound.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Check if this height disables the bound.
    pub fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// Absolute delivery deadline of a packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketTimeout {
    /// Counterparty height bound (zero disables).
    pub height: Height,
    /// Counterparty timestamp bound in nanoseconds (zero disables).
    pub timestamp: u64,
}

impl PacketTimeout {
    /// Bound by timestamp only.
    pub fn at_timestamp(timestamp: u64) -> Self {
        Self {
            height: Height::zero(),
            timestamp,
        }
    }

    /// Bound by height only.
    pub fn at_height(height: Height) -> Self {
        Self {
            height,
            timestamp: 0,
        }
    }

    /// A packet with neither bound can never time out.
    pub fn is_unbounded(&self) -> bool {
        self.height.is_zero() && self.timestamp == 0
    }
}

/// Opaque, unforgeable ownership token for a port or channel end.
///
/// Only the substrate mints capabilities; the module can hold, compare and
/// hand them back but never construct a new one for an existing path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capability {
    index: u64,
}

impl Capability {
    /// Mint a capability. Reserved for substrate implementations.
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    /// Substrate-assigned index.
    pub fn index(&self) -> u64 {
        self.index
    }
}

/// Key of the access-control map holding capabilities.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CapabilityPath {
    /// A bound port.
    Port(String),
    /// One end of a channel.
    Channel {
        /// Port of the channel end.
        port_id: String,
        /// Channel identifier.
        channel_id: String,
    },
}

impl CapabilityPath {
    /// Path for a bound port.
    pub fn port(port_id: &str) -> Self {
        Self::Port(port_id.to_string())
    }

    /// Path for a channel end.
    pub fn channel(port_id: &str, channel_id: &str) -> Self {
        Self::Channel {
            port_id: port_id.to_string(),
            channel_id: channel_id.to_string(),
        }
    }
}

impl fmt::Display for CapabilityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityPath::Port(port_id) => write!(f, "ports/{port_id}"),
            CapabilityPath::Channel {
                port_id,
                channel_id,
            } => write!(f, "capabilities/ports/{port_id}/channels/{channel_id}"),
        }
    }
}

/// Which packet variant is carried by an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    /// Single-key self link.
    Link,
    /// Two-key cross-chain connection.
    Connection,
}

impl PacketKind {
    /// Event type emitted for this packet kind.
    pub fn event_type(&self) -> &'static str {
        match self {
            PacketKind::Link => "ibc_account_link_packet",
            PacketKind::Connection => "ibc_account_connection_packet",
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_type())
    }
}

/// Per-packet lifecycle.
///
/// ```text
/// Built -> Sent -> Committed -> Acknowledged
///               -> Rejected  -> Failed
///               -> TimedOut  -> Dropped
/// ```
///
/// `Committed` and `Rejected` are reached on the receiving chain; the rest
/// on the origin chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketState {
    /// Signed, not yet handed to the substrate.
    #[default]
    Built,
    /// Sequence assigned, queued for relay.
    Sent,
    /// Accepted by the receiver, link written, result ack returned.
    Committed,
    /// Rejected by the receiver, error ack returned.
    Rejected,
    /// Not delivered before its deadline.
    TimedOut,
    /// Origin processed a result ack.
    Acknowledged,
    /// Origin processed an error ack.
    Failed,
    /// Origin processed a timeout.
    Dropped,
}

impl PacketState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: PacketState) -> bool {
        matches!(
            (self, next),
            (Self::Built, Self::Sent)
                | (Self::Sent, Self::Committed)
                | (Self::Sent, Self::Rejected)
                | (Self::Sent, Self::TimedOut)
                | (Self::Committed, Self::Acknowledged)
                | (Self::Rejected, Self::Failed)
                | (Self::TimedOut, Self::Dropped)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Acknowledged | Self::Failed | Self::Dropped)
    }
}

impl fmt::Display for PacketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
