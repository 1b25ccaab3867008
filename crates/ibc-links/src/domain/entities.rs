//! # Domain Entities
//!
//! Links, packet payloads and the channel packet that carries them.

use crate::domain::value_objects::{Height, PacketKind, PacketTimeout};
use serde::{Deserialize, Serialize};

/// A persisted binding between a source address and a destination address.
///
/// Keyed by `source_address`; written once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Address on the originating chain.
    pub source_address: String,
    /// Address on the receiving chain.
    pub destination_address: String,
}

impl Link {
    /// Create a link.
    pub fn new(source_address: impl Into<String>, destination_address: impl Into<String>) -> Self {
        Self {
            source_address: source_address.into(),
            destination_address: destination_address.into(),
        }
    }
}

/// Single-key self link: one key proves control of its own address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPacketData {
    /// Bech32 prefix of the originating chain.
    pub source_chain_prefix: String,
    /// Address claimed by the sender.
    pub source_address: String,
    /// Hex of the compressed source public key.
    pub source_pub_key: String,
    /// Hex of the source signature over the proof bytes.
    pub signature: String,
}

/// Two-key connection: the source proves control and the destination consents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPacketData {
    /// Bech32 prefix of the originating chain.
    pub source_chain_prefix: String,
    /// Address claimed by the sender.
    pub source_address: String,
    /// Hex of the compressed source public key.
    pub source_pub_key: String,
    /// Address on the receiving chain.
    pub destination_address: String,
    /// Hex of the source signature over the proof bytes.
    pub source_signature: String,
    /// Hex of the destination signature over the raw source signature.
    pub destination_signature: String,
}

/// Closed set of packets carried on the links port.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinksPacketData {
    /// Two-key connection.
    #[serde(rename = "ibc_account_connection_packet")]
    Connection(ConnectionPacketData),
    /// Single-key self link.
    #[serde(rename = "ibc_account_link_packet")]
    Link(LinkPacketData),
}

impl LinksPacketData {
    /// Variant tag.
    pub fn kind(&self) -> PacketKind {
        match self {
            LinksPacketData::Connection(_) => PacketKind::Connection,
            LinksPacketData::Link(_) => PacketKind::Link,
        }
    }

    /// Source address of either variant.
    pub fn source_address(&self) -> &str {
        match self {
            LinksPacketData::Connection(data) => &data.source_address,
            LinksPacketData::Link(data) => &data.source_address,
        }
    }
}

impl From<LinkPacketData> for LinksPacketData {
    fn from(data: LinkPacketData) -> Self {
        LinksPacketData::Link(data)
    }
}

impl From<ConnectionPacketData> for LinksPacketData {
    fn from(data: ConnectionPacketData) -> Self {
        LinksPacketData::Connection(data)
    }
}

/// Success payload returned by the receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketAck {
    /// Source address of the link that was written.
    pub source_address: String,
}

/// A channel packet as seen by both ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Send sequence on the source end.
    pub sequence: u64,
    /// Port on the sending chain.
    pub source_port: String,
    /// Channel on the sending chain.
    pub source_channel: String,
    /// Port on the receiving chain.
    pub destination_port: String,
    /// Channel on the receiving chain.
    pub destination_channel: String,
    /// Encoded envelope.
    pub data: Vec<u8>,
    /// Counterparty height bound.
    pub timeout_height: Height,
    /// Counterparty timestamp bound (ns).
    pub timeout_timestamp: u64,
}

impl Packet {
    /// Timeout bounds of this packet.
    pub fn timeout(&self) -> PacketTimeout {
        PacketTimeout {
            height: self.timeout_height,
            timestamp: self.timeout_timestamp,
        }
    }
}
