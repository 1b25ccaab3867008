//! # Packet Codec
//!
//! Wire formats of the links port:
//!
//! | Payload | Encoding |
//! |---------|----------|
//! | `LinksPacketData` envelope | canonical JSON, keys sorted |
//! | `Acknowledgement` | canonical JSON, result bytes base64 |
//! | `PacketAck` | bincode |
//!
//! Sorted keys come from routing every value through `serde_json::Value`,
//! whose object map is ordered. Sender and receiver must produce identical
//! bytes for the same envelope, so never serialize the structs directly.

pub mod acknowledgement;

pub use acknowledgement::Acknowledgement;

use crate::domain::{CodecError, LinksPacketData, PacketAck};
use serde::Serialize;
use serde_json::Value;

/// Envelope tags this module understands.
const KNOWN_PACKET_TYPES: [&str; 2] = ["ibc_account_connection_packet", "ibc_account_link_packet"];

/// Encoder/decoder for every payload crossing the links port.
///
/// Stateless; one instance is built at wiring time and handed to the module.
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketCodec;

impl PacketCodec {
    /// Create a codec.
    pub fn new() -> Self {
        Self
    }

    /// Encode an envelope to canonical JSON.
    pub fn encode_packet(&self, data: &LinksPacketData) -> Result<Vec<u8>, CodecError> {
        canonical_json(data)
    }

    /// Decode an envelope.
    ///
    /// An envelope without exactly one recognised variant is an
    /// [`CodecError::UnknownPacketType`].
    pub fn decode_packet(&self, bytes: &[u8]) -> Result<LinksPacketData, CodecError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::MalformedPacket(e.to_string()))?;

        let Value::Object(map) = &value else {
            return Err(CodecError::MalformedPacket(
                "envelope is not an object".to_string(),
            ));
        };
        let mut tags = map.keys();
        match (tags.next(), tags.next()) {
            (Some(tag), None) if KNOWN_PACKET_TYPES.contains(&tag.as_str()) => {}
            (Some(tag), None) => return Err(CodecError::UnknownPacketType(tag.clone())),
            (None, _) => return Err(CodecError::UnknownPacketType("empty envelope".to_string())),
            (Some(_), Some(_)) => {
                return Err(CodecError::UnknownPacketType(
                    "more than one packet variant".to_string(),
                ))
            }
        }

        serde_json::from_value(value).map_err(|e| CodecError::MalformedPacket(e.to_string()))
    }

    /// Encode an acknowledgement to canonical JSON.
    pub fn encode_acknowledgement(&self, ack: &Acknowledgement) -> Result<Vec<u8>, CodecError> {
        canonical_json(ack)
    }

    /// Decode an acknowledgement.
    pub fn decode_acknowledgement(&self, bytes: &[u8]) -> Result<Acknowledgement, CodecError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CodecError::MalformedAcknowledgement(e.to_string()))
    }

    /// Encode the success payload.
    pub fn encode_packet_ack(&self, ack: &PacketAck) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(ack).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode the success payload.
    pub fn decode_packet_ack(&self, bytes: &[u8]) -> Result<PacketAck, CodecError> {
        bincode::deserialize(bytes).map_err(|e| CodecError::MalformedPacketAck(e.to_string()))
    }
}

fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let value = serde_json::to_value(value).map_err(|e| CodecError::Encode(e.to_string()))?;
    serde_json::to_vec(&value).map_err(|e| CodecError::Encode(e.to_string()))
}
