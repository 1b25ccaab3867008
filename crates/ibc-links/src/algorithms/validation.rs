//! # Packet Validation
//!
//! Stateless checks on inbound packet payloads. Each `decode_*` function
//! parses and checks identity binding; each `validate_*` additionally
//! verifies the source signature over the proof bytes.

use crate::domain::{
    invariant_identity_binding, invariant_source_signature, ConnectionPacketData, LinkPacketData,
    LinksError,
};
use link_crypto::{decode_address, PublicKey};

/// A link packet whose fields parsed and whose key derives its address.
#[derive(Clone, Debug)]
pub struct DecodedLinkPacket {
    /// Source key.
    pub public_key: PublicKey,
    /// Raw source signature.
    pub signature: Vec<u8>,
}

/// A connection packet whose fields parsed and whose key derives its address.
#[derive(Clone, Debug)]
pub struct DecodedConnectionPacket {
    /// Source key.
    pub source_public_key: PublicKey,
    /// Raw source signature.
    pub source_signature: Vec<u8>,
    /// Raw destination signature.
    pub destination_signature: Vec<u8>,
}

fn check_prefix(prefix: &str) -> Result<(), LinksError> {
    if prefix.trim().is_empty() {
        return Err(LinksError::invalid_packet("chain prefix cannot be empty"));
    }
    Ok(())
}

fn parse_address(address: &str, role: &str) -> Result<(), LinksError> {
    decode_address(address)
        .map(|_| ())
        .map_err(|e| LinksError::invalid_packet(format!("failed to parse {role} address: {e}")))
}

fn decode_pub_key(encoded: &str) -> Result<PublicKey, LinksError> {
    PublicKey::from_hex(encoded)
        .map_err(|e| LinksError::invalid_packet(format!("failed to decode source pubkey: {e}")))
}

fn decode_signature(encoded: &str, role: &str) -> Result<Vec<u8>, LinksError> {
    hex::decode(encoded)
        .map_err(|e| LinksError::invalid_packet(format!("failed to decode {role} signature: {e}")))
}

/// Parse a link packet and check identity binding.
pub fn decode_link_packet(data: &LinkPacketData) -> Result<DecodedLinkPacket, LinksError> {
    check_prefix(&data.source_chain_prefix)?;
    parse_address(&data.source_address, "source")?;
    let public_key = decode_pub_key(&data.source_pub_key)?;
    invariant_identity_binding(&public_key, &data.source_chain_prefix, &data.source_address)?;
    let signature = decode_signature(&data.signature, "source")?;

    Ok(DecodedLinkPacket {
        public_key,
        signature,
    })
}

/// Full stateless validation of a link packet.
pub fn validate_link_packet(data: &LinkPacketData) -> Result<DecodedLinkPacket, LinksError> {
    let decoded = decode_link_packet(data)?;
    invariant_source_signature(&decoded.public_key, &data.source_address, &decoded.signature)?;
    Ok(decoded)
}

/// Parse a connection packet and check identity binding of the source.
pub fn decode_connection_packet(
    data: &ConnectionPacketData,
) -> Result<DecodedConnectionPacket, LinksError> {
    check_prefix(&data.source_chain_prefix)?;
    parse_address(&data.source_address, "source")?;
    let source_public_key = decode_pub_key(&data.source_pub_key)?;
    invariant_identity_binding(
        &source_public_key,
        &data.source_chain_prefix,
        &data.source_address,
    )?;
    let source_signature = decode_signature(&data.source_signature, "source")?;
    parse_address(&data.destination_address, "destination")?;
    let destination_signature = decode_signature(&data.destination_signature, "destination")?;

    Ok(DecodedConnectionPacket {
        source_public_key,
        source_signature,
        destination_signature,
    })
}

/// Full stateless validation of a connection packet.
///
/// The destination signature needs the receiving chain's account state and
/// is checked by the receiver.
pub fn validate_connection_packet(
    data: &ConnectionPacketData,
) -> Result<DecodedConnectionPacket, LinksError> {
    let decoded = decode_connection_packet(data)?;
    invariant_source_signature(
        &decoded.source_public_key,
        &data.source_address,
        &decoded.source_signature,
    )?;
    Ok(decoded)
}

impl LinkPacketData {
    /// Stateless validation, see [`validate_link_packet`].
    pub fn validate(&self) -> Result<(), LinksError> {
        validate_link_packet(self).map(|_| ())
    }
}

impl ConnectionPacketData {
    /// Stateless validation, see [`validate_connection_packet`].
    pub fn validate(&self) -> Result<(), LinksError> {
        validate_connection_packet(self).map(|_| ())
    }
}
