//! # Transaction Messages
//!
//! Client messages that create links over a channel. `validate_basic` runs
//! before any state is touched.

use crate::domain::{ConnectionPacketData, Height, LinkPacketData, LinksError, PacketTimeout};
use serde::{Deserialize, Serialize};

const PORT_ID_LEN: (usize, usize) = (2, 128);
const CHANNEL_ID_LEN: (usize, usize) = (8, 64);

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>')
}

fn validate_identifier(kind: &str, id: &str, (min, max): (usize, usize)) -> Result<(), LinksError> {
    if id.trim().is_empty() {
        return Err(LinksError::InvalidMessage(format!(
            "{kind} identifier cannot be blank"
        )));
    }
    if id.len() < min || id.len() > max {
        return Err(LinksError::InvalidMessage(format!(
            "{kind} identifier {id} has invalid length: {}, must be between {min}-{max} characters",
            id.len()
        )));
    }
    if !id.chars().all(is_identifier_char) {
        return Err(LinksError::InvalidMessage(format!(
            "{kind} identifier {id} must contain only alphanumeric or the following characters: '.', '_', '+', '-', '#', '[', ']', '<', '>'"
        )));
    }
    Ok(())
}

/// ICS-24 port identifier check.
pub fn validate_port_identifier(port_id: &str) -> Result<(), LinksError> {
    validate_identifier("port", port_id, PORT_ID_LEN)
}

/// ICS-24 channel identifier check.
pub fn validate_channel_identifier(channel_id: &str) -> Result<(), LinksError> {
    validate_identifier("channel", channel_id, CHANNEL_ID_LEN)
}

fn validate_route(port: &str, channel_id: &str, timeout: &PacketTimeout) -> Result<(), LinksError> {
    validate_port_identifier(port)?;
    validate_channel_identifier(channel_id)?;
    if timeout.is_unbounded() {
        return Err(LinksError::InvalidMessage(
            "packet timeout height and timeout timestamp cannot both be 0".to_string(),
        ));
    }
    Ok(())
}

/// Create a self link on the counterparty chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateIbcAccountLink {
    /// Source port.
    pub port: String,
    /// Source channel.
    pub channel_id: String,
    /// Signed payload.
    pub packet: LinkPacketData,
    /// Counterparty height bound.
    pub timeout_height: Height,
    /// Counterparty timestamp bound (ns).
    pub timeout_timestamp: u64,
}

impl MsgCreateIbcAccountLink {
    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), LinksError> {
        validate_route(&self.port, &self.channel_id, &self.timeout())?;
        self.packet.validate()
    }

    /// Account that must sign the transaction.
    pub fn signer(&self) -> &str {
        &self.packet.source_address
    }

    /// Timeout bounds.
    pub fn timeout(&self) -> PacketTimeout {
        PacketTimeout {
            height: self.timeout_height,
            timestamp: self.timeout_timestamp,
        }
    }
}

/// Create a two-key connection on the counterparty chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateIbcAccountConnection {
    /// Source port.
    pub port: String,
    /// Source channel.
    pub channel_id: String,
    /// Signed payload.
    pub packet: ConnectionPacketData,
    /// Counterparty height bound.
    pub timeout_height: Height,
    /// Counterparty timestamp bound (ns).
    pub timeout_timestamp: u64,
}

impl MsgCreateIbcAccountConnection {
    /// Stateless checks. The destination signature is left to the receiver.
    pub fn validate_basic(&self) -> Result<(), LinksError> {
        validate_route(&self.port, &self.channel_id, &self.timeout())?;
        self.packet.validate()
    }

    /// Account that must sign the transaction.
    pub fn signer(&self) -> &str {
        &self.packet.source_address
    }

    /// Timeout bounds.
    pub fn timeout(&self) -> PacketTimeout {
        PacketTimeout {
            height: self.timeout_height,
            timestamp: self.timeout_timestamp,
        }
    }
}
