//! Generic acknowledgement envelope: `{"result": base64}` or `{"error": text}`.

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

/// Acknowledgement written by the receiver and relayed back to the origin.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgement {
    /// Packet accepted; carries an encoded `PacketAck`.
    Result(#[serde_as(as = "Base64")] Vec<u8>),
    /// Packet rejected; carries the reason.
    Error(String),
}

impl Acknowledgement {
    /// Error acknowledgement from any displayable error.
    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error(err.to_string())
    }

    /// Whether the packet was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}
