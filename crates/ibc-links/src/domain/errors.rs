//! # Domain Errors
//!
//! Error types for the links module.
//!
//! Handshake and transmission errors are returned to the caller. Receive
//! errors are folded into error acknowledgements by the service layer, so
//! their `Display` text is what the origin chain ends up seeing.

use crate::domain::value_objects::{CapabilityPath, Order, PacketState};
use thiserror::Error;

/// Which signature of a packet failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureRole {
    /// Signature made by the source key over the proof bytes.
    Source,
    /// Signature made by the destination key over the source signature.
    Destination,
}

impl std::fmt::Display for SignatureRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureRole::Source => f.write_str("source"),
            SignatureRole::Destination => f.write_str("destination"),
        }
    }
}

/// Channel handshake rejections.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelValidationError {
    /// Channel ordering is not UNORDERED.
    #[error("invalid channel ordering: expected {expected} channel, got {got}")]
    InvalidOrdering {
        /// Required ordering
        expected: Order,
        /// Proposed ordering
        got: Order,
    },

    /// Channel identifier is not of the form `channel-{N}`.
    #[error("invalid channel identifier: {0}")]
    InvalidChannelIdentifier(String),

    /// Channel sequence above the allowed maximum.
    #[error("channel sequence {sequence} is greater than max allowed links channels {max}")]
    MaxChannelsExceeded {
        /// Parsed sequence
        sequence: u64,
        /// Allowed maximum
        max: u64,
    },

    /// Port is not the one bound by this module.
    #[error("invalid port: {got}, expected {expected}")]
    InvalidPort {
        /// Proposed port
        got: String,
        /// Bound port
        expected: String,
    },

    /// Proposed version mismatch.
    #[error("invalid version: got {got}, expected {expected}")]
    InvalidVersion {
        /// Proposed version
        got: String,
        /// Supported version
        expected: String,
    },

    /// Counterparty version mismatch.
    #[error("invalid counterparty version: got {got}, expected {expected}")]
    InvalidCounterpartyVersion {
        /// Counterparty version
        got: String,
        /// Supported version
        expected: String,
    },

    /// Channels of this module cannot be closed by users.
    #[error("user cannot close channel")]
    CloseNotAllowed,
}

/// Capability ownership errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// The module does not hold the capability for a path.
    #[error("module does not own capability {0}")]
    NotOwned(CapabilityPath),

    /// A different capability is already claimed at the path.
    #[error("capability already claimed at {0}")]
    AlreadyClaimed(CapabilityPath),

    /// Port substrate refused to bind.
    #[error("could not bind port {0}")]
    BindFailed(String),
}

/// Envelope and acknowledgement encoding errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Packet bytes are not a well-formed envelope.
    #[error("cannot unmarshal packet data: {0}")]
    MalformedPacket(String),

    /// Envelope carries no recognised variant.
    #[error("unrecognized packet type: {0}")]
    UnknownPacketType(String),

    /// Serialization failed.
    #[error("cannot marshal: {0}")]
    Encode(String),

    /// Acknowledgement is neither a result nor an error.
    #[error("cannot unmarshal packet acknowledgement: {0}")]
    MalformedAcknowledgement(String),

    /// Result acknowledgement does not carry a `PacketAck`.
    #[error("cannot unmarshal acknowledgment: {0}")]
    MalformedPacketAck(String),
}

/// Key-value store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// Backend failure.
    #[error("I/O error: {message}")]
    IOError {
        /// Backend message
        message: String,
    },

    /// Stored bytes could not be decoded.
    #[error("Corrupted value at {key}: {message}")]
    Corrupted {
        /// Hex key
        key: String,
        /// Decoder message
        message: String,
    },
}

/// Errors raised by channel substrate calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubstrateError {
    /// Send was refused.
    #[error("send packet failed: {0}")]
    SendFailed(String),

    /// Port already bound.
    #[error("port already bound: {0}")]
    PortAlreadyBound(String),
}

/// Links module error taxonomy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinksError {
    /// Handshake rejection.
    #[error(transparent)]
    ChannelValidation(#[from] ChannelValidationError),

    /// Capability ownership failure.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Encoding failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Stateless packet check failed.
    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    /// Public key does not derive the claimed address.
    #[error("source pubkey and source address are mismatched: claimed {claimed}, derived {derived}")]
    IdentityMismatch {
        /// Address in the packet
        claimed: String,
        /// Address derived from the packet key
        derived: String,
    },

    /// Signature verification failed.
    #[error("failed to verify {0} signature")]
    Signature(SignatureRole),

    /// A link already exists for this source.
    #[error("source address already exists: {0}")]
    DuplicateLink(String),

    /// Destination account or its key is unknown on this chain.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// No channel end at (port, channel).
    #[error("channel not found: port ID ({port_id}) channel ID ({channel_id})")]
    ChannelNotFound {
        /// Source port
        port_id: String,
        /// Source channel
        channel_id: String,
    },

    /// No next send sequence for (port, channel).
    #[error("sequence send not found: source port: {port_id}, source channel: {channel_id}")]
    SequenceSendNotFound {
        /// Source port
        port_id: String,
        /// Source channel
        channel_id: String,
    },

    /// No counterparty clock to resolve a relative timeout.
    #[error("counterparty timestamp unavailable for {port_id}/{channel_id}")]
    CounterpartyTimeUnavailable {
        /// Source port
        port_id: String,
        /// Source channel
        channel_id: String,
    },

    /// Transaction message failed basic validation.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Packet lifecycle violated.
    #[error("invalid packet state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Current state
        from: PacketState,
        /// Requested state
        to: PacketState,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Storage failure.
    #[error(transparent)]
    Storage(#[from] KVStoreError),

    /// Channel substrate failure.
    #[error(transparent)]
    Substrate(#[from] SubstrateError),
}

impl LinksError {
    /// Shorthand for [`LinksError::InvalidPacket`].
    pub fn invalid_packet(reason: impl Into<String>) -> Self {
        Self::InvalidPacket(reason.into())
    }
}
