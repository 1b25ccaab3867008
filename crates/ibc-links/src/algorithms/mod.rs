//! # Algorithms
//!
//! Handshake checks, packet construction and validation, ack interpretation.

pub mod acknowledgement;
pub mod builder;
pub mod handshake;
pub mod validation;

pub use acknowledgement::interpret_acknowledgement;
pub use builder::{
    build_connection_packet, build_link_packet, resolve_timeout_timestamp, ProofSigner,
};
pub use handshake::{
    parse_channel_sequence, validate_channel_params, validate_counterparty_version, CHANNEL_PREFIX,
};
pub use validation::{
    decode_connection_packet, decode_link_packet, validate_connection_packet, validate_link_packet,
    DecodedConnectionPacket, DecodedLinkPacket,
};
