//! # IBC Links - Cross-Chain Account Linking
//!
//! Lets a user prove, over an asynchronous channel, that an address on one
//! chain is controlled by (or consents to being bound to) an address on
//! another chain.
//!
//! ## Packet Flow
//!
//! ```text
//! Origin chain                           Receiving chain
//! ────────────                           ───────────────
//! build + sign ─► transmit ─► relay ─►   on_recv_packet
//!                                          identity check
//!                                          signature check(s)
//!                                          store Link
//! on_acknowledgement_packet ◄─ relay ◄─  result / error ack
//! on_timeout_packet (undelivered)
//! ```
//!
//! ## Packet Variants
//!
//! | Variant | Proof | Destination |
//! |---------|-------|-------------|
//! | Link | source key signs its address | same key, receiving chain prefix |
//! | Connection | source signs its address, destination signs the source signature | registered account on the receiving chain |
//!
//! ## Security Invariants
//!
//! - A packet key must derive the address it claims
//! - Every signature verifies under its stated key over the proof bytes
//! - Destination consent is checked against the registered key, never a
//!   key carried in the packet
//! - One link per source address, first write wins
//! - Every send requires the channel capability owned by this module

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod codec;
pub mod domain;
pub mod msgs;
pub mod ports;
pub mod service;
pub mod store;

// Re-exports
pub use adapters::{FileBackedKVStore, InMemoryKVStore, InMemorySubstrate};
pub use algorithms::{build_connection_packet, build_link_packet, ProofSigner};
pub use codec::{Acknowledgement, PacketCodec};
pub use domain::*;
pub use msgs::{MsgCreateIbcAccountConnection, MsgCreateIbcAccountLink};
pub use ports::{
    AckOutcome, AckPacketResult, ChannelOpenRequest, IbcModule, LinksApi, RecvPacketResult,
    SentPacket, Substrate,
};
pub use service::LinksModule;
pub use store::LinkStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
