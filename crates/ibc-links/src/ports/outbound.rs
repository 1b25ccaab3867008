//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the links module requires from the host chain.

use crate::domain::{
    Capability, CapabilityError, CapabilityPath, ChannelEnd, KVStoreError, Packet, SubstrateError,
};
use link_crypto::PublicKey;
use std::sync::Arc;

/// Channel substrate: channel ends, sequences and packet submission.
pub trait ChannelKeeper: Send + Sync {
    /// Channel end at (port, channel).
    fn get_channel(&self, port_id: &str, channel_id: &str) -> Option<ChannelEnd>;

    /// Sequence the next packet sent on (port, channel) will carry.
    fn get_next_sequence_send(&self, port_id: &str, channel_id: &str) -> Option<u64>;

    /// Submit a packet. `capability` must be the one minted for the
    /// packet's source channel.
    fn send_packet(&self, capability: &Capability, packet: Packet) -> Result<(), SubstrateError>;

    /// Latest known counterparty block time (ns) for (port, channel).
    fn counterparty_latest_timestamp(&self, port_id: &str, channel_id: &str) -> Option<u64>;
}

/// Port substrate.
pub trait PortKeeper: Send + Sync {
    /// Bind a port, returning its capability.
    fn bind_port(&self, port_id: &str) -> Result<Capability, SubstrateError>;

    /// Whether any module holds the port.
    fn is_bound(&self, port_id: &str) -> bool;
}

/// Module-scoped capability map keyed by [`CapabilityPath`].
pub trait CapabilityKeeper: Send + Sync {
    /// Take ownership of `capability` at `path`.
    fn claim_capability(
        &self,
        capability: Capability,
        path: &CapabilityPath,
    ) -> Result<(), CapabilityError>;

    /// Whether `capability` is the one owned at `path`.
    fn authenticate_capability(&self, capability: &Capability, path: &CapabilityPath) -> bool;

    /// Capability owned at `path`.
    fn get_capability(&self, path: &CapabilityPath) -> Option<Capability>;
}

/// Account lookup on the receiving chain.
pub trait AccountKeeper: Send + Sync {
    /// Registered public key of `address`, if the account exists and has one.
    fn get_pub_key(&self, address: &str) -> Option<PublicKey>;
}

/// Abstract interface for the module's persistent store.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Iterate over keys with a prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// The host chain collaborators, bundled for wiring.
#[derive(Clone)]
pub struct Substrate {
    /// Channel substrate.
    pub channels: Arc<dyn ChannelKeeper>,
    /// Port substrate.
    pub ports: Arc<dyn PortKeeper>,
    /// Module-scoped capabilities.
    pub capabilities: Arc<dyn CapabilityKeeper>,
    /// Account lookup.
    pub accounts: Arc<dyn AccountKeeper>,
}
