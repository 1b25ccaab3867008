//! # In-Memory Host Chain
//!
//! Channel, port, capability and account keepers backed by maps. They stand
//! in for a real chain when wiring the module in tests or local tooling.

use crate::domain::{
    Capability, CapabilityError, CapabilityPath, ChannelEnd, ChannelState, Counterparty, Order,
    Packet, SubstrateError,
};
use crate::ports::{AccountKeeper, CapabilityKeeper, ChannelKeeper, PortKeeper, Substrate};
use link_crypto::PublicKey;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type ChannelKey = (String, String);

fn key(port_id: &str, channel_id: &str) -> ChannelKey {
    (port_id.to_string(), channel_id.to_string())
}

/// Mints capabilities with chain-unique indices.
#[derive(Debug, Default)]
pub struct CapabilityIssuer {
    next: Mutex<u64>,
}

impl CapabilityIssuer {
    /// Mint a fresh capability.
    pub fn issue(&self) -> Capability {
        let mut next = self.next.lock();
        *next += 1;
        Capability::new(*next)
    }
}

/// In-memory channel substrate.
pub struct InMemoryChannelKeeper {
    issuer: Arc<CapabilityIssuer>,
    channels: RwLock<HashMap<ChannelKey, ChannelEnd>>,
    next_sequence_send: RwLock<HashMap<ChannelKey, u64>>,
    channel_capabilities: RwLock<HashMap<ChannelKey, Capability>>,
    counterparty_timestamps: RwLock<HashMap<ChannelKey, u64>>,
    outbox: RwLock<Vec<Packet>>,
}

impl InMemoryChannelKeeper {
    /// Create an empty keeper minting through `issuer`.
    pub fn new(issuer: Arc<CapabilityIssuer>) -> Self {
        Self {
            issuer,
            channels: RwLock::new(HashMap::new()),
            next_sequence_send: RwLock::new(HashMap::new()),
            channel_capabilities: RwLock::new(HashMap::new()),
            counterparty_timestamps: RwLock::new(HashMap::new()),
            outbox: RwLock::new(Vec::new()),
        }
    }

    /// Register a channel end in `Init` state and mint its capability.
    ///
    /// The capability is what the substrate passes to the module's
    /// `OpenInit` / `OpenTry` callback.
    pub fn create_channel(
        &self,
        port_id: &str,
        channel_id: &str,
        order: Order,
        counterparty: Counterparty,
        version: &str,
    ) -> Capability {
        let end = ChannelEnd {
            state: ChannelState::Init,
            ordering: order,
            counterparty,
            connection_hops: vec!["connection-0".to_string()],
            version: version.to_string(),
        };
        let capability = self.issuer.issue();

        self.channels.write().insert(key(port_id, channel_id), end);
        self.next_sequence_send
            .write()
            .insert(key(port_id, channel_id), 1);
        self.channel_capabilities
            .write()
            .insert(key(port_id, channel_id), capability);
        capability
    }

    /// Update the state (and optionally counterparty channel) of a channel end.
    pub fn set_channel_state(
        &self,
        port_id: &str,
        channel_id: &str,
        state: ChannelState,
        counterparty_channel_id: Option<&str>,
    ) {
        if let Some(end) = self.channels.write().get_mut(&key(port_id, channel_id)) {
            end.state = state;
            if let Some(counterparty_channel_id) = counterparty_channel_id {
                end.counterparty.channel_id = counterparty_channel_id.to_string();
            }
        }
    }

    /// Drop the next-sequence record of a channel.
    pub fn clear_next_sequence_send(&self, port_id: &str, channel_id: &str) {
        self.next_sequence_send
            .write()
            .remove(&key(port_id, channel_id));
    }

    /// Set the counterparty clock seen through a channel.
    pub fn set_counterparty_timestamp(&self, port_id: &str, channel_id: &str, timestamp: u64) {
        self.counterparty_timestamps
            .write()
            .insert(key(port_id, channel_id), timestamp);
    }

    /// Packets sent so far, in send order.
    pub fn sent_packets(&self) -> Vec<Packet> {
        self.outbox.read().clone()
    }

    /// Drain packets sent so far, as a relayer would.
    pub fn take_sent_packets(&self) -> Vec<Packet> {
        std::mem::take(&mut *self.outbox.write())
    }
}

impl ChannelKeeper for InMemoryChannelKeeper {
    fn get_channel(&self, port_id: &str, channel_id: &str) -> Option<ChannelEnd> {
        self.channels.read().get(&key(port_id, channel_id)).cloned()
    }

    fn get_next_sequence_send(&self, port_id: &str, channel_id: &str) -> Option<u64> {
        self.next_sequence_send
            .read()
            .get(&key(port_id, channel_id))
            .copied()
    }

    fn send_packet(&self, capability: &Capability, packet: Packet) -> Result<(), SubstrateError> {
        let channel_key = key(&packet.source_port, &packet.source_channel);

        if self.channel_capabilities.read().get(&channel_key) != Some(capability) {
            return Err(SubstrateError::SendFailed(
                "channel capability not authenticated".to_string(),
            ));
        }
        if packet.timeout().is_unbounded() {
            return Err(SubstrateError::SendFailed(
                "packet timeout height and timeout timestamp cannot both be 0".to_string(),
            ));
        }

        let mut sequences = self.next_sequence_send.write();
        let next = sequences.get_mut(&channel_key).ok_or_else(|| {
            SubstrateError::SendFailed("next sequence send not found".to_string())
        })?;
        if packet.sequence != *next {
            return Err(SubstrateError::SendFailed(format!(
                "packet sequence {} does not match next sequence {}",
                packet.sequence, next
            )));
        }
        *next += 1;

        debug!(
            "[links] substrate queued packet {} on {}/{}",
            packet.sequence, packet.source_port, packet.source_channel
        );
        self.outbox.write().push(packet);
        Ok(())
    }

    fn counterparty_latest_timestamp(&self, port_id: &str, channel_id: &str) -> Option<u64> {
        self.counterparty_timestamps
            .read()
            .get(&key(port_id, channel_id))
            .copied()
    }
}

/// In-memory port substrate.
pub struct InMemoryPortKeeper {
    issuer: Arc<CapabilityIssuer>,
    bound: RwLock<HashMap<String, Capability>>,
}

impl InMemoryPortKeeper {
    /// Create a keeper minting through `issuer`.
    pub fn new(issuer: Arc<CapabilityIssuer>) -> Self {
        Self {
            issuer,
            bound: RwLock::new(HashMap::new()),
        }
    }
}

impl PortKeeper for InMemoryPortKeeper {
    fn bind_port(&self, port_id: &str) -> Result<Capability, SubstrateError> {
        let mut bound = self.bound.write();
        if bound.contains_key(port_id) {
            return Err(SubstrateError::PortAlreadyBound(port_id.to_string()));
        }
        let capability = self.issuer.issue();
        bound.insert(port_id.to_string(), capability);
        Ok(capability)
    }

    fn is_bound(&self, port_id: &str) -> bool {
        self.bound.read().contains_key(port_id)
    }
}

/// In-memory module-scoped capability map.
#[derive(Default)]
pub struct InMemoryCapabilityKeeper {
    owned: RwLock<HashMap<CapabilityPath, Capability>>,
}

impl InMemoryCapabilityKeeper {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up the capability at `path`.
    pub fn release_capability(&self, path: &CapabilityPath) -> Option<Capability> {
        self.owned.write().remove(path)
    }
}

impl CapabilityKeeper for InMemoryCapabilityKeeper {
    fn claim_capability(
        &self,
        capability: Capability,
        path: &CapabilityPath,
    ) -> Result<(), CapabilityError> {
        let mut owned = self.owned.write();
        if owned.contains_key(path) {
            return Err(CapabilityError::AlreadyClaimed(path.clone()));
        }
        owned.insert(path.clone(), capability);
        Ok(())
    }

    fn authenticate_capability(&self, capability: &Capability, path: &CapabilityPath) -> bool {
        self.owned.read().get(path) == Some(capability)
    }

    fn get_capability(&self, path: &CapabilityPath) -> Option<Capability> {
        self.owned.read().get(path).copied()
    }
}

/// In-memory account registry.
#[derive(Default)]
pub struct InMemoryAccountKeeper {
    accounts: RwLock<HashMap<String, Option<PublicKey>>>,
}

impl InMemoryAccountKeeper {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account, with or without a known key.
    pub fn set_account(&self, address: &str, pub_key: Option<PublicKey>) {
        self.accounts.write().insert(address.to_string(), pub_key);
    }
}

impl AccountKeeper for InMemoryAccountKeeper {
    fn get_pub_key(&self, address: &str) -> Option<PublicKey> {
        self.accounts.read().get(address).copied().flatten()
    }
}

/// All in-memory keepers of one chain, sharing a capability issuer.
#[derive(Clone)]
pub struct InMemorySubstrate {
    /// Channel keeper.
    pub channels: Arc<InMemoryChannelKeeper>,
    /// Port keeper.
    pub ports: Arc<InMemoryPortKeeper>,
    /// Module capability map.
    pub capabilities: Arc<InMemoryCapabilityKeeper>,
    /// Account registry.
    pub accounts: Arc<InMemoryAccountKeeper>,
}

impl InMemorySubstrate {
    /// Create an empty chain.
    pub fn new() -> Self {
        let issuer = Arc::new(CapabilityIssuer::default());
        Self {
            channels: Arc::new(InMemoryChannelKeeper::new(issuer.clone())),
            ports: Arc::new(InMemoryPortKeeper::new(issuer)),
            capabilities: Arc::new(InMemoryCapabilityKeeper::new()),
            accounts: Arc::new(InMemoryAccountKeeper::new()),
        }
    }

    /// Trait-object view for wiring the module.
    pub fn substrate(&self) -> Substrate {
        Substrate {
            channels: self.channels.clone(),
            ports: self.ports.clone(),
            capabilities: self.capabilities.clone(),
            accounts: self.accounts.clone(),
        }
    }
}

impl Default for InMemorySubstrate {
    fn default() -> Self {
        Self::new()
    }
}
