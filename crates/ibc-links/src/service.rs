//! # Links Module Service
//!
//! Application service implementing [`IbcModule`] and [`LinksApi`].
//!
//! ## Architecture
//!
//! - Inbound: channel callbacks from the substrate, messages and queries
//!   from clients
//! - Outbound: the host chain's keepers ([`Substrate`]) and a
//!   [`KeyValueStore`] for links
//! - Codec and configuration are injected at construction
//!
//! Execution is step-wise and single-threaded. Each callback runs to
//! completion and either fully applies its effects or returns an error.

use crate::adapters::InMemoryKVStore;
use crate::algorithms::{
    decode_connection_packet, interpret_acknowledgement, resolve_timeout_timestamp,
    validate_channel_params, validate_counterparty_version, validate_link_packet,
};
use crate::codec::{Acknowledgement, PacketCodec};
use crate::domain::{
    advance_packet_state, invariant_destination_consent, invariant_source_signature,
    CapabilityError, CapabilityPath, ChannelValidationError, ConnectionPacketData, Link, LinkEvent,
    LinkPacketData, LinksConfig, LinksError, LinksPacketData, Packet, PacketAck, PacketState,
    PacketTimeout,
};
use crate::msgs::{MsgCreateIbcAccountConnection, MsgCreateIbcAccountLink};
use crate::ports::{
    AckOutcome, AckPacketResult, ChannelOpenRequest, IbcModule, KeyValueStore, LinksApi,
    RecvPacketResult, SentPacket, Substrate,
};
use crate::store::LinkStore;
use link_crypto::derive_address;
use tracing::{debug, info, warn};

/// The links module.
pub struct LinksModule<S: KeyValueStore = InMemoryKVStore> {
    config: LinksConfig,
    codec: PacketCodec,
    substrate: Substrate,
    store: LinkStore<S>,
}

impl<S: KeyValueStore> LinksModule<S> {
    /// Wire a module. Fails on invalid configuration.
    pub fn new(
        config: LinksConfig,
        codec: PacketCodec,
        substrate: Substrate,
        kv: S,
    ) -> Result<Self, LinksError> {
        config.validate()?;
        Ok(Self {
            config,
            codec,
            substrate,
            store: LinkStore::new(kv),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &LinksConfig {
        &self.config
    }

    /// Bind the configured port if nobody holds it yet.
    pub fn init(&self) -> Result<(), LinksError> {
        let port_id = &self.config.port_id;
        if self.substrate.ports.is_bound(port_id) {
            debug!("[links] port {} already bound", port_id);
            return Ok(());
        }

        let capability = self.substrate.ports.bind_port(port_id).map_err(|e| {
            warn!("[links] binding port {} failed: {}", port_id, e);
            CapabilityError::BindFailed(port_id.clone())
        })?;
        self.substrate
            .capabilities
            .claim_capability(capability, &CapabilityPath::port(port_id))?;

        info!("[links] bound port {}", port_id);
        Ok(())
    }

    /// Timeout for a packet sent now on (port, channel), using the
    /// configured relative timeout against the counterparty clock.
    pub fn default_timeout(
        &self,
        source_port: &str,
        source_channel: &str,
    ) -> Result<PacketTimeout, LinksError> {
        if self.config.packet_timeout_ns == 0 {
            return Ok(PacketTimeout::default());
        }

        let now = self
            .substrate
            .channels
            .counterparty_latest_timestamp(source_port, source_channel)
            .ok_or_else(|| LinksError::CounterpartyTimeUnavailable {
                port_id: source_port.to_string(),
                channel_id: source_channel.to_string(),
            })?;
        Ok(PacketTimeout::at_timestamp(resolve_timeout_timestamp(
            self.config.packet_timeout_ns,
            now,
        )))
    }

    fn claim_channel_capability(&self, request: &ChannelOpenRequest) -> Result<(), LinksError> {
        let path = CapabilityPath::channel(&request.port_id, &request.channel_id);
        let capabilities = &self.substrate.capabilities;

        // Crossing hellos: OpenInit already claimed it.
        if capabilities.authenticate_capability(&request.capability, &path) {
            return Ok(());
        }
        capabilities.claim_capability(request.capability, &path)?;
        Ok(())
    }

    fn receive_link(&mut self, data: &LinkPacketData) -> Result<Link, LinksError> {
        let decoded = validate_link_packet(data)?;
        let destination = derive_address(&decoded.public_key, &self.config.account_prefix)
            .map_err(|e| LinksError::Config(e.to_string()))?;

        let link = Link::new(&data.source_address, destination);
        self.store.store_link(&link)?;
        Ok(link)
    }

    fn receive_connection(&mut self, data: &ConnectionPacketData) -> Result<Link, LinksError> {
        let decoded = decode_connection_packet(data)?;

        let registered_key = self
            .substrate
            .accounts
            .get_pub_key(&data.destination_address)
            .ok_or_else(|| LinksError::UnknownAccount(data.destination_address.clone()))?;
        invariant_destination_consent(
            &registered_key,
            &decoded.source_signature,
            &decoded.destination_signature,
        )?;
        invariant_source_signature(
            &decoded.source_public_key,
            &data.source_address,
            &decoded.source_signature,
        )?;

        let link = Link::new(&data.source_address, &data.destination_address);
        self.store.store_link(&link)?;
        Ok(link)
    }
}

impl<S: KeyValueStore> IbcModule for LinksModule<S> {
    fn on_chan_open_init(&self, request: &ChannelOpenRequest) -> Result<(), LinksError> {
        validate_channel_params(
            &self.config,
            request.order,
            &request.port_id,
            &request.channel_id,
            &request.version,
        )?;
        self.claim_channel_capability(request)?;

        info!(
            "[links] OpenInit {}/{} -> {}",
            request.port_id, request.channel_id, request.counterparty.port_id
        );
        Ok(())
    }

    fn on_chan_open_try(
        &self,
        request: &ChannelOpenRequest,
        counterparty_version: &str,
    ) -> Result<(), LinksError> {
        validate_channel_params(
            &self.config,
            request.order,
            &request.port_id,
            &request.channel_id,
            &request.version,
        )?;
        validate_counterparty_version(&self.config, counterparty_version)?;
        self.claim_channel_capability(request)?;

        info!(
            "[links] OpenTry {}/{} <- {}/{}",
            request.port_id,
            request.channel_id,
            request.counterparty.port_id,
            request.counterparty.channel_id
        );
        Ok(())
    }

    fn on_chan_open_ack(
        &self,
        port_id: &str,
        channel_id: &str,
        counterparty_version: &str,
    ) -> Result<(), LinksError> {
        validate_counterparty_version(&self.config, counterparty_version)?;
        info!("[links] OpenAck {}/{}", port_id, channel_id);
        Ok(())
    }

    fn on_chan_open_confirm(&self, port_id: &str, channel_id: &str) -> Result<(), LinksError> {
        info!("[links] OpenConfirm {}/{}", port_id, channel_id);
        Ok(())
    }

    fn on_chan_close_init(&self, port_id: &str, channel_id: &str) -> Result<(), LinksError> {
        warn!("[links] refusing CloseInit on {}/{}", port_id, channel_id);
        Err(ChannelValidationError::CloseNotAllowed.into())
    }

    fn on_chan_close_confirm(&self, port_id: &str, channel_id: &str) -> Result<(), LinksError> {
        info!("[links] CloseConfirm {}/{}", port_id, channel_id);
        Ok(())
    }

    fn on_recv_packet(&mut self, packet: &Packet) -> Result<RecvPacketResult, LinksError> {
        let data = self.codec.decode_packet(&packet.data).map_err(|e| {
            warn!("[links] packet {} undecodable: {}", packet.sequence, e);
            e
        })?;
        let kind = data.kind();

        let result = match &data {
            LinksPacketData::Link(link_data) => self.receive_link(link_data),
            LinksPacketData::Connection(connection_data) => {
                self.receive_connection(connection_data)
            }
        };

        let (acknowledgement, state, created) = match result {
            Ok(link) => {
                info!(
                    "[links] {} {} linked to {}",
                    kind, link.source_address, link.destination_address
                );
                let payload = self.codec.encode_packet_ack(&PacketAck {
                    source_address: link.source_address.clone(),
                })?;
                let state = advance_packet_state(PacketState::Sent, PacketState::Committed)?;
                (Acknowledgement::Result(payload), state, Some(link))
            }
            Err(err) => {
                warn!(
                    "[links] {} from {} rejected: {}",
                    kind,
                    data.source_address(),
                    err
                );
                let state = advance_packet_state(PacketState::Sent, PacketState::Rejected)?;
                (Acknowledgement::error(&err), state, None)
            }
        };

        let mut events = vec![LinkEvent::PacketReceived {
            kind,
            success: acknowledgement.is_success(),
        }];
        if let Some(link) = created {
            events.push(LinkEvent::LinkCreated {
                source_address: link.source_address,
                destination_address: link.destination_address,
            });
        }

        let acknowledgement_bytes = self.codec.encode_acknowledgement(&acknowledgement)?;
        Ok(RecvPacketResult {
            acknowledgement,
            acknowledgement_bytes,
            state,
            events,
        })
    }

    fn on_acknowledgement_packet(
        &self,
        packet: &Packet,
        acknowledgement: &[u8],
    ) -> Result<AckPacketResult, LinksError> {
        let ack = self.codec.decode_acknowledgement(acknowledgement)?;
        let kind = self.codec.decode_packet(&packet.data)?.kind();
        let (outcome, state) = interpret_acknowledgement(&self.codec, &ack)?;

        let mut events = vec![LinkEvent::AcknowledgementReceived {
            kind,
            acknowledgement: String::from_utf8_lossy(acknowledgement).into_owned(),
        }];
        match &outcome {
            AckOutcome::Success(packet_ack) => {
                info!(
                    "[links] {} acknowledged for {}",
                    kind, packet_ack.source_address
                );
                events.push(LinkEvent::AcknowledgementSuccess {
                    kind,
                    source_address: packet_ack.source_address.clone(),
                });
            }
            AckOutcome::Error(reason) => {
                warn!("[links] {} {} failed: {}", kind, packet.sequence, reason);
                events.push(LinkEvent::AcknowledgementError {
                    kind,
                    error: reason.clone(),
                });
            }
        }

        Ok(AckPacketResult {
            outcome,
            state,
            events,
        })
    }

    fn on_timeout_packet(&self, packet: &Packet) -> Result<PacketState, LinksError> {
        let kind = self.codec.decode_packet(&packet.data)?.kind();
        let timed_out = advance_packet_state(PacketState::Sent, PacketState::TimedOut)?;
        let state = advance_packet_state(timed_out, PacketState::Dropped)?;

        debug!(
            "[links] {} {} on {}/{} timed out",
            kind, packet.sequence, packet.source_port, packet.source_channel
        );
        Ok(state)
    }
}

impl<S: KeyValueStore> LinksApi for LinksModule<S> {
    fn transmit_packet(
        &self,
        data: &LinksPacketData,
        source_port: &str,
        source_channel: &str,
        timeout: PacketTimeout,
    ) -> Result<SentPacket, LinksError> {
        let channels = &self.substrate.channels;

        let channel = channels
            .get_channel(source_port, source_channel)
            .ok_or_else(|| LinksError::ChannelNotFound {
                port_id: source_port.to_string(),
                channel_id: source_channel.to_string(),
            })?;

        let sequence = channels
            .get_next_sequence_send(source_port, source_channel)
            .ok_or_else(|| LinksError::SequenceSendNotFound {
                port_id: source_port.to_string(),
                channel_id: source_channel.to_string(),
            })?;

        let path = CapabilityPath::channel(source_port, source_channel);
        let capability = self
            .substrate
            .capabilities
            .get_capability(&path)
            .ok_or(CapabilityError::NotOwned(path))?;

        let packet = Packet {
            sequence,
            source_port: source_port.to_string(),
            source_channel: source_channel.to_string(),
            destination_port: channel.counterparty.port_id,
            destination_channel: channel.counterparty.channel_id,
            data: self.codec.encode_packet(data)?,
            timeout_height: timeout.height,
            timeout_timestamp: timeout.timestamp,
        };
        channels.send_packet(&capability, packet.clone())?;
        let state = advance_packet_state(PacketState::Built, PacketState::Sent)?;

        info!(
            "[links] sent {} #{} on {}/{} for {}",
            data.kind(),
            sequence,
            source_port,
            source_channel,
            data.source_address()
        );
        Ok(SentPacket { packet, state })
    }

    fn create_ibc_account_link(
        &self,
        msg: MsgCreateIbcAccountLink,
    ) -> Result<SentPacket, LinksError> {
        msg.validate_basic()?;
        let timeout = msg.timeout();
        let MsgCreateIbcAccountLink {
            port,
            channel_id,
            packet,
            ..
        } = msg;
        self.transmit_link_packet(packet, &port, &channel_id, timeout)
    }

    fn create_ibc_account_connection(
        &self,
        msg: MsgCreateIbcAccountConnection,
    ) -> Result<SentPacket, LinksError> {
        msg.validate_basic()?;
        let timeout = msg.timeout();
        let MsgCreateIbcAccountConnection {
            port,
            channel_id,
            packet,
            ..
        } = msg;
        self.transmit_connection_packet(packet, &port, &channel_id, timeout)
    }

    fn link(&self, source_address: &str) -> Result<Option<Link>, LinksError> {
        self.store.get_link(source_address)
    }

    fn links(&self) -> Result<Vec<Link>, LinksError> {
        self.store.get_all_links()
    }
}
