//! # Inbound Ports
//!
//! What the host chain and clients can ask of the links module.

use crate::codec::Acknowledgement;
use crate::domain::{
    Capability, ConnectionPacketData, Counterparty, Link, LinkEvent, LinkPacketData, LinksError,
    LinksPacketData, Order, Packet, PacketAck, PacketState, PacketTimeout,
};
use crate::msgs::{MsgCreateIbcAccountConnection, MsgCreateIbcAccountLink};

/// Parameters of `OpenInit` / `OpenTry`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelOpenRequest {
    /// Proposed ordering.
    pub order: Order,
    /// Connection hops.
    pub connection_hops: Vec<String>,
    /// Local port.
    pub port_id: String,
    /// Local channel.
    pub channel_id: String,
    /// Capability minted by the substrate for this channel end.
    pub capability: Capability,
    /// Other end.
    pub counterparty: Counterparty,
    /// Proposed version.
    pub version: String,
}

/// Outcome of a successful transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentPacket {
    /// Packet handed to the substrate.
    pub packet: Packet,
    /// Always [`PacketState::Sent`].
    pub state: PacketState,
}

/// Outcome of processing an inbound packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecvPacketResult {
    /// Acknowledgement to write back.
    pub acknowledgement: Acknowledgement,
    /// Canonical bytes of `acknowledgement`.
    pub acknowledgement_bytes: Vec<u8>,
    /// `Committed` or `Rejected`.
    pub state: PacketState,
    /// Emitted events.
    pub events: Vec<LinkEvent>,
}

/// What the origin learned from an acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AckOutcome {
    /// Counterparty wrote the link.
    Success(PacketAck),
    /// Counterparty rejected the packet.
    Error(String),
}

/// Outcome of processing an acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AckPacketResult {
    /// Decoded outcome.
    pub outcome: AckOutcome,
    /// `Acknowledged` or `Failed`.
    pub state: PacketState,
    /// Emitted events.
    pub events: Vec<LinkEvent>,
}

/// Channel and packet callbacks invoked by the channel substrate.
pub trait IbcModule {
    /// First step of a locally initiated handshake.
    fn on_chan_open_init(&self, request: &ChannelOpenRequest) -> Result<(), LinksError>;

    /// First step on the responding chain.
    fn on_chan_open_try(
        &self,
        request: &ChannelOpenRequest,
        counterparty_version: &str,
    ) -> Result<(), LinksError>;

    /// Counterparty accepted our `OpenInit`.
    fn on_chan_open_ack(
        &self,
        port_id: &str,
        channel_id: &str,
        counterparty_version: &str,
    ) -> Result<(), LinksError>;

    /// Handshake complete on the responding chain.
    fn on_chan_open_confirm(&self, port_id: &str, channel_id: &str) -> Result<(), LinksError>;

    /// User-initiated close. Always rejected.
    fn on_chan_close_init(&self, port_id: &str, channel_id: &str) -> Result<(), LinksError>;

    /// Counterparty closed the channel.
    fn on_chan_close_confirm(&self, port_id: &str, channel_id: &str) -> Result<(), LinksError>;

    /// Process an inbound packet.
    ///
    /// `Err` only when the envelope cannot be decoded; validation failures
    /// come back as an error acknowledgement.
    fn on_recv_packet(&mut self, packet: &Packet) -> Result<RecvPacketResult, LinksError>;

    /// Process the acknowledgement of a packet this chain sent.
    fn on_acknowledgement_packet(
        &self,
        packet: &Packet,
        acknowledgement: &[u8],
    ) -> Result<AckPacketResult, LinksError>;

    /// A packet this chain sent was not delivered in time.
    fn on_timeout_packet(&self, packet: &Packet) -> Result<PacketState, LinksError>;
}

/// Links API: transmission, transaction handlers and queries.
pub trait LinksApi {
    /// Send any envelope on (port, channel).
    fn transmit_packet(
        &self,
        data: &LinksPacketData,
        source_port: &str,
        source_channel: &str,
        timeout: PacketTimeout,
    ) -> Result<SentPacket, LinksError>;

    /// Send a self-link packet.
    fn transmit_link_packet(
        &self,
        data: LinkPacketData,
        source_port: &str,
        source_channel: &str,
        timeout: PacketTimeout,
    ) -> Result<SentPacket, LinksError> {
        self.transmit_packet(&data.into(), source_port, source_channel, timeout)
    }

    /// Send a connection packet.
    fn transmit_connection_packet(
        &self,
        data: ConnectionPacketData,
        source_port: &str,
        source_channel: &str,
        timeout: PacketTimeout,
    ) -> Result<SentPacket, LinksError> {
        self.transmit_packet(&data.into(), source_port, source_channel, timeout)
    }

    /// Handle `MsgCreateIbcAccountLink`.
    fn create_ibc_account_link(&self, msg: MsgCreateIbcAccountLink)
        -> Result<SentPacket, LinksError>;

    /// Handle `MsgCreateIbcAccountConnection`.
    fn create_ibc_account_connection(
        &self,
        msg: MsgCreateIbcAccountConnection,
    ) -> Result<SentPacket, LinksError>;

    /// Link keyed by `source_address`.
    fn link(&self, source_address: &str) -> Result<Option<Link>, LinksError>;

    /// All stored links, unordered.
    fn links(&self) -> Result<Vec<Link>, LinksError>;
}
