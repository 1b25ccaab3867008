//! # Two-Chain Harness
//!
//! An origin chain (`cosmos`) and a receiving chain (`desmos`), each running
//! a links module over in-memory keepers, joined by one channel. The harness
//! plays the relayer: it drives the handshake and moves packets and
//! acknowledgements between the two modules.

use ibc_links::{
    AckPacketResult, Capability, ChannelOpenRequest, ChannelState, Counterparty, Height, IbcModule,
    InMemoryKVStore, InMemorySubstrate, LinksConfig, LinksModule, LinksPacketData, Order, Packet,
    PacketCodec, PacketState, RecvPacketResult, PROTOCOL_VERSION,
};

/// Port both modules bind.
pub const PORT: &str = "links";

/// Channel id used on both ends.
pub const CHANNEL: &str = "channel-0";

/// Counterparty clock seen by the origin chain (ns).
pub const ORIGIN_NOW_NS: u64 = 1_700_000_000_000_000_000;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One chain running the links module.
pub struct Chain {
    /// Bech32 prefix of this chain's accounts.
    pub prefix: &'static str,
    /// Host keepers.
    pub substrate: InMemorySubstrate,
    /// The module under test.
    pub module: LinksModule,
}

impl Chain {
    /// Boot a chain and bind the links port.
    pub fn new(prefix: &'static str) -> Self {
        let substrate = InMemorySubstrate::new();
        let config = LinksConfig::default().with_account_prefix(prefix);
        let module = LinksModule::new(
            config,
            PacketCodec::new(),
            substrate.substrate(),
            InMemoryKVStore::new(),
        )
        .expect("valid config");
        module.init().expect("port binds");
        Self {
            prefix,
            substrate,
            module,
        }
    }

    /// Mint a channel end and build the request the substrate would pass on.
    pub fn channel_request(
        &self,
        channel_id: &str,
        order: Order,
        counterparty: Counterparty,
        version: &str,
    ) -> ChannelOpenRequest {
        let capability: Capability = self.substrate.channels.create_channel(
            PORT,
            channel_id,
            order,
            counterparty.clone(),
            version,
        );
        ChannelOpenRequest {
            order,
            connection_hops: vec!["connection-0".to_string()],
            port_id: PORT.to_string(),
            channel_id: channel_id.to_string(),
            capability,
            counterparty,
            version: version.to_string(),
        }
    }
}

/// A packet carried end to end.
#[derive(Debug)]
pub struct Relayed {
    /// The packet as sent by the origin.
    pub packet: Packet,
    /// Receiver outcome.
    pub recv: RecvPacketResult,
    /// Origin outcome on the acknowledgement.
    pub ack: AckPacketResult,
}

/// Two chains joined by an open channel.
pub struct TestNet {
    /// Sends packets.
    pub origin: Chain,
    /// Receives packets and stores links.
    pub receiver: Chain,
}

impl TestNet {
    /// Boot both chains and complete the four-step handshake.
    pub fn connect() -> Self {
        init_tracing();
        let origin = Chain::new("cosmos");
        let receiver = Chain::new("desmos");

        let init = origin.channel_request(
            CHANNEL,
            Order::Unordered,
            Counterparty::new(PORT, ""),
            PROTOCOL_VERSION,
        );
        origin.module.on_chan_open_init(&init).expect("OpenInit");

        let try_request = receiver.channel_request(
            CHANNEL,
            Order::Unordered,
            Counterparty::new(PORT, CHANNEL),
            PROTOCOL_VERSION,
        );
        receiver
            .module
            .on_chan_open_try(&try_request, PROTOCOL_VERSION)
            .expect("OpenTry");

        origin
            .substrate
            .channels
            .set_channel_state(PORT, CHANNEL, ChannelState::Open, Some(CHANNEL));
        origin
            .module
            .on_chan_open_ack(PORT, CHANNEL, PROTOCOL_VERSION)
            .expect("OpenAck");

        receiver
            .substrate
            .channels
            .set_channel_state(PORT, CHANNEL, ChannelState::Open, None);
        receiver
            .module
            .on_chan_open_confirm(PORT, CHANNEL)
            .expect("OpenConfirm");

        origin
            .substrate
            .channels
            .set_counterparty_timestamp(PORT, CHANNEL, ORIGIN_NOW_NS);

        Self { origin, receiver }
    }

    /// Packets queued on the origin, drained.
    pub fn take_outbound(&self) -> Vec<Packet> {
        self.origin.substrate.channels.take_sent_packets()
    }

    /// Deliver one packet and relay its acknowledgement back.
    pub fn relay(&mut self, packet: Packet) -> Relayed {
        let recv = self
            .receiver
            .module
            .on_recv_packet(&packet)
            .expect("packet decodes");
        let ack = self
            .origin
            .module
            .on_acknowledgement_packet(&packet, &recv.acknowledgement_bytes)
            .expect("acknowledgement decodes");
        Relayed { packet, recv, ack }
    }

    /// Relay everything queued on the origin, in send order.
    pub fn relay_all(&mut self) -> Vec<Relayed> {
        self.take_outbound()
            .into_iter()
            .map(|packet| self.relay(packet))
            .collect()
    }

    /// Let every queued packet expire.
    pub fn expire_all(&mut self) -> Vec<PacketState> {
        self.take_outbound()
            .iter()
            .map(|packet| {
                self.origin
                    .module
                    .on_timeout_packet(packet)
                    .expect("timeout decodes")
            })
            .collect()
    }

    /// Hand-craft a packet straight to the receiver, bypassing the origin.
    pub fn inject(&mut self, data: &LinksPacketData, sequence: u64) -> RecvPacketResult {
        let packet = Packet {
            sequence,
            source_port: PORT.to_string(),
            source_channel: CHANNEL.to_string(),
            destination_port: PORT.to_string(),
            destination_channel: CHANNEL.to_string(),
            data: PacketCodec::new()
                .encode_packet(data)
                .expect("envelope encodes"),
            timeout_height: Height::zero(),
            timeout_timestamp: ORIGIN_NOW_NS,
        };
        self.receiver
            .module
            .on_recv_packet(&packet)
            .expect("packet decodes")
    }
}
