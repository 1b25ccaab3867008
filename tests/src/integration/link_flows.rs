//! # Link Flows
//!
//! Client message → transmit → relay → receive → acknowledgement, for both
//! packet variants, plus timeouts, out-of-order delivery and persistence.

#[cfg(test)]
mod tests {
    use crate::harness::{Chain, TestNet, CHANNEL, ORIGIN_NOW_NS, PORT};
    use ibc_links::{
        build_connection_packet, build_link_packet, AckOutcome, Acknowledgement, FileBackedKVStore,
        Height, IbcModule, InMemorySubstrate, Link, LinkEvent, LinksApi, LinksConfig, LinksModule,
        LinksPacketData, MsgCreateIbcAccountConnection, MsgCreateIbcAccountLink, Packet,
        PacketCodec, PacketKind, PacketState, DEFAULT_PACKET_TIMEOUT_NS,
    };
    use link_crypto::{derive_address, Secp256k1KeyPair};

    fn link_msg(net: &TestNet, key: &Secp256k1KeyPair) -> MsgCreateIbcAccountLink {
        let timeout = net.origin.module.default_timeout(PORT, CHANNEL).unwrap();
        MsgCreateIbcAccountLink {
            port: PORT.to_string(),
            channel_id: CHANNEL.to_string(),
            packet: build_link_packet(key, "cosmos").unwrap(),
            timeout_height: timeout.height,
            timeout_timestamp: timeout.timestamp,
        }
    }

    #[test]
    fn test_self_link_end_to_end() {
        let mut net = TestNet::connect();
        let key = Secp256k1KeyPair::generate();
        let source = derive_address(&key.public_key(), "cosmos").unwrap();
        let destination = derive_address(&key.public_key(), "desmos").unwrap();

        let sent = net
            .origin
            .module
            .create_ibc_account_link(link_msg(&net, &key))
            .unwrap();
        assert_eq!(sent.packet.timeout_timestamp, ORIGIN_NOW_NS + DEFAULT_PACKET_TIMEOUT_NS);

        let relayed = net.relay_all();
        assert_eq!(relayed.len(), 1);
        let relayed = &relayed[0];

        assert_eq!(relayed.recv.state, PacketState::Committed);
        assert_eq!(
            net.receiver.module.link(&source).unwrap(),
            Some(Link::new(source.clone(), destination))
        );

        assert_eq!(relayed.ack.state, PacketState::Acknowledged);
        match &relayed.ack.outcome {
            AckOutcome::Success(ack) => assert_eq!(ack.source_address, source),
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(
            relayed.ack.events.last(),
            Some(&LinkEvent::AcknowledgementSuccess {
                kind: PacketKind::Link,
                source_address: source,
            })
        );

        // The origin keeps no link of its own.
        assert!(net.origin.module.links().unwrap().is_empty());
    }

    #[test]
    fn test_connection_end_to_end() {
        let mut net = TestNet::connect();
        let source = Secp256k1KeyPair::generate();
        let destination = Secp256k1KeyPair::generate();
        let packet = build_connection_packet(&source, "cosmos", &destination, "desmos").unwrap();
        net.receiver
            .substrate
            .accounts
            .set_account(&packet.destination_address, Some(destination.public_key()));

        let msg = MsgCreateIbcAccountConnection {
            port: PORT.to_string(),
            channel_id: CHANNEL.to_string(),
            packet: packet.clone(),
            timeout_height: Height::new(1, 500),
            timeout_timestamp: 0,
        };
        let origin = &net.origin.module;
        origin.create_ibc_account_connection(msg).unwrap();

        let relayed = net.relay_all().remove(0);
        assert!(relayed.recv.acknowledgement.is_success());
        assert_eq!(relayed.ack.state, PacketState::Acknowledged);
        assert_eq!(
            net.receiver.module.link(&packet.source_address).unwrap(),
            Some(Link::new(&packet.source_address, &packet.destination_address))
        );
    }

    #[test]
    fn test_connection_to_unregistered_account_fails_at_origin() {
        let mut net = TestNet::connect();
        let source = Secp256k1KeyPair::generate();
        let destination = Secp256k1KeyPair::generate();
        let packet = build_connection_packet(&source, "cosmos", &destination, "desmos").unwrap();

        net.origin
            .module
            .transmit_connection_packet(
                packet.clone(),
                PORT,
                CHANNEL,
                net.origin.module.default_timeout(PORT, CHANNEL).unwrap(),
            )
            .unwrap();

        let relayed = net.relay_all().remove(0);
        assert_eq!(relayed.recv.state, PacketState::Rejected);
        assert_eq!(relayed.ack.state, PacketState::Failed);
        assert_eq!(
            relayed.ack.outcome,
            AckOutcome::Error(format!("unknown account: {}", packet.destination_address))
        );
        assert!(net.receiver.module.links().unwrap().is_empty());
    }

    #[test]
    fn test_timeout_drops_packet_without_state() {
        let mut net = TestNet::connect();
        let key = Secp256k1KeyPair::generate();
        net.origin
            .module
            .create_ibc_account_link(link_msg(&net, &key))
            .unwrap();

        assert_eq!(net.expire_all(), vec![PacketState::Dropped]);
        assert!(net.receiver.module.links().unwrap().is_empty());
        assert!(net.origin.module.links().unwrap().is_empty());
    }

    #[test]
    fn test_out_of_order_delivery() {
        let mut net = TestNet::connect();
        let keys: Vec<_> = (0..4).map(|_| Secp256k1KeyPair::generate()).collect();
        for key in &keys {
            net.origin
                .module
                .create_ibc_account_link(link_msg(&net, key))
                .unwrap();
        }

        let mut packets = net.take_outbound();
        assert_eq!(
            packets.iter().map(|p| p.sequence).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        packets.reverse();
        for packet in packets {
            let relayed = net.relay(packet);
            assert_eq!(relayed.ack.state, PacketState::Acknowledged);
        }

        assert_eq!(net.receiver.module.links().unwrap().len(), keys.len());
    }

    #[test]
    fn test_error_ack_bytes_are_json() {
        let mut net = TestNet::connect();
        let key = Secp256k1KeyPair::generate();
        net.origin
            .module
            .create_ibc_account_link(link_msg(&net, &key))
            .unwrap();
        let packet = net.take_outbound().remove(0);

        net.relay(packet.clone());
        let replay = net.receiver.module.on_recv_packet(&packet).unwrap();

        let decoded = PacketCodec::new()
            .decode_acknowledgement(&replay.acknowledgement_bytes)
            .unwrap();
        assert_eq!(decoded, replay.acknowledgement);
        assert!(matches!(decoded, Acknowledgement::Error(_)));
        assert!(String::from_utf8(replay.acknowledgement_bytes)
            .unwrap()
            .starts_with(r#"{"error":"source address already exists"#));
    }

    fn inbound_packet(data: LinksPacketData) -> Packet {
        Packet {
            sequence: 1,
            source_port: PORT.to_string(),
            source_channel: CHANNEL.to_string(),
            destination_port: PORT.to_string(),
            destination_channel: CHANNEL.to_string(),
            data: PacketCodec::new().encode_packet(&data).unwrap(),
            timeout_height: Height::zero(),
            timeout_timestamp: ORIGIN_NOW_NS,
        }
    }

    #[test]
    fn test_links_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desmos-links.db");
        let key = Secp256k1KeyPair::generate();
        let data = build_link_packet(&key, "cosmos").unwrap();
        let source = data.source_address.clone();

        {
            let chain = InMemorySubstrate::new();
            let mut module = LinksModule::new(
                LinksConfig::default(),
                PacketCodec::new(),
                chain.substrate(),
                FileBackedKVStore::open(&path).unwrap(),
            )
            .unwrap();
            let recv = module.on_recv_packet(&inbound_packet(data.into())).unwrap();
            assert!(recv.acknowledgement.is_success());
        }

        let chain = InMemorySubstrate::new();
        let module = LinksModule::new(
            LinksConfig::default(),
            PacketCodec::new(),
            chain.substrate(),
            FileBackedKVStore::open(&path).unwrap(),
        )
        .unwrap();
        assert!(module.link(&source).unwrap().is_some());
    }

    #[test]
    fn test_receiving_prefix_drives_self_link_destination() {
        let mut chain = Chain::new("osmo");
        let key = Secp256k1KeyPair::generate();
        let data = build_link_packet(&key, "cosmos").unwrap();
        let source = data.source_address.clone();

        chain
            .module
            .on_recv_packet(&inbound_packet(data.into()))
            .unwrap();

        let link = chain.module.link(&source).unwrap().unwrap();
        assert!(link.destination_address.starts_with("osmo1"));
        assert_eq!(
            link.destination_address,
            derive_address(&key.public_key(), "osmo").unwrap()
        );
    }
}
