//! # Identity Spoofing
//!
//! Claiming someone else's address with your own key.

#[cfg(test)]
mod tests {
    use crate::harness::TestNet;
    use ibc_links::{build_link_packet, link_proof_bytes, Acknowledgement, LinksApi, PacketState};
    use link_crypto::{derive_address, Secp256k1KeyPair};

    fn rejected_with(ack: &Acknowledgement, prefix: &str) {
        match ack {
            Acknowledgement::Error(reason) => assert!(
                reason.starts_with(prefix),
                "unexpected reason: {reason}"
            ),
            Acknowledgement::Result(_) => panic!("spoof was accepted"),
        }
    }

    /// Victim's address, attacker's key and attacker's signature.
    #[test]
    fn test_key_swap() {
        let mut net = TestNet::connect();
        let victim = Secp256k1KeyPair::generate();
        let attacker = Secp256k1KeyPair::generate();
        let victim_address = derive_address(&victim.public_key(), "cosmos").unwrap();

        let mut packet = build_link_packet(&attacker, "cosmos").unwrap();
        packet.source_address = victim_address.clone();
        packet.signature = attacker.sign(&link_proof_bytes(&victim_address)).to_hex();

        let recv = net.inject(&packet.into(), 1);
        assert_eq!(recv.state, PacketState::Rejected);
        rejected_with(
            &recv.acknowledgement,
            "source pubkey and source address are mismatched",
        );
        assert!(net.receiver.module.link(&victim_address).unwrap().is_none());
    }

    /// Declared prefix does not match the address.
    #[test]
    fn test_prefix_lie() {
        let mut net = TestNet::connect();
        let key = Secp256k1KeyPair::generate();
        let mut packet = build_link_packet(&key, "cosmos").unwrap();
        packet.source_chain_prefix = "osmo".to_string();

        let recv = net.inject(&packet.into(), 1);
        rejected_with(
            &recv.acknowledgement,
            "source pubkey and source address are mismatched",
        );
    }

    /// Victim's real key, but the attacker cannot sign for it.
    #[test]
    fn test_victim_key_attacker_signature() {
        let mut net = TestNet::connect();
        let victim = Secp256k1KeyPair::generate();
        let attacker = Secp256k1KeyPair::generate();

        let mut packet = build_link_packet(&victim, "cosmos").unwrap();
        packet.signature = attacker
            .sign(&link_proof_bytes(&packet.source_address))
            .to_hex();

        let recv = net.inject(&packet.into(), 1);
        rejected_with(&recv.acknowledgement, "failed to verify source signature");
    }
}
