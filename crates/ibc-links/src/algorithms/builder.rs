//! # Packet Builder
//!
//! Client-side construction of signed link packets.
//!
//! - Self link: the source key signs the proof bytes of its own address.
//! - Connection: the source key signs the proof bytes, then the destination
//!   key signs the raw source signature, so consent is bound to exactly one
//!   source proof.

use crate::domain::{link_proof_bytes, ConnectionPacketData, LinkPacketData, LinksError};
use link_crypto::{derive_address, PublicKey, Secp256k1KeyPair, Secp256k1Signature};

/// A key able to produce link proofs.
pub trait ProofSigner {
    /// Compressed public key.
    fn public_key(&self) -> PublicKey;

    /// Sign `message`.
    fn sign(&self, message: &[u8]) -> Secp256k1Signature;
}

impl ProofSigner for Secp256k1KeyPair {
    fn public_key(&self) -> PublicKey {
        Secp256k1KeyPair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        Secp256k1KeyPair::sign(self, message)
    }
}

fn address_of(signer: &dyn ProofSigner, prefix: &str) -> Result<String, LinksError> {
    derive_address(&signer.public_key(), prefix)
        .map_err(|e| LinksError::InvalidMessage(format!("cannot derive address: {e}")))
}

/// Build a signed self-link packet for `source` on a chain using `source_chain_prefix`.
pub fn build_link_packet(
    source: &dyn ProofSigner,
    source_chain_prefix: &str,
) -> Result<LinkPacketData, LinksError> {
    let source_address = address_of(source, source_chain_prefix)?;
    let signature = source.sign(&link_proof_bytes(&source_address));

    Ok(LinkPacketData {
        source_chain_prefix: source_chain_prefix.to_string(),
        source_pub_key: source.public_key().to_hex(),
        signature: signature.to_hex(),
        source_address,
    })
}

/// Build a signed connection packet binding `source` to `destination`.
pub fn build_connection_packet(
    source: &dyn ProofSigner,
    source_chain_prefix: &str,
    destination: &dyn ProofSigner,
    destination_chain_prefix: &str,
) -> Result<ConnectionPacketData, LinksError> {
    let source_address = address_of(source, source_chain_prefix)?;
    let destination_address = address_of(destination, destination_chain_prefix)?;

    let source_signature = source.sign(&link_proof_bytes(&source_address));
    let destination_signature = destination.sign(source_signature.as_bytes());

    Ok(ConnectionPacketData {
        source_chain_prefix: source_chain_prefix.to_string(),
        source_address,
        source_pub_key: source.public_key().to_hex(),
        destination_address,
        source_signature: source_signature.to_hex(),
        destination_signature: destination_signature.to_hex(),
    })
}

/// Absolute timeout from a relative one, against the counterparty clock.
///
/// Zero disables the bound.
pub fn resolve_timeout_timestamp(relative_ns: u64, counterparty_now_ns: u64) -> u64 {
    if relative_ns == 0 {
        return 0;
    }
    counterparty_now_ns.saturating_add(relative_ns)
}
