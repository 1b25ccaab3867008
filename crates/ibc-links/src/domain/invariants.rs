//! # Domain Invariants
//!
//! Checks every link must satisfy regardless of which packet carried it.

use crate::domain::errors::{LinksError, SignatureRole};
use crate::domain::value_objects::PacketState;
use link_crypto::{derive_address, PublicKey};

/// Version of the layout [`link_proof_bytes`] produces.
///
/// Marker only: it is not carried on the wire, and packets from a signer
/// using another layout simply fail signature verification. Version 1 is
/// the bare UTF-8 source address with no domain separator.
pub const LINK_PROOF_VERSION: u32 = 1;

/// Bytes the source key signs: the UTF-8 source address
/// (layout [`LINK_PROOF_VERSION`]).
pub fn link_proof_bytes(source_address: &str) -> Vec<u8> {
    source_address.as_bytes().to_vec()
}

/// Identity binding: `public_key` under `prefix` must derive `claimed`.
pub fn invariant_identity_binding(
    public_key: &PublicKey,
    prefix: &str,
    claimed: &str,
) -> Result<(), LinksError> {
    let derived = derive_address(public_key, prefix)
        .map_err(|e| LinksError::invalid_packet(format!("failed to derive address: {e}")))?;

    if derived != claimed {
        return Err(LinksError::IdentityMismatch {
            claimed: claimed.to_string(),
            derived,
        });
    }
    Ok(())
}

/// The source signature covers the proof bytes of the source address.
pub fn invariant_source_signature(
    public_key: &PublicKey,
    source_address: &str,
    signature: &[u8],
) -> Result<(), LinksError> {
    if !public_key.verify(&link_proof_bytes(source_address), signature) {
        return Err(LinksError::Signature(SignatureRole::Source));
    }
    Ok(())
}

/// The destination signature covers the raw source signature bytes and
/// must verify under the key registered on the receiving chain.
pub fn invariant_destination_consent(
    registered_key: &PublicKey,
    source_signature: &[u8],
    destination_signature: &[u8],
) -> Result<(), LinksError> {
    if !registered_key.verify(source_signature, destination_signature) {
        return Err(LinksError::Signature(SignatureRole::Destination));
    }
    Ok(())
}

/// Advance a packet's lifecycle, refusing illegal transitions.
pub fn advance_packet_state(from: PacketState, to: PacketState) -> Result<PacketState, LinksError> {
    if !from.can_transition_to(to) {
        return Err(LinksError::InvalidStateTransition { from, to });
    }
    Ok(to)
}
