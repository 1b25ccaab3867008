//! # Account Addresses
//!
//! `address = bech32(prefix, RIPEMD160(SHA256(compressed pubkey)))`
//!
//! The same key therefore owns one address per chain prefix, which is what
//! lets a link bind `desmos1...` to `cosmos1...` for a single signer.

use crate::secp256k1::PublicKey;
use crate::CryptoError;
use bech32::{Bech32, Hrp};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Account identifier length in bytes.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Raw 20-byte account identifier of a public key.
pub fn account_id(public_key: &PublicKey) -> [u8; ACCOUNT_ID_LEN] {
    let sha = Sha256::digest(public_key.as_bytes());
    let ripe = Ripemd160::digest(sha);

    let mut id = [0u8; ACCOUNT_ID_LEN];
    id.copy_from_slice(&ripe);
    id
}

/// Derive the bech32 address of `public_key` under `prefix`.
pub fn derive_address(public_key: &PublicKey, prefix: &str) -> Result<String, CryptoError> {
    encode_address(prefix, &account_id(public_key))
}

/// Bech32-encode raw account bytes.
pub fn encode_address(prefix: &str, data: &[u8]) -> Result<String, CryptoError> {
    let hrp = Hrp::parse(prefix).map_err(|e| CryptoError::InvalidPrefix(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, data).map_err(|e| CryptoError::InvalidAddress {
        address: prefix.to_string(),
        reason: e.to_string(),
    })
}

/// A decoded bech32 account address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Human-readable part, lowercase.
    pub prefix: String,
    /// Account bytes.
    pub data: Vec<u8>,
}

/// Decode and sanity-check a bech32 account address.
pub fn decode_address(address: &str) -> Result<DecodedAddress, CryptoError> {
    let (hrp, data) = bech32::decode(address).map_err(|e| CryptoError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    if data.is_empty() {
        return Err(CryptoError::InvalidAddress {
            address: address.to_string(),
            reason: "empty account bytes".to_string(),
        });
    }

    Ok(DecodedAddress {
        prefix: hrp.as_str().to_lowercase(),
        data,
    })
}
