//! Crypto error types.

use thiserror::Error;

/// Errors raised by key parsing, signing and address handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Bytes are not a point on secp256k1
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signature is not 64 bytes of r||s
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Hex decoding failed
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Human-readable prefix rejected by bech32
    #[error("Invalid address prefix: {0}")]
    InvalidPrefix(String),

    /// Address failed bech32 decoding
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress {
        /// The offending address
        address: String,
        /// Decoder message
        reason: String,
    },
}
