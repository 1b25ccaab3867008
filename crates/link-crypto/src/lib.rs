//! # Link Crypto - Signature Verification Engine
//!
//! Stateless identity and authenticity checks for account links.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `secp256k1` | ECDSA over SHA-256, low-S | Proof signatures |
//! | `address` | RIPEMD160(SHA256(pubkey)) + bech32 | Identity binding |
//!
//! Every identity check in `ibc-links` goes through [`verify`] and
//! [`derive_address`]; nothing else in the workspace touches curve math.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod errors;
pub mod secp256k1;

// Re-exports
pub use address::{account_id, decode_address, derive_address, encode_address, DecodedAddress};
pub use errors::CryptoError;
pub use secp256k1::{verify, PublicKey, Secp256k1KeyPair, Secp256k1Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
