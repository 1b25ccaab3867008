//! # Adapters Layer
//!
//! Concrete implementations of outbound ports.

pub mod kv_store;
pub mod substrate;

pub use kv_store::{FileBackedKVStore, InMemoryKVStore};
pub use substrate::{
    CapabilityIssuer, InMemoryAccountKeeper, InMemoryCapabilityKeeper, InMemoryChannelKeeper,
    InMemoryPortKeeper, InMemorySubstrate,
};
