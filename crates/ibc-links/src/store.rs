//! # Link Store
//!
//! Persisted links keyed by source address. First write wins.

use crate::domain::{KVStoreError, Link, LinksError};
use crate::ports::KeyValueStore;
use tracing::debug;

/// Key prefix of every link.
pub const LINK_PREFIX: &[u8] = b"links/";

/// Store key of the link for `source_address`.
pub fn link_key(source_address: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(LINK_PREFIX.len() + source_address.len());
    key.extend_from_slice(LINK_PREFIX);
    key.extend_from_slice(source_address.as_bytes());
    key
}

/// Links over a key-value backend.
pub struct LinkStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> LinkStore<S> {
    /// Wrap a backend.
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Persist `link`, failing if its source already has one.
    pub fn store_link(&mut self, link: &Link) -> Result<(), LinksError> {
        let key = link_key(&link.source_address);
        if self.kv.exists(&key)? {
            return Err(LinksError::DuplicateLink(link.source_address.clone()));
        }

        let value = bincode::serialize(link).map_err(|e| KVStoreError::IOError {
            message: e.to_string(),
        })?;
        self.kv.put(&key, &value)?;

        debug!(
            "[links] stored link {} -> {}",
            link.source_address, link.destination_address
        );
        Ok(())
    }

    /// Link for `source_address`.
    pub fn get_link(&self, source_address: &str) -> Result<Option<Link>, LinksError> {
        let key = link_key(source_address);
        self.kv
            .get(&key)?
            .map(|bytes| decode_link(&key, &bytes))
            .transpose()
    }

    /// Whether `source_address` has a link.
    pub fn has_link(&self, source_address: &str) -> Result<bool, LinksError> {
        Ok(self.kv.exists(&link_key(source_address))?)
    }

    /// Every stored link. No ordering guarantee.
    pub fn get_all_links(&self) -> Result<Vec<Link>, LinksError> {
        self.kv
            .prefix_scan(LINK_PREFIX)?
            .iter()
            .map(|(key, bytes)| decode_link(key, bytes))
            .collect()
    }
}

fn decode_link(key: &[u8], bytes: &[u8]) -> Result<Link, LinksError> {
    bincode::deserialize(bytes).map_err(|e| {
        KVStoreError::Corrupted {
            key: hex::encode(key),
            message: e.to_string(),
        }
        .into()
    })
}
