//! # Module Configuration
//!
//! Port, protocol version and receiving-chain parameters for the links module.

use crate::domain::errors::LinksError;
use tracing::{info, warn};

/// Port the module binds by default.
pub const DEFAULT_PORT_ID: &str = "links";

/// Channel version negotiated during the handshake.
pub const PROTOCOL_VERSION: &str = "links-1";

/// Bech32 prefix of accounts on the receiving chain.
pub const DEFAULT_ACCOUNT_PREFIX: &str = "desmos";

/// Relative packet timeout used by clients (10 minutes).
pub const DEFAULT_PACKET_TIMEOUT_NS: u64 = 10 * 60 * 1_000_000_000;

/// Highest channel sequence the module accepts.
pub const MAX_CHANNEL_SEQUENCE: u64 = u32::MAX as u64;

/// Configuration for the links module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinksConfig {
    /// Port identifier bound at init.
    pub port_id: String,

    /// Channel version; handshakes proposing anything else are rejected.
    pub version: String,

    /// Prefix used to derive destination addresses of self links.
    pub account_prefix: String,

    /// Relative timeout for outbound packets, in nanoseconds.
    ///
    /// Zero disables the timestamp bound.
    pub packet_timeout_ns: u64,

    /// Upper bound on the `N` of `channel-N`.
    pub max_channel_sequence: u64,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            port_id: DEFAULT_PORT_ID.to_string(),
            version: PROTOCOL_VERSION.to_string(),
            account_prefix: DEFAULT_ACCOUNT_PREFIX.to_string(),
            packet_timeout_ns: DEFAULT_PACKET_TIMEOUT_NS,
            max_channel_sequence: MAX_CHANNEL_SEQUENCE,
        }
    }
}

impl LinksConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port identifier.
    pub fn with_port_id(mut self, port_id: impl Into<String>) -> Self {
        self.port_id = port_id.into();
        self
    }

    /// Set the receiving-chain account prefix.
    pub fn with_account_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.account_prefix = prefix.into();
        self
    }

    /// Set the relative packet timeout.
    pub fn with_packet_timeout_ns(mut self, timeout_ns: u64) -> Self {
        self.packet_timeout_ns = timeout_ns;
        self
    }

    /// Set the maximum channel sequence.
    pub fn with_max_channel_sequence(mut self, max: u64) -> Self {
        self.max_channel_sequence = max;
        self
    }

    /// Defaults overlaid with `LINKS_PORT_ID`, `LINKS_ACCOUNT_PREFIX` and
    /// `LINKS_PACKET_TIMEOUT_NS`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(port_id) = std::env::var("LINKS_PORT_ID") {
            config.port_id = port_id;
        }
        if let Ok(prefix) = std::env::var("LINKS_ACCOUNT_PREFIX") {
            config.account_prefix = prefix;
        }
        if let Ok(timeout) = std::env::var("LINKS_PACKET_TIMEOUT_NS") {
            match timeout.parse() {
                Ok(ns) => config.packet_timeout_ns = ns,
                Err(_) => warn!(
                    "[links] LINKS_PACKET_TIMEOUT_NS must be an integer, ignoring {timeout}"
                ),
            }
        }

        info!(
            "[links] Config loaded: port={}, account_prefix={}",
            config.port_id, config.account_prefix
        );
        config
    }

    /// Reject configurations the module cannot run with.
    pub fn validate(&self) -> Result<(), LinksError> {
        if self.port_id.is_empty() {
            return Err(LinksError::Config("port id cannot be empty".to_string()));
        }
        if self.version.is_empty() {
            return Err(LinksError::Config("version cannot be empty".to_string()));
        }
        if self.account_prefix.is_empty() {
            return Err(LinksError::Config(
                "account prefix cannot be empty".to_string(),
            ));
        }
        if self.max_channel_sequence > MAX_CHANNEL_SEQUENCE {
            return Err(LinksError::Config(format!(
                "max channel sequence cannot exceed {MAX_CHANNEL_SEQUENCE}"
            )));
        }
        Ok(())
    }
}
