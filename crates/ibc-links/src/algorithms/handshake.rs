//! # Channel Handshake Validation
//!
//! Checks run on `OpenInit` and `OpenTry`, in order:
//!
//! 1. ordering is UNORDERED
//! 2. `channel-{N}` with `N <= max_channel_sequence`
//! 3. port is the bound port
//! 4. version is the protocol version
//!
//! `OpenTry` and `OpenAck` additionally check the counterparty version.

use crate::domain::{ChannelValidationError, LinksConfig, Order};

/// Identifier prefix of every channel.
pub const CHANNEL_PREFIX: &str = "channel-";

/// Parse `N` out of `channel-N`.
pub fn parse_channel_sequence(channel_id: &str) -> Result<u64, ChannelValidationError> {
    let invalid = || ChannelValidationError::InvalidChannelIdentifier(channel_id.to_string());

    let suffix = channel_id.strip_prefix(CHANNEL_PREFIX).ok_or_else(invalid)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    suffix.parse().map_err(|_| invalid())
}

/// Validate the parameters of a channel this module is asked to open.
pub fn validate_channel_params(
    config: &LinksConfig,
    order: Order,
    port_id: &str,
    channel_id: &str,
    version: &str,
) -> Result<(), ChannelValidationError> {
    if order != Order::Unordered {
        return Err(ChannelValidationError::InvalidOrdering {
            expected: Order::Unordered,
            got: order,
        });
    }

    let sequence = parse_channel_sequence(channel_id)?;
    if sequence > config.max_channel_sequence {
        return Err(ChannelValidationError::MaxChannelsExceeded {
            sequence,
            max: config.max_channel_sequence,
        });
    }

    if port_id != config.port_id {
        return Err(ChannelValidationError::InvalidPort {
            got: port_id.to_string(),
            expected: config.port_id.clone(),
        });
    }

    if version != config.version {
        return Err(ChannelValidationError::InvalidVersion {
            got: version.to_string(),
            expected: config.version.clone(),
        });
    }

    Ok(())
}

/// The counterparty must speak the same protocol version.
pub fn validate_counterparty_version(
    config: &LinksConfig,
    counterparty_version: &str,
) -> Result<(), ChannelValidationError> {
    if counterparty_version != config.version {
        return Err(ChannelValidationError::InvalidCounterpartyVersion {
            got: counterparty_version.to_string(),
            expected: config.version.clone(),
        });
    }
    Ok(())
}
