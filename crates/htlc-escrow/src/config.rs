//! Configuration for the escrow engine and its logging.
//!
//! Both configs have defaults and can be read from environment variables.

use crate::adapters::DEFAULT_EVENT_CAPACITY;
use crate::domain::{Address, ReplicationPolicy};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Value could not be parsed.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// Environment variable name
        var: &'static str,
        /// Parse failure
        reason: String,
    },
}

/// Escrow engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Ledger account the engine acts as (allowance spender, payout source).
    pub engine_account: Address,
    /// Capacity of the broadcast event channel.
    pub event_channel_capacity: usize,
    /// Behavior of `register_external_record` on an existing id.
    pub replication_policy: ReplicationPolicy,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            engine_account: [0xEEu8; 20],
            event_channel_capacity: DEFAULT_EVENT_CAPACITY,
            replication_policy: ReplicationPolicy::RejectConflicting,
        }
    }
}

impl EscrowConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HTLC_ENGINE_ACCOUNT`: 20-byte hex, optional `0x` prefix
    /// - `HTLC_EVENT_CAPACITY`: broadcast channel capacity (default: 1024)
    /// - `HTLC_REPLICATION_POLICY`: `reject` or `overwrite` (default: reject)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("HTLC_ENGINE_ACCOUNT") {
            config.engine_account = parse_address(&raw).map_err(|reason| {
                ConfigError::InvalidValue {
                    var: "HTLC_ENGINE_ACCOUNT",
                    reason,
                }
            })?;
        }

        if let Ok(raw) = env::var("HTLC_EVENT_CAPACITY") {
            config.event_channel_capacity =
                raw.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidValue {
                        var: "HTLC_EVENT_CAPACITY",
                        reason: e.to_string(),
                    }
                })?;
        }

        if let Ok(raw) = env::var("HTLC_REPLICATION_POLICY") {
            config.replication_policy =
                raw.parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        var: "HTLC_REPLICATION_POLICY",
                        reason,
                    })?;
        }

        Ok(config)
    }

    /// Builder-style engine account override.
    pub fn with_engine_account(mut self, account: Address) -> Self {
        self.engine_account = account;
        self
    }

    /// Builder-style replication policy override.
    pub fn with_replication_policy(mut self, policy: ReplicationPolicy) -> Self {
        self.replication_policy = policy;
        self
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error, or full `EnvFilter` syntax).
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    ///
    /// - `HTLC_LOG_LEVEL` or `RUST_LOG`: log level (default: info)
    /// - `HTLC_JSON_LOGS`: `true`/`1` for JSON output (default: false)
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("HTLC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("HTLC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Parse a 20-byte hex address, `0x` prefix optional.
pub fn parse_address(raw: &str) -> Result<Address, String> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    let mut out = [0u8; 20];
    hex::decode_to_slice(raw, &mut out).map_err(|e| e.to_string())?;
    Ok(out)
}
