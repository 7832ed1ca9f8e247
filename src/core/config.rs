//! Configuration management for the MCP server.
//!
//! Configuration is read once at process entry into an immutable [`Config`]
//! and handed to every component that needs it. Nothing reads the
//! environment at call time.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::tools::definitions::holidays::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default payment network.
pub const DEFAULT_NETWORK: &str = "sepolia";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Holiday API client configuration.
    pub upstream: UpstreamConfig,

    /// Payment gate configuration.
    pub payment: PaymentConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients and by `/health`.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Holiday API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL every endpoint template is resolved against.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Payment gate configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Address that receives payments.
    pub server_address: String,

    /// Operator signing key.
    #[serde(skip_serializing)]
    pub operator_private_key: Option<String>,

    /// Payment network name.
    pub network: String,

    /// When true, payments are checked for shape only and never settled.
    pub testing_mode: bool,

    /// Facilitator that verifies and settles payments.
    pub facilitator_url: Option<String>,

    /// Bearer token sent to the facilitator.
    #[serde(skip_serializing)]
    pub facilitator_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("server_address", &self.server_address)
            .field(
                "operator_private_key",
                &self.operator_private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("network", &self.network)
            .field("testing_mode", &self.testing_mode)
            .field("facilitator_url", &self.facilitator_url)
            .field(
                "facilitator_api_key",
                &self.facilitator_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Where the configured facilitator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilitatorLocation {
    Local,
    Remote,
}

impl PaymentConfig {
    /// Classify the facilitator URL, if one is configured.
    pub fn facilitator_location(&self) -> Option<FacilitatorLocation> {
        self.facilitator_url.as_deref().map(|url| {
            let local = ["localhost", "127.0.0.1", "host.docker.internal"]
                .iter()
                .any(|host| url.contains(host));
            if local {
                FacilitatorLocation::Local
            } else {
                FacilitatorLocation::Remote
            }
        })
    }

    /// Log the payment configuration without exposing secrets.
    pub fn log_summary(&self) {
        info!("Payment configuration:");
        info!("  Server Address: {}", self.server_address);
        info!("  Network: {}", self.network);
        info!(
            "  Operator Key: {}",
            if self.operator_private_key.is_some() {
                "set"
            } else {
                "not set"
            }
        );
        if self.testing_mode {
            warn!("  Testing Mode: ENABLED (facilitator bypassed, payments are not settled)");
        } else {
            info!("  Testing Mode: disabled");
        }

        match (self.facilitator_url.as_deref(), self.facilitator_location()) {
            (Some(url), Some(FacilitatorLocation::Local)) => {
                info!("  Facilitator: {} (local, development)", url)
            }
            (Some(url), _) => info!("  Facilitator: {} (remote)", url),
            (None, _) => warn!("  Facilitator: none"),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_address = var("SERVER_ADDRESS")
            .ok_or_else(|| Error::config("SERVER_ADDRESS required for payment protocol"))?;

        let testing_mode = var("D402_TESTING_MODE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let facilitator_url = var("FACILITATOR_URL").or_else(|| var("D402_FACILITATOR_URL"));
        if facilitator_url.is_none() && !testing_mode {
            return Err(Error::config(
                "Set FACILITATOR_URL or enable D402_TESTING_MODE=true",
            ));
        }

        let payment = PaymentConfig {
            server_address,
            operator_private_key: var("MCP_OPERATOR_PRIVATE_KEY"),
            network: var("NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
            testing_mode,
            facilitator_url,
            facilitator_api_key: var("D402_FACILITATOR_API_KEY"),
        };

        let timeout_secs = match var("NAGER_DATE_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| {
                Error::config(format!("NAGER_DATE_TIMEOUT_SECS must be an integer, got '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(Error::config("NAGER_DATE_TIMEOUT_SECS must be at least 1"));
        }

        let upstream = UpstreamConfig {
            base_url: var("NAGER_DATE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs,
        };

        Ok(Self {
            server: ServerConfig {
                name: var("MCP_SERVER_NAME").unwrap_or_else(|| "nager-date-mcp-server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            transport: TransportConfig::from_lookup(&var)?,
            upstream,
            payment,
        })
    }

    /// Configuration for unit tests: testing mode, no facilitator.
    #[cfg(test)]
    pub(crate) fn for_testing() -> Self {
        Self::from_lookup(|key| match key {
            "SERVER_ADDRESS" => Some("0x1111111111111111111111111111111111111111".to_string()),
            "D402_TESTING_MODE" => Some("true".to_string()),
            _ => None,
        })
        .expect("testing configuration is valid")
    }
}
