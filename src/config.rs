//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Graph API base URL (overridable for tests via GRAPH_API_BASE).
pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.facebook.com/v20.0";

/// Bot configuration, read from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Token the platform echoes during the GET verification handshake.
    pub verify_token: String,
    /// Bearer token for the WhatsApp Cloud API.
    pub access_token: SecretString,
    /// Phone number id the outbound endpoint is templated with.
    pub phone_number_id: String,
    /// Optional operator contact that completed questionnaires are forwarded to.
    pub operator_contact: Option<String>,
    /// Path to the hot-reloadable reply catalog file.
    pub catalog_path: PathBuf,
    /// Append-only log for messages nothing matched.
    pub unknown_log_path: PathBuf,
    /// HTTP listen port.
    pub port: u16,
    /// Graph API base URL.
    pub graph_api_base: String,
    /// How often the catalog file is polled for changes.
    pub catalog_poll_interval: Duration,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// VERIFY_TOKEN, WHATSAPP_TOKEN and PHONE_NUMBER_ID are required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let verify_token = require("VERIFY_TOKEN")?;
        let access_token = SecretString::from(require("WHATSAPP_TOKEN")?);
        let phone_number_id = require("PHONE_NUMBER_ID")?;

        let operator_contact = std::env::var("OPERATOR_WA_ID")
            .ok()
            .filter(|s| !s.is_empty());

        let catalog_path =
            PathBuf::from(std::env::var("REPLIES_PATH").unwrap_or_else(|_| "replies.json".into()));
        let unknown_log_path = PathBuf::from(
            std::env::var("UNKNOWN_LOG_PATH").unwrap_or_else(|_| "unknown_messages.log".into()),
        );

        let port = parse_var("PORT", 5000)?;
        let poll_secs: u64 = parse_var("CATALOG_POLL_SECS", 2)?;

        let graph_api_base = std::env::var("GRAPH_API_BASE")
            .unwrap_or_else(|_| DEFAULT_GRAPH_API_BASE.to_string());

        Ok(Self {
            verify_token,
            access_token,
            phone_number_id,
            operator_contact,
            catalog_path,
            unknown_log_path,
            port,
            graph_api_base,
            catalog_poll_interval: Duration::from_secs(poll_secs),
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{e}"),
        }),
        Err(_) => Ok(default),
    }
}
