//! Error types for waflow.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Send error: {0}")]
    Send(#[from] SendError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Reply catalog load errors.
///
/// Never fatal: a failed reload keeps the previous catalog, a failed
/// initial load starts with an empty one (everything goes unmatched).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outbound send errors.
///
/// Caught and logged at the dispatch boundary — the inbound webhook
/// always acknowledges the platform regardless of delivery outcome.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Request failed: {reason}")]
    Request { reason: String },

    #[error("WhatsApp API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
