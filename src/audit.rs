//! Append-only log for messages nothing matched.
//!
//! Not an error path: an unmatched message is a recognized outcome,
//! logged here for later catalog curation. One JSON object per line.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

/// One unknown-message entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct UnknownEntry {
    pub from: String,
    pub text: String,
    pub timestamp: chrono::DateTime<Utc>,
}

/// Appends unmatched inbound messages to a JSON-lines file.
pub struct UnknownMessageLog {
    path: PathBuf,
}

impl UnknownMessageLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one entry. IO failures are the caller's to log — never
    /// to surface to the platform.
    pub async fn append(&self, from: &str, text: &str) -> std::io::Result<()> {
        let entry = UnknownEntry {
            from: from.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        let mut line = serde_json::to_string(&entry).map_err(std::io::Error::other)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
