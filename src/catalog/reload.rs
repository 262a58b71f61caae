//! Hot-reloadable catalog handle.
//!
//! The matcher reads the catalog by current value on each request; a
//! reload swaps the whole `Arc<Catalog>` atomically, so readers never
//! observe a half-updated catalog. A background task polls the file's
//! mtime and reloads on change.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::catalog::model::Catalog;
use crate::error::CatalogError;

/// Swappable reference to the currently loaded catalog.
pub struct CatalogHandle {
    path: PathBuf,
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    /// Open a handle for `path`, loading the catalog immediately.
    ///
    /// A failed initial load logs a warning and starts with an empty
    /// catalog (all messages go unmatched until a reload succeeds).
    pub async fn open(path: PathBuf) -> Self {
        let catalog = match load(&path).await {
            Ok(catalog) => {
                info!(path = %path.display(), rules = catalog.len(), "Reply catalog loaded");
                catalog
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load reply catalog, starting empty");
                Catalog::empty()
            }
        };
        Self {
            path,
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Handle over a fixed in-memory catalog (no backing file to reload).
    pub fn fixed(catalog: Catalog) -> Self {
        Self {
            path: PathBuf::new(),
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog as of this moment. Cheap (Arc clone); the snapshot
    /// stays valid for the whole request even if a reload lands mid-way.
    pub async fn current(&self) -> Arc<Catalog> {
        Arc::clone(&*self.current.read().await)
    }

    /// Re-read the backing file and swap the catalog in.
    ///
    /// On failure the previous catalog is retained.
    pub async fn reload(&self) {
        match load(&self.path).await {
            Ok(catalog) => {
                info!(path = %self.path.display(), rules = catalog.len(), "Reply catalog reloaded");
                *self.current.write().await = Arc::new(catalog);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Catalog reload failed, keeping previous catalog");
            }
        }
    }

    fn mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
    }
}

async fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Spawn a task that polls the catalog file's mtime every `interval`
/// and reloads when it changes.
pub fn spawn_watch_task(handle: Arc<CatalogHandle>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_seen = handle.mtime();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let mtime = handle.mtime();
            if mtime != last_seen {
                last_seen = mtime;
                handle.reload().await;
            }
        }
    })
}
