//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the store over the configured document (fatal on failure)
//! - Start the document watcher when configured
//!
//! # Design Decisions
//! - Fail fast: the service never serves without a valid base document
//! - A watcher that cannot start is logged, not fatal; the store still works

use std::path::Path;
use std::sync::Arc;

use notify::RecommendedWatcher;

use crate::config::watcher::DocumentWatcher;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::persistence::YamlFileStorage;
use crate::store::{ConfigStore, ReloadPolicy};

/// Load the base document from `config.path`.
pub fn open_store(config: &StoreConfig) -> Result<Arc<ConfigStore>, StoreError> {
    let storage = Arc::new(YamlFileStorage::new(&config.path));
    let store = ConfigStore::open(storage, config.reload)?;
    Ok(Arc::new(store))
}

/// Start the document watcher if the configuration asks for one.
/// The returned handle must be held for the watcher to keep running.
pub fn start_watcher(
    config: &StoreConfig,
    store: &Arc<ConfigStore>,
) -> Option<RecommendedWatcher> {
    if !config.watch || config.reload != ReloadPolicy::Cached {
        return None;
    }
    match DocumentWatcher::new(Path::new(&config.path), store.clone()).run() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::error!(error = %e, path = %config.path, "Failed to start document watcher");
            None
        }
    }
}
