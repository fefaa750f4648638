//! Document watcher for external edits.
//!
//! With the cached reload policy the store does not look at the artifact
//! again after startup. This watcher reloads it when something else
//! rewrites the file (an operator, a deploy step).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::store::ConfigStore;

/// Watches the document file and reloads the store on change.
pub struct DocumentWatcher {
    path: PathBuf,
    store: Arc<ConfigStore>,
}

impl DocumentWatcher {
    pub fn new(path: &Path, store: Arc<ConfigStore>) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    ///
    /// Saves replace the file by rename, which drops a watch on the file
    /// itself, so the parent directory is watched and events are filtered.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = std::fs::canonicalize(&self.path)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let store = self.store;
        let target = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_document = event.paths.iter().any(|p| p == &target);
                    if touches_document && (event.kind.is_modify() || event.kind.is_create()) {
                        tracing::info!(path = %target.display(), "Document change detected, reloading");
                        if let Err(e) = store.reload() {
                            tracing::error!(
                                error = %e,
                                "Failed to reload document. Keeping current in-memory copy."
                            );
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Document watcher started");
        Ok(watcher)
    }
}
