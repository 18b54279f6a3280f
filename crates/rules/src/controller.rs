//! [`HideController`]: one store, filter and watcher per project root.

use std::path::{Path, PathBuf};

use tracing::warn;

use veil_core::{VeilConfig, WatchConfig};

use crate::filter::VisibilityFilter;
use crate::store::{ReloadStatus, RuleStore};
use crate::watcher::{ChangeWatcher, WatchState};

/// Hide rules for a project root with live reload.
///
/// Lifecycle: [`new`](Self::new) (no I/O) → [`initialize`](Self::initialize)
/// → queries → [`dispose`](Self::dispose). Dropping the controller disposes it.
#[derive(Debug)]
pub struct HideController {
    filter: VisibilityFilter,
    watcher: ChangeWatcher,
}

impl HideController {
    /// Bind to `project_root` and start watching the rules file.
    ///
    /// When watching is enabled but cannot be armed (no tokio runtime, notify
    /// failure) the controller still works; it just never reloads on its own.
    pub fn new(project_root: impl Into<PathBuf>, watch: WatchConfig) -> Self {
        let store = RuleStore::new(project_root);
        let mut watcher = ChangeWatcher::new(store.clone(), watch.clone());
        if watch.enabled {
            if let Err(e) = watcher.arm() {
                warn!(
                    path = %store.rules_path().display(),
                    error = %e,
                    "failed to watch rules file, changes need an explicit reload"
                );
            }
        }
        Self {
            filter: store.filter(),
            watcher,
        }
    }

    pub fn from_config(config: &VeilConfig) -> Self {
        Self::new(config.project_root.clone(), config.watch.clone())
    }

    /// Load the rules file. Must run before queries reflect on-disk rules.
    pub async fn initialize(&self) -> ReloadStatus {
        self.store().initialize().await
    }

    pub async fn reload(&self) -> ReloadStatus {
        self.store().reload().await
    }

    pub fn should_show(&self, path: impl AsRef<Path>) -> bool {
        self.filter.should_show(path)
    }

    pub fn filter_paths<P>(&self, paths: &[P]) -> Vec<P>
    where
        P: AsRef<Path> + Clone,
    {
        self.filter.filter_paths(paths)
    }

    pub fn filter(&self) -> &VisibilityFilter {
        &self.filter
    }

    pub fn store(&self) -> &RuleStore {
        self.filter.store()
    }

    pub fn watch_state(&self) -> WatchState {
        self.watcher.state()
    }

    /// Stop watching the rules file. Idempotent.
    pub fn dispose(&mut self) {
        self.watcher.dispose();
    }
}
