//! Core [`ChangeWatcher`] struct: notify subscription driving store reloads.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use veil_core::{WatchConfig, RULES_FILE_NAME};

use super::error::{Result, WatchError};
use super::events::{classify, RulesFileEvent};
use crate::store::RuleStore;

/// Lifecycle state of a [`ChangeWatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Constructed, no subscription.
    Unarmed,
    /// Listening for changes to the rules file.
    Armed,
    /// Subscription released; terminal.
    Disposed,
}

enum Subscription {
    Unarmed,
    Armed {
        /// Held to keep the OS subscription alive.
        watcher: RecommendedWatcher,
        task: JoinHandle<()>,
    },
    Disposed,
}

/// Reloads a [`RuleStore`] whenever its rules file is created, changed or deleted.
///
/// The project root is watched non-recursively because the rules file may not
/// exist yet. Events are posted to a channel and a single task reloads the
/// store once per event, so watcher-driven reloads never overlap.
pub struct ChangeWatcher {
    store: RuleStore,
    config: WatchConfig,
    subscription: Subscription,
}

impl ChangeWatcher {
    /// Create an unarmed watcher. Performs no I/O.
    pub fn new(store: RuleStore, config: WatchConfig) -> Self {
        Self {
            store,
            config,
            subscription: Subscription::Unarmed,
        }
    }

    /// Start watching the rules file.
    ///
    /// Must be called from within a tokio runtime. Arming an armed watcher is
    /// a no-op; a disposed watcher cannot be re-armed.
    pub fn arm(&mut self) -> Result<()> {
        match self.subscription {
            Subscription::Armed { .. } => return Ok(()),
            Subscription::Disposed => return Err(WatchError::Disposed),
            Subscription::Unarmed => {}
        }

        let runtime = Handle::try_current().map_err(|_| WatchError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    if let Some(kind) = classify(&event, RULES_FILE_NAME) {
                        // Receiver is gone only after dispose.
                        let _ = tx.send(kind);
                    }
                }
                Err(e) => warn!(error = %e, "rules file watcher error"),
            },
        )?;
        let _ = watcher.configure(
            notify::Config::default().with_poll_interval(self.config.poll_interval()),
        );
        watcher.watch(self.store.project_root(), RecursiveMode::NonRecursive)?;

        let task = runtime.spawn(run_reloads(self.store.clone(), rx));

        info!(path = %self.store.rules_path().display(), "watching rules file for changes");
        self.subscription = Subscription::Armed { watcher, task };
        Ok(())
    }

    /// Release the subscription. Safe to call in any state, any number of times.
    pub fn dispose(&mut self) {
        match std::mem::replace(&mut self.subscription, Subscription::Disposed) {
            Subscription::Armed { watcher, task } => {
                drop(watcher);
                task.abort();
                info!(path = %self.store.rules_path().display(), "stopped watching rules file");
            }
            other => self.subscription = other,
        }
    }

    pub fn state(&self) -> WatchState {
        match self.subscription {
            Subscription::Unarmed => WatchState::Unarmed,
            Subscription::Armed { .. } => WatchState::Armed,
            Subscription::Disposed => WatchState::Disposed,
        }
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ChangeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeWatcher")
            .field("rules_path", &self.store.rules_path())
            .field("state", &self.state())
            .finish()
    }
}

/// Reload once per event, in arrival order, until the watcher is dropped.
async fn run_reloads(store: RuleStore, mut rx: mpsc::UnboundedReceiver<RulesFileEvent>) {
    while let Some(event) = rx.recv().await {
        debug!(?event, path = %store.rules_path().display(), "rules file event");
        store.reload().await;
    }
    debug!("rules file watcher channel closed");
}
