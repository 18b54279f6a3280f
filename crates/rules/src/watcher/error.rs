//! Error types for the rules file watcher.

/// Errors that can occur while arming a [`ChangeWatcher`](super::ChangeWatcher).
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Filesystem watcher error.
    #[error("Notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// Arming needs a tokio runtime to run reloads on.
    #[error("no tokio runtime available to run reloads")]
    NoRuntime,

    /// The watcher was disposed and cannot be armed again.
    #[error("watcher has been disposed")]
    Disposed,
}

/// Result alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatchError>;
