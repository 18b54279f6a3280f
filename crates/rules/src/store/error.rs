//! Error types and reload outcomes for the rule store.

/// Errors that can occur while reading or compiling the rules file.
///
/// These never escape [`RuleStore::reload`](super::RuleStore::reload); they are
/// logged and recorded as [`ReloadStatus::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The compiled matcher could not be built.
    #[error("matcher build error: {0}")]
    Matcher(#[from] ignore::Error),
}

/// Result alias for reload internals.
pub type Result<T> = std::result::Result<T, ReloadError>;

/// Outcome of the reload that produced a rule snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadStatus {
    /// Rules file was read and compiled.
    Loaded {
        /// Patterns taken from the file (the implicit self rule is not counted).
        rule_count: usize,
        /// Lines rejected by the pattern compiler.
        skipped: usize,
    },
    /// No rules file at the project root.
    Missing,
    /// Reading or compiling failed; everything is visible until the next reload.
    Failed { error: String },
}

impl ReloadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ReloadStatus::Loaded { .. })
    }
}
