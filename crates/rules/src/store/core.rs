//! Core [`RuleStore`] struct: owns the current rule snapshot and reloads it from disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use veil_core::RULES_FILE_NAME;

use super::error::{ReloadStatus, Result};
use super::rule_set::RuleSet;
use crate::filter::{lexical_clean, VisibilityFilter};

/// Hide rules for one project root, reloadable from `<root>/.veilhide`.
///
/// Cloning is cheap and every clone shares the same snapshot, so the watcher
/// task and query callers can each hold one.
#[derive(Debug, Clone)]
pub struct RuleStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    project_root: PathBuf,
    rules_path: PathBuf,
    current: RwLock<Arc<RuleSet>>,
}

impl RuleStore {
    /// Create a store bound to `project_root`.
    ///
    /// Performs no I/O: the store starts with no rules (everything visible)
    /// until [`initialize`](Self::initialize) runs. A relative root is made
    /// absolute against the current directory.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let root = project_root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        let project_root = lexical_clean(&root);
        let rules_path = project_root.join(RULES_FILE_NAME);
        Self {
            inner: Arc::new(Inner {
                project_root,
                rules_path,
                current: RwLock::new(Arc::new(RuleSet::empty(ReloadStatus::Missing))),
            }),
        }
    }

    /// Perform the first load. Safe to call again; each call is a full reload.
    pub async fn initialize(&self) -> ReloadStatus {
        self.reload().await
    }

    /// Rebuild the matcher from the rules file and publish it.
    ///
    /// Never fails: a missing file publishes an empty rule set, and any read
    /// or compile error is logged, recorded in the returned status and also
    /// publishes an empty rule set.
    pub async fn reload(&self) -> ReloadStatus {
        let path = &self.inner.rules_path;
        let next = match self.read_rules().await {
            Ok(Some(text)) => match RuleSet::compile(&self.inner.project_root, text) {
                Ok(rules) => rules,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to compile hide rules, showing all paths");
                    RuleSet::empty(ReloadStatus::Failed {
                        error: e.to_string(),
                    })
                }
            },
            Ok(None) => {
                debug!(path = %path.display(), "no rules file, showing all paths");
                RuleSet::empty(ReloadStatus::Missing)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read rules file, showing all paths");
                RuleSet::empty(ReloadStatus::Failed {
                    error: e.to_string(),
                })
            }
        };

        let status = next.status().clone();
        let generation = self.publish(next);
        if let ReloadStatus::Loaded { rule_count, skipped } = &status {
            info!(
                path = %path.display(),
                rules = rule_count,
                skipped = skipped,
                generation = generation,
                "loaded hide rules"
            );
        }
        status
    }

    /// Read the rules file, treating a file that vanishes mid-read as absent.
    async fn read_rules(&self) -> Result<Option<String>> {
        let path = &self.inner.rules_path;
        if !tokio::fs::try_exists(path).await? {
            return Ok(None);
        }
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Swap in a new snapshot. Text and matcher become visible together.
    fn publish(&self, mut next: RuleSet) -> u64 {
        let mut current = self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        next.generation = current.generation() + 1;
        let generation = next.generation;
        *current = Arc::new(next);
        generation
    }

    /// The snapshot queries should evaluate against.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        let current = self
            .inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Rules file content at the last successful load.
    pub fn rule_text(&self) -> Option<String> {
        self.snapshot().text().map(str::to_string)
    }

    pub fn generation(&self) -> u64 {
        self.snapshot().generation()
    }

    /// Outcome of the most recently published reload.
    pub fn last_status(&self) -> ReloadStatus {
        self.snapshot().status().clone()
    }

    pub fn project_root(&self) -> &Path {
        &self.inner.project_root
    }

    pub fn rules_path(&self) -> &Path {
        &self.inner.rules_path
    }

    /// Query layer over this store.
    pub fn filter(&self) -> VisibilityFilter {
        VisibilityFilter::new(self.clone())
    }
}
