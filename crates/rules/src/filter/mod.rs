//! Visibility queries over a [`RuleStore`].
//!
//! Every failure degrades toward showing the path: an unclassifiable path is
//! shown, and a batch whose filtering breaks is returned unfiltered.

mod path;


use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{error, trace};

use crate::store::{RuleSet, RuleStore};

pub(crate) use self::path::lexical_clean;
pub use self::path::{normalize, PathError};

/// Answers "should this path be listed?" against the store's current rules.
///
/// Holds no state of its own; each query reads the store's latest snapshot.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    store: RuleStore,
}

impl VisibilityFilter {
    pub fn new(store: RuleStore) -> Self {
        Self { store }
    }

    /// `false` only when a loaded rule hides the path.
    ///
    /// `path` may be relative to the project root or absolute. Paths outside
    /// the root, the root itself and non-UTF-8 paths are always shown.
    pub fn should_show(&self, path: impl AsRef<Path>) -> bool {
        let rules = self.store.snapshot();
        self.show_in(&rules, path.as_ref())
    }

    /// Keep the paths that should be shown, in their original order.
    ///
    /// The whole batch is evaluated against a single rule generation. If
    /// filtering fails internally the input is returned unfiltered.
    pub fn filter_paths<P>(&self, paths: &[P]) -> Vec<P>
    where
        P: AsRef<Path> + Clone,
    {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            let rules = self.store.snapshot();
            paths
                .iter()
                .filter(|p| self.show_in(&rules, p.as_ref()))
                .cloned()
                .collect::<Vec<_>>()
        }));

        match attempt {
            Ok(visible) => visible,
            Err(payload) => {
                error!(
                    count = paths.len(),
                    error = %panic_message(&*payload),
                    "error filtering paths, returning them unfiltered"
                );
                paths.to_vec()
            }
        }
    }

    /// Root-relative form the matcher sees for `path`.
    pub fn normalize(&self, path: impl AsRef<Path>) -> Result<String, PathError> {
        normalize(self.store.project_root(), path.as_ref())
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    fn show_in(&self, rules: &RuleSet, path: &Path) -> bool {
        if !rules.has_rules() {
            return true;
        }
        match normalize(self.store.project_root(), path) {
            Ok(relative) => !rules.is_hidden(&relative),
            Err(e) => {
                trace!(path = %path.display(), error = %e, "showing unclassifiable path");
                true
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
