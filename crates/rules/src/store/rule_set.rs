//! Immutable compiled snapshot of the rules file.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::warn;

use veil_core::RULES_FILE_NAME;

use super::error::{ReloadStatus, Result};

/// One generation of hide rules: the raw text and the matcher compiled from it.
///
/// Snapshots are never mutated after publication. A reload builds a new one
/// from scratch and swaps it in whole, so text and matcher always agree.
#[derive(Debug)]
pub struct RuleSet {
    text: Option<String>,
    matcher: Gitignore,
    pub(super) generation: u64,
    status: ReloadStatus,
}

impl RuleSet {
    /// A snapshot that hides nothing.
    pub(super) fn empty(status: ReloadStatus) -> Self {
        Self {
            text: None,
            matcher: Gitignore::empty(),
            generation: 0,
            status,
        }
    }

    /// Compile rules file content into a fresh matcher rooted at `root`.
    ///
    /// Lines the pattern compiler rejects are skipped so one typo does not
    /// disable the rest of the file. The rules file itself is always appended
    /// last, so a negation in the file cannot re-include it.
    pub(super) fn compile(root: &Path, text: String) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let mut skipped = 0;

        for (idx, line) in text.lines().enumerate() {
            if let Err(e) = builder.add_line(None, line) {
                warn!(line = idx + 1, pattern = %line, error = %e, "skipping invalid hide pattern");
                skipped += 1;
            }
        }
        builder.add_line(None, RULES_FILE_NAME)?;

        let matcher = builder.build()?;
        let rule_count = matcher.len().saturating_sub(1);

        Ok(Self {
            text: Some(text),
            matcher,
            generation: 0,
            status: ReloadStatus::Loaded { rule_count, skipped },
        })
    }

    /// Verbatim rules file content, or `None` when no file was loaded.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Publication counter; strictly increases with every reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &ReloadStatus {
        &self.status
    }

    /// Whether queries need to consult the matcher at all.
    ///
    /// An absent or empty rules file hides nothing, not even itself.
    pub fn has_rules(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Check a normalized, root-relative, `/`-separated path.
    ///
    /// Parent directories are checked first, from the top down: once a
    /// directory is excluded nothing below it can be re-included, as in git.
    /// Otherwise the path itself decides, with later negations overriding
    /// earlier ignores.
    pub fn is_hidden(&self, relative: &str) -> bool {
        if !self.has_rules() {
            return false;
        }
        let path = relative.trim_end_matches('/');
        let excluded_parent = path
            .match_indices('/')
            .any(|(idx, _)| self.matcher.matched(&path[..idx], true).is_ignore());
        excluded_parent || self.matcher.matched(path, false).is_ignore()
    }
}
