//! Project-local visibility rules for file listings.
//!
//! This crate provides:
//! - A reloadable store compiling `.veilhide` (gitignore syntax) into a matcher
//! - Fail-open single-path and batch visibility queries
//! - Hot-reload of the rules file via a `notify` watcher
//! - A controller bundling all three per project root

pub mod controller;
pub mod filter;
pub mod store;
pub mod watcher;

pub use controller::HideController;
pub use filter::{PathError, VisibilityFilter};
pub use store::{ReloadError, ReloadStatus, RuleSet, RuleStore};
pub use watcher::{ChangeWatcher, RulesFileEvent, WatchError, WatchState};
