//! Rules file watcher with hot-reload via `notify`.
//!
//! Watches the project root for create, modify and delete events on
//! `.veilhide` and reloads the owning [`RuleStore`](crate::store::RuleStore)
//! once per event.

mod core;
mod error;
mod events;


pub use self::core::{ChangeWatcher, WatchState};
pub use self::error::{Result, WatchError};
pub use self::events::RulesFileEvent;
