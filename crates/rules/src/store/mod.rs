//! Rule store: compiles `.veilhide` into a gitignore matcher and swaps it in on reload.
//!
//! Every reload rebuilds the matcher from the full file content and publishes
//! text and matcher together as one immutable [`RuleSet`].

mod core;
mod error;
mod rule_set;


pub use self::core::RuleStore;
pub use self::error::{ReloadError, ReloadStatus, Result};
pub use self::rule_set::RuleSet;
