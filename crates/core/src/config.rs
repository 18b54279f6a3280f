use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VeilError};

/// Reserved name of the project-local rules file.
pub const RULES_FILE_NAME: &str = ".veilhide";

/// Default notify poll interval (only used by polling backends).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    lookup(key).filter(|s| !s.is_empty())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(VeilError::Config {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|e| VeilError::Config {
        key: key.to_string(),
        message: format!("expected an unsigned integer, got '{}': {}", value, e),
    })
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Directory holding the rules file; all queried paths resolve against it.
    pub project_root: PathBuf,
    pub watch: WatchConfig,
}

impl VeilConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    ///
    /// Malformed values are logged and replaced by their defaults. Use
    /// [`try_from_env`](Self::try_from_env) to surface them instead.
    pub fn from_env() -> Self {
        match Self::try_from_env() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "invalid veil configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Build config from environment variables, rejecting malformed values.
    ///
    /// Profile is read from `VEIL_PROFILE`. When set (e.g. `CI`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn try_from_env() -> Result<Self> {
        let profile = env_opt("VEIL_PROFILE").unwrap_or_default();
        Self::from_lookup(&profile, env_opt)
    }

    /// Build config for a profile from an arbitrary key lookup.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        let project_root = profiled_opt(&lookup, &p, "VEIL_PROJECT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(default_project_root);
        Ok(Self {
            profile: p.clone(),
            project_root,
            watch: WatchConfig::from_lookup(&lookup, &p)?,
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  project_root: {}", self.project_root.display());
        tracing::info!(
            "  watch:        enabled={}, poll_interval_ms={}",
            self.watch.enabled,
            self.watch.poll_interval_ms
        );
    }
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            project_root: default_project_root(),
            watch: WatchConfig::default(),
        }
    }
}

fn default_project_root() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ── Watch ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Reload rules when the rules file changes on disk.
    pub enabled: bool,
    pub poll_interval_ms: u64,
}

impl WatchConfig {
    fn from_lookup<F>(lookup: &F, p: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = match profiled_opt(lookup, p, "VEIL_WATCH") {
            Some(v) => parse_bool("VEIL_WATCH", &v)?,
            None => true,
        };
        let poll_interval_ms = match profiled_opt(lookup, p, "VEIL_WATCH_POLL_MS") {
            Some(v) => parse_u64("VEIL_WATCH_POLL_MS", &v)?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };
        if poll_interval_ms == 0 {
            return Err(VeilError::Config {
                key: "VEIL_WATCH_POLL_MS".to_string(),
                message: "poll interval must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            enabled,
            poll_interval_ms,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
