//! Run configuration for one sync invocation.
//!
//! Pure data, assembled by `crate::cli` from flags and environment.

use std::path::PathBuf;

use crate::domain::keys::HomeLayout;
use crate::domain::schedule::{DEFAULT_LOG_PATH, InvocationSpec};

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_SERVER: &str = "https://umbonic-roseanna-cuppy.ngrok-free.dev";
pub const DEFAULT_GROUP: &str = "Developers";

// ── Config schema ────────────────────────────────────────────────────────────

/// What to do on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    /// Sync only.
    None,
    /// Sync, then (re)install the cron entry if any account succeeded.
    Install,
    /// Remove the cron entry; no sync.
    Uninstall,
}

/// Inputs to the orchestrator.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the key server.
    pub server: String,
    /// Opaque API key sent as `?key=` and `X-API-Key`.
    pub credential: String,
    /// Directory group whose keys are authoritative.
    pub group: String,
    /// Accounts to reconcile, in order. Never empty.
    pub accounts: Vec<String>,
    pub schedule: ScheduleAction,
    /// Executable path embedded in the cron entry.
    pub program: PathBuf,
    /// Log file the cron entry redirects into.
    pub log_path: PathBuf,
    pub layout: HomeLayout,
}

impl SyncConfig {
    /// Rebuilds the invocation cron needs to repeat this run.
    #[must_use]
    pub fn invocation(&self) -> InvocationSpec {
        InvocationSpec {
            program: self.program.clone(),
            server: self.server.clone(),
            credential: self.credential.clone(),
            group: self.group.clone(),
            accounts: self.accounts.clone(),
            log_path: self.log_path.clone(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            credential: String::new(),
            group: DEFAULT_GROUP.to_string(),
            accounts: vec![crate::domain::keys::ROOT_ACCOUNT.to_string()],
            schedule: ScheduleAction::None,
            program: PathBuf::from("gridbanner-keys"),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            layout: HomeLayout::default(),
        }
    }
}

/// Masks every occurrence of `secret` in `text` for logging.
#[must_use]
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        text.to_string()
    } else {
        text.replace(secret, "***")
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
