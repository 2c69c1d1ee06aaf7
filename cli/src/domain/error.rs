//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Fetch errors ──────────────────────────────────────────────────────────────

/// Errors returned by the key source when fetching a group's key list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Group '{0}' not found on server")]
    GroupNotFound(String),

    #[error("Authentication failed - check admin key")]
    AuthFailed,

    #[error("Server returned HTTP {0}")]
    ServerError(u16),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl FetchError {
    /// Short machine-readable kind, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::GroupNotFound(_) => "group_not_found",
            Self::AuthFailed => "auth_failed",
            Self::ServerError(_) => "server_error",
            Self::NetworkError(_) => "network_error",
        }
    }
}

// ── Reconcile errors ──────────────────────────────────────────────────────────

/// Errors from replacing one account's `authorized_keys` artifact.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("User '{0}' not found")]
    UnknownAccount(String),

    #[error("Home directory for user '{account}' not found ({})", .path.display())]
    HomeMissing { account: String, path: PathBuf },

    #[error("Permission denied updating keys for user '{account}' ({}); run as root", .path.display())]
    PermissionDenied { account: String, path: PathBuf },

    #[error("Refusing to follow symlink at {} for user '{account}'", .path.display())]
    SymlinkRefused { account: String, path: PathBuf },

    #[error("Error updating keys for user '{account}': {detail}")]
    Io { account: String, detail: String },
}

impl ReconcileError {
    /// Short machine-readable kind, used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownAccount(_) => "unknown_account",
            Self::HomeMissing { .. } => "home_missing",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::SymlinkRefused { .. } => "symlink_refused",
            Self::Io { .. } => "io_error",
        }
    }
}

// ── Schedule errors ───────────────────────────────────────────────────────────

/// Errors from editing the host crontab.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Must run as root to {0} cron job")]
    PrivilegeRequired(&'static str),

    #[error("crontab command not found. Is cron installed?")]
    ToolingUnavailable,

    #[error("Error updating crontab: {0}")]
    Io(String),
}

// ── Sync errors ───────────────────────────────────────────────────────────────

/// Fatal outcomes of a whole sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to fetch authorized_keys from server: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to update keys for any user (0/{total})")]
    NoAccountsUpdated { total: usize },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
