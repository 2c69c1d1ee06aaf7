//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::logging`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{FetchError, KeyPayload, ScheduleError};

// ── Key Source Port ───────────────────────────────────────────────────────────

/// Fetches the authoritative key list for a directory group.
#[allow(async_fn_in_trait)]
pub trait KeySource {
    /// One GET, no retry. The body is returned verbatim on HTTP 200.
    async fn fetch(
        &self,
        server: &str,
        credential: &str,
        group: &str,
    ) -> std::result::Result<KeyPayload, FetchError>;
}

// ── Account Ports ─────────────────────────────────────────────────────────────

/// A user database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountEntry {
    pub name: String,
    pub home: PathBuf,
    pub uid: u32,
    pub gid: u32,
}

/// Outcome of a user database lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Found(AccountEntry),
    /// The database answered: no such user.
    NotFound,
    /// The database itself could not be queried.
    Unavailable(String),
}

/// Resolves account names against the system user database.
pub trait AccountDirectory {
    fn lookup(&self, name: &str) -> AccountLookup;
}

/// Reports whether the process runs with elevated privilege.
pub trait PrivilegeProbe {
    fn is_elevated(&self) -> bool;
}

/// Changes file ownership.
pub trait FileOwnership {
    /// Changes the owner of `path` itself; a symlink is not followed.
    ///
    /// # Errors
    ///
    /// Returns an error if the ownership change is refused by the OS.
    fn chown(&self, path: &Path, uid: u32, gid: u32) -> Result<()>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Raw file operations used by reconciliation.
///
/// None of these follow a symlink in the last path component: the artifacts
/// live in a directory the account owner controls, and the caller may be root.
/// Implementations keep the underlying `std::io::Error` in the error chain so
/// callers can classify permission failures.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// `true` if `path` itself is a symlink, whatever it points at.
    fn is_symlink(&self, path: &Path) -> bool;
    /// Create `path` (and missing parents) with `mode`. No-op if it is already a directory.
    fn create_dir(&self, path: &Path, mode: u32) -> Result<()>;
    /// Copy content, permission bits and timestamps, replacing `to`.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    /// Atomically replace `path` with a new file holding `content` at `mode`.
    fn replace(&self, path: &Path, content: &[u8], mode: u32) -> Result<()>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

/// Everything reconciliation needs from the host.
pub trait HostAccess: AccountDirectory + PrivilegeProbe + FileOwnership + LocalFs {}

/// Blanket implementation: any type implementing all four sub-traits is a `HostAccess`.
impl<T> HostAccess for T where T: AccountDirectory + PrivilegeProbe + FileOwnership + LocalFs {}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Job Table Port ────────────────────────────────────────────────────────────

/// The host's periodic-job table (the invoking user's crontab).
#[allow(async_fn_in_trait)]
pub trait JobTable {
    /// Current table, or `None` if the user has no table.
    async fn read(&self) -> std::result::Result<Option<String>, ScheduleError>;
    /// Replace the whole table.
    async fn write(&self, table: &str) -> std::result::Result<(), ScheduleError>;
    /// Remove the table entirely.
    async fn clear(&self) -> std::result::Result<(), ScheduleError>;
}
