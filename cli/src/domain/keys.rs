//! Authorized-keys domain types: payload, artifact layout, and reconcile results.
//!
//! Pure functions only; no I/O.

use std::path::{Path, PathBuf};

/// The sentinel account whose home directory is fixed rather than looked up.
pub const ROOT_ACCOUNT: &str = "root";

/// Default home of the `root` account.
pub const DEFAULT_ROOT_HOME: &str = "/root";

/// Default parent of regular account homes, used when the user database is unavailable.
pub const DEFAULT_HOME_ROOT: &str = "/home";

/// Mode of the `.ssh` directory (owner-only rwx).
pub const SSH_DIR_MODE: u32 = 0o700;

/// Mode of the `authorized_keys` file (owner-only rw).
pub const KEYS_FILE_MODE: u32 = 0o600;

/// Raw key list returned by the directory service. Written verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPayload(String);

impl KeyPayload {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where account homes live on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    /// Home directory of `root`.
    pub root_home: PathBuf,
    /// Parent directory for the `{home_root}/{account}` fallback.
    pub home_root: PathBuf,
}

impl Default for HomeLayout {
    fn default() -> Self {
        Self {
            root_home: PathBuf::from(DEFAULT_ROOT_HOME),
            home_root: PathBuf::from(DEFAULT_HOME_ROOT),
        }
    }
}

impl HomeLayout {
    /// Conventional home path for `account`, used only as a fallback.
    #[must_use]
    pub fn fallback_home(&self, account: &str) -> PathBuf {
        self.home_root.join(account)
    }
}

/// Paths making up one account's authorized-keys artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyArtifactPaths {
    pub ssh_dir: PathBuf,
    pub keys_file: PathBuf,
    pub backup_file: PathBuf,
}

impl KeyArtifactPaths {
    #[must_use]
    pub fn for_home(home: &Path) -> Self {
        let ssh_dir = home.join(".ssh");
        let keys_file = ssh_dir.join("authorized_keys");
        let backup_file = ssh_dir.join("authorized_keys.backup");
        Self {
            ssh_dir,
            keys_file,
            backup_file,
        }
    }
}

/// Result of the best-effort ownership step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipOutcome {
    /// Process is not elevated; ownership was left alone.
    Denied,
    /// Elevated, but the owner could not be resolved or `chown` failed.
    Unsupported,
    /// `.ssh` and `authorized_keys` now belong to the account.
    Applied,
}

/// What a successful reconciliation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub account: String,
    pub paths: KeyArtifactPaths,
    /// `true` when a previous `authorized_keys` was copied to the backup path.
    pub backed_up: bool,
    pub ownership: OwnershipOutcome,
}

/// Parses the comma-separated `--users` value; blanks are dropped.
///
/// Returns `[root]` when nothing usable is given.
#[must_use]
pub fn parse_accounts(raw: Option<&str>) -> Vec<String> {
    let accounts: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if accounts.is_empty() {
        vec![ROOT_ACCOUNT.to_string()]
    } else {
        accounts
    }
}
