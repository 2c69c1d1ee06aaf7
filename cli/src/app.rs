//! Production adapters, built once per process.
//!
//! `AppContext` is constructed in `Cli::run()` and passed as `&AppContext`
//! to the command handler.

use crate::infra::{CrontabTable, HttpKeySource, SystemHost, TokioCommandRunner};

/// Production implementations of every port the sync use-case needs.
pub struct AppContext {
    /// Key server client.
    pub source: HttpKeySource,
    /// Local accounts, privilege, ownership and filesystem.
    pub host: SystemHost,
    /// The invoking user's crontab.
    pub table: CrontabTable<TokioCommandRunner>,
}

impl AppContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: HttpKeySource::default(),
            host: SystemHost,
            table: CrontabTable::new(TokioCommandRunner::default()),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
