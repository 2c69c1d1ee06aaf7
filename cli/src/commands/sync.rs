//! Fetch the group's keys, update each account, then manage the cron entry.

use std::process::ExitCode;

use crate::app::AppContext;
use crate::application::services::sync;
use crate::domain::SyncConfig;

/// Run one sync and map the outcome to a process exit code.
///
/// Fatal outcomes are logged here so they reach the log file as well as the
/// terminal.
pub async fn run(app: &AppContext, config: &SyncConfig) -> ExitCode {
    match sync::run(config, &app.source, &app.host, &app.table).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
