//! The sync use-case.
//!
//! Fetch once, reconcile every account in input order, then optionally
//! (re)install the cron entry. `--uninstall` short-circuits all of it.

use crate::application::ports::{HostAccess, JobTable, KeySource};
use crate::application::services::key_reconcile;
use crate::application::services::schedule_registrar::{self, UninstallOutcome};
use crate::domain::schedule::program_token;
use crate::domain::{ReconcileError, ReconcileReport, ScheduleAction, SyncConfig, SyncError};

/// One account that could not be reconciled.
#[derive(Debug)]
pub struct AccountFailure {
    pub account: String,
    pub error: ReconcileError,
}

/// Per-account tally of a sync run, in input order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub updated: Vec<ReconcileReport>,
    pub failures: Vec<AccountFailure>,
    /// Cron line written when `--install` was requested.
    pub installed_entry: Option<String>,
}

impl SyncReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.updated.len() + self.failures.len()
    }
}

/// How a non-fatal run ended.
#[derive(Debug)]
pub enum SyncOutcome {
    Uninstalled(UninstallOutcome),
    Synced(SyncReport),
}

/// Run one sync according to `config`.
///
/// # Errors
///
/// Fetch and schedule failures are fatal, as is a run where no account could
/// be updated. Per-account failures are collected in the report instead.
pub async fn run(
    config: &SyncConfig,
    source: &impl KeySource,
    host: &impl HostAccess,
    table: &impl JobTable,
) -> Result<SyncOutcome, SyncError> {
    if config.schedule == ScheduleAction::Uninstall {
        let token = program_token(&config.program);
        let outcome = schedule_registrar::uninstall(host, table, &token).await?;
        return Ok(SyncOutcome::Uninstalled(outcome));
    }

    let payload = source
        .fetch(&config.server, &config.credential, &config.group)
        .await?;

    let mut report = SyncReport::default();
    for account in &config.accounts {
        match key_reconcile::apply(host, &config.layout, account, &payload) {
            Ok(updated) => report.updated.push(updated),
            Err(error) => {
                tracing::error!(account = %account, kind = error.kind(), "{error}");
                report.failures.push(AccountFailure {
                    account: account.clone(),
                    error,
                });
            }
        }
    }

    if report.updated.is_empty() {
        return Err(SyncError::NoAccountsUpdated {
            total: report.total(),
        });
    }
    tracing::info!(
        "Successfully updated keys for {}/{} user(s)",
        report.updated.len(),
        report.total()
    );

    if config.schedule == ScheduleAction::Install {
        let entry = schedule_registrar::install(host, table, &config.invocation()).await?;
        report.installed_entry = Some(entry);
    }

    Ok(SyncOutcome::Synced(report))
}
