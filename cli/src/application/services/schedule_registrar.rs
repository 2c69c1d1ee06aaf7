//! Register and deregister the periodic sync in crontab.

use crate::application::ports::{JobTable, PrivilegeProbe};
use crate::domain::config::redact;
use crate::domain::schedule::{self, InvocationSpec, UninstallPlan};
use crate::domain::ScheduleError;

/// What `uninstall` found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The user had no crontab at all.
    NoTable,
    /// A crontab exists but holds no entry of ours.
    NothingToRemove,
    /// Our entry was removed; other entries were kept.
    Rewritten,
    /// Our entry was the only content; the crontab was removed.
    Cleared,
}

/// Replace any existing entry of ours with one for `spec`.
///
/// Returns the installed cron line.
///
/// # Errors
///
/// `PrivilegeRequired` before touching the table when not elevated, otherwise
/// whatever the job table reports.
pub async fn install(
    privilege: &impl PrivilegeProbe,
    table: &impl JobTable,
    spec: &InvocationSpec,
) -> Result<String, ScheduleError> {
    if !privilege.is_elevated() {
        return Err(ScheduleError::PrivilegeRequired("install"));
    }
    let current = table.read().await?.unwrap_or_default();
    warn_stale(&current, &spec.program_token());
    let next = schedule::plan_install(&current, spec);
    table.write(&next).await?;

    let entry = spec.cron_entry();
    tracing::info!("Cron job installed successfully");
    tracing::info!(entry = %redact(&entry, &spec.credential), "Cron entry");
    Ok(entry)
}

/// Remove every entry of ours, keeping the rest of the table.
///
/// # Errors
///
/// `PrivilegeRequired` before touching the table when not elevated, otherwise
/// whatever the job table reports.
pub async fn uninstall(
    privilege: &impl PrivilegeProbe,
    table: &impl JobTable,
    program_token: &str,
) -> Result<UninstallOutcome, ScheduleError> {
    if !privilege.is_elevated() {
        return Err(ScheduleError::PrivilegeRequired("uninstall"));
    }
    let Some(current) = table.read().await? else {
        tracing::info!("No crontab found");
        return Ok(UninstallOutcome::NoTable);
    };

    warn_stale(&current, program_token);
    match schedule::plan_uninstall(&current, program_token) {
        UninstallPlan::Unchanged => {
            tracing::info!("No cron job to uninstall");
            Ok(UninstallOutcome::NothingToRemove)
        }
        UninstallPlan::Rewrite(next) => {
            table.write(&next).await?;
            tracing::info!("Cron job uninstalled successfully");
            Ok(UninstallOutcome::Rewritten)
        }
        UninstallPlan::Clear => {
            table.clear().await?;
            tracing::info!("Cron job uninstalled (crontab is now empty)");
            Ok(UninstallOutcome::Cleared)
        }
    }
}

/// The entries are dropped either way; their text may hold an old credential.
fn warn_stale(table: &str, program_token: &str) {
    let stale = schedule::stale_entries(table, program_token).len();
    if stale > 0 {
        tracing::warn!(
            count = stale,
            program = program_token,
            "Removing cron entry written by this tool from a different program path"
        );
    }
}
