//! Crontab entry rendering and table editing.
//!
//! Pure functions only. The table is read and written by
//! `crate::infra::crontab`; everything here works on the text.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Comment line placed directly above this tool's cron entry.
pub const CRON_MARKER: &str = "# GridBanner authorized_keys updater";

/// Run every minute.
pub const CRON_SCHEDULE: &str = "*/1 * * * *";

/// Log file the scheduled run appends to.
pub const DEFAULT_LOG_PATH: &str = "/var/log/gridbanner-keys-update.log";

/// Everything needed to repeat a sync from cron without any other state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    /// Absolute path of the executable cron should run.
    pub program: PathBuf,
    pub server: String,
    pub credential: String,
    pub group: String,
    /// Explicit account list, never empty.
    pub accounts: Vec<String>,
    pub log_path: PathBuf,
}

impl InvocationSpec {
    #[must_use]
    pub fn program_token(&self) -> String {
        program_token(&self.program)
    }

    /// Command line cron runs. Output goes to the redirected log, so the
    /// scheduled run does not open the log file itself.
    #[must_use]
    pub fn command_line(&self) -> String {
        let users = self.accounts.join(",");
        let args = [
            "--server",
            &self.server,
            "--key",
            &self.credential,
            "--group",
            &self.group,
            "--users",
            &users,
            "--no-log-file",
        ];
        let mut line = self.program_token();
        for arg in args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }

    /// Full cron line including schedule and output redirection.
    ///
    /// cron turns a bare `%` into a newline, so it is escaped.
    #[must_use]
    pub fn cron_entry(&self) -> String {
        format!(
            "{CRON_SCHEDULE} {} >> {} 2>&1",
            self.command_line(),
            shell_quote(&self.log_path.to_string_lossy())
        )
        .replace('%', "\\%")
    }
}

/// Program path as it appears in the cron line.
#[must_use]
pub fn program_token(program: &Path) -> String {
    shell_quote(&program.to_string_lossy()).into_owned()
}

/// Single-quotes `arg` for `/bin/sh` when it contains anything but safe characters.
#[must_use]
pub fn shell_quote(arg: &str) -> Cow<'_, str> {
    let safe = !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_./:=,@+".contains(&b));
    if safe {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

/// Returns `true` if `line` was written by this tool: the exact marker
/// comment, or a line carrying `program_token` as a whole word.
///
/// This alone misses an entry whose binary has since moved; `strip_owned`
/// also claims the entry line directly under a marker.
#[must_use]
pub fn is_owned_line(line: &str, program_token: &str) -> bool {
    is_marker(line) || contains_word(line, program_token)
}

fn is_marker(line: &str) -> bool {
    line.trim() == CRON_MARKER
}

/// A job line, as opposed to a blank line or a comment.
fn is_job_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

/// `word` occurs in `line` delimited by whitespace or the line ends.
fn contains_word(line: &str, word: &str) -> bool {
    !word.is_empty()
        && line.match_indices(word).any(|(i, _)| {
            let before = line[..i].chars().next_back();
            let after = line[i + word.len()..].chars().next();
            before.is_none_or(|c| c.is_whitespace()) && after.is_none_or(|c| c.is_whitespace())
        })
}

/// Lines of `table` not owned by this tool, and how many were dropped.
///
/// Owned lines are those `is_owned_line` accepts plus the job line directly
/// under a marker, whatever program it runs.
#[must_use]
pub fn strip_owned<'a>(table: &'a str, program_token: &str) -> (Vec<&'a str>, usize) {
    let mut kept = Vec::new();
    let mut removed = 0;
    let mut after_marker = false;
    for line in table.lines() {
        if is_owned_line(line, program_token) || (after_marker && is_job_line(line)) {
            removed += 1;
        } else {
            kept.push(line);
        }
        after_marker = is_marker(line);
    }
    (kept, removed)
}

/// Job lines under a marker that run some other program than `program_token`,
/// typically left behind when the binary was moved.
#[must_use]
pub fn stale_entries<'a>(table: &'a str, program_token: &str) -> Vec<&'a str> {
    table
        .lines()
        .zip(table.lines().skip(1))
        .filter(|(prev, line)| {
            is_marker(prev) && is_job_line(line) && !contains_word(line, program_token)
        })
        .map(|(_, line)| line)
        .collect()
}

/// New table content with exactly one entry for `spec`.
#[must_use]
pub fn plan_install(current: &str, spec: &InvocationSpec) -> String {
    let (kept, _) = strip_owned(current, &spec.program_token());
    let joined = kept.join("\n");
    let mut table = joined.trim().to_string();
    if !table.is_empty() {
        table.push('\n');
    }
    table.push_str(CRON_MARKER);
    table.push('\n');
    table.push_str(&spec.cron_entry());
    table.push('\n');
    table
}

/// What `uninstall` has to do to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallPlan {
    /// Nothing of ours in the table.
    Unchanged,
    /// Write back the remaining entries.
    Rewrite(String),
    /// Only our entries were present; remove the table.
    Clear,
}

#[must_use]
pub fn plan_uninstall(current: &str, program_token: &str) -> UninstallPlan {
    let (kept, removed) = strip_owned(current, program_token);
    if removed == 0 {
        return UninstallPlan::Unchanged;
    }
    let joined = kept.join("\n");
    let remaining = joined.trim();
    if remaining.is_empty() {
        UninstallPlan::Clear
    } else {
        UninstallPlan::Rewrite(format!("{remaining}\n"))
    }
}
