//! Crontab infrastructure. Implements `JobTable` by shelling out to `crontab`.

use anyhow::Error;

use crate::application::ports::{CommandRunner, JobTable};
use crate::domain::ScheduleError;
use crate::infra::command_runner::TokioCommandRunner;

/// The invoking user's crontab.
pub struct CrontabTable<R: CommandRunner = TokioCommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> CrontabTable<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, "crontab")
    }

    /// Use a different `crontab` binary (tests, non-standard installs).
    #[must_use]
    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }
}

impl<R: CommandRunner> JobTable for CrontabTable<R> {
    async fn read(&self) -> Result<Option<String>, ScheduleError> {
        let output = self
            .runner
            .run(&self.program, &["-l"])
            .await
            .map_err(spawn_error)?;
        // `crontab -l` exits non-zero when the user has no table.
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    async fn write(&self, table: &str) -> Result<(), ScheduleError> {
        let output = self
            .runner
            .run_with_stdin(&self.program, &["-"], table.as_bytes())
            .await
            .map_err(spawn_error)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ScheduleError::Io(format!(
                "Failed to install cron job: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    async fn clear(&self) -> Result<(), ScheduleError> {
        let output = self
            .runner
            .run(&self.program, &["-r"])
            .await
            .map_err(spawn_error)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ScheduleError::Io(format!(
                "Failed to remove crontab: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// A missing binary means cron is not installed; anything else is an I/O failure.
fn spawn_error(err: Error) -> ScheduleError {
    let missing = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .any(|io| io.kind() == std::io::ErrorKind::NotFound);
    if missing {
        ScheduleError::ToolingUnavailable
    } else {
        ScheduleError::Io(format!("{err:#}"))
    }
}
