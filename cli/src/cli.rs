//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use clap::builder::FalseyValueParser;

use crate::app::AppContext;
use crate::commands;
use crate::domain::config::{DEFAULT_GROUP, DEFAULT_SERVER};
use crate::domain::keys::{DEFAULT_HOME_ROOT, DEFAULT_ROOT_HOME, HomeLayout, parse_accounts};
use crate::domain::schedule::DEFAULT_LOG_PATH;
use crate::domain::{ScheduleAction, SyncConfig};
use crate::logging::{self, LogSettings};

/// Update authorized_keys from the GridBanner alert server
#[derive(Parser)]
#[command(
    name = "gridbanner-keys",
    version,
    after_help = "Examples:\n  \
        gridbanner-keys --server http://server:3000 --key adminkey --group Developers\n  \
        gridbanner-keys --install --server http://server:3000 --key adminkey --users deploy,admin\n  \
        gridbanner-keys --uninstall"
)]
pub struct Cli {
    /// Alert server URL
    #[arg(long, env = "GRIDBANNER_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Admin API key
    #[arg(long, env = "GRIDBANNER_API_KEY", hide_env_values = true, required_unless_present = "uninstall")]
    pub key: Option<String>,

    /// Directory group whose keys are authoritative
    #[arg(long, env = "GRIDBANNER_GROUP", default_value = DEFAULT_GROUP)]
    pub group: String,

    /// Comma-separated list of users to update (default: root)
    #[arg(long)]
    pub users: Option<String>,

    /// Install as cron job (runs every minute)
    #[arg(long, conflicts_with = "uninstall")]
    pub install: bool,

    /// Uninstall cron job
    #[arg(long)]
    pub uninstall: bool,

    /// Append log lines to this file
    #[arg(long, env = "GRIDBANNER_LOG_FILE", default_value = DEFAULT_LOG_PATH)]
    pub log_file: PathBuf,

    /// Log to stdout only
    #[arg(long)]
    pub no_log_file: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    #[arg(long, env = "GRIDBANNER_ROOT_HOME", hide = true, default_value = DEFAULT_ROOT_HOME)]
    pub root_home: PathBuf,

    #[arg(long, env = "GRIDBANNER_HOME_ROOT", hide = true, default_value = DEFAULT_HOME_ROOT)]
    pub home_root: PathBuf,
}

impl Cli {
    /// Logging settings implied by the flags.
    #[must_use]
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            log_file: (!self.no_log_file).then(|| self.log_file.clone()),
            no_color: self.no_color,
            ..LogSettings::default()
        }
    }

    /// Assemble the run configuration. `program` is the executable cron will call.
    #[must_use]
    pub fn sync_config(&self, program: PathBuf) -> SyncConfig {
        let schedule = if self.uninstall {
            ScheduleAction::Uninstall
        } else if self.install {
            ScheduleAction::Install
        } else {
            ScheduleAction::None
        };
        SyncConfig {
            server: self.server.clone(),
            credential: self.key.clone().unwrap_or_default(),
            group: self.group.clone(),
            accounts: parse_accounts(self.users.as_deref()),
            schedule,
            program,
            log_path: self.log_file.clone(),
            layout: HomeLayout {
                root_home: self.root_home.clone(),
                home_root: self.home_root.clone(),
            },
        }
    }

    /// Execute the sync.
    ///
    /// # Errors
    ///
    /// Returns an error if logging cannot be set up or the executable path
    /// cannot be determined. Sync failures are reported through the exit code.
    pub async fn run(self) -> Result<ExitCode> {
        logging::init(&self.log_settings())?;
        let program = std::env::current_exe().context("cannot determine executable path")?;
        let config = self.sync_config(program);
        let app = AppContext::new();
        Ok(commands::sync::run(&app, &config).await)
    }
}
