//! GridBanner authorized_keys updater library. Modules are public for the test harnesses.

#![cfg_attr(test, allow(clippy::expect_used))]

#[cfg(not(unix))]
compile_error!("gridbanner-keys manages Unix accounts and crontab; only Unix targets are supported");

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod logging;
