//! Infrastructure layer: concrete implementations of the application ports.
//!
//! This module contains all I/O-performing code: HTTP, process execution,
//! filesystem access, and the system user database.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::logging` are forbidden.

pub mod accounts;
pub mod command_runner;
pub mod crontab;
pub mod fs;
pub mod key_source;

pub use accounts::SystemHost;
pub use command_runner::TokioCommandRunner;
pub use crontab::CrontabTable;
pub use key_source::HttpKeySource;
