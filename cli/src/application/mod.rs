//! Application layer: port traits and use-cases.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::logging`.

pub mod ports;
pub mod services;

pub use ports::{
    AccountDirectory, AccountEntry, AccountLookup, CommandRunner, FileOwnership, HostAccess,
    JobTable, KeySource, LocalFs, PrivilegeProbe,
};
