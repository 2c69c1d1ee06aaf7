//! Domain layer: pure types and logic.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod keys;
pub mod schedule;

pub use config::{ScheduleAction, SyncConfig};
pub use error::{FetchError, ReconcileError, ScheduleError, SyncError};
pub use keys::{HomeLayout, KeyArtifactPaths, KeyPayload, OwnershipOutcome, ReconcileReport};
pub use schedule::{InvocationSpec, UninstallPlan};
