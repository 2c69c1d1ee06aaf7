//! Unit tests for gridbanner-keys
//!
//! Services run against in-memory port mocks; infra adapters run against
//! temp directories and a local one-shot HTTP listener.

mod crontab_table;
mod mocks;
