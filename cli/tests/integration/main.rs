//! Integration tests for gridbanner-keys
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Homes are redirected into temp dirs; nothing touches the real crontab.

mod cli_tests;
