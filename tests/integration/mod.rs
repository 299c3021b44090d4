//! Integration test suite for make-ssh-config
//!
//! End-to-end tests of the library transform and of the `make-ssh-config` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: the binary's input/output handling, exit status and diagnostics
//! - **layering**: multi-record documents compiled through [`make_ssh_config::compile`]

mod cli;
mod layering;
