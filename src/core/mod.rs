//! Core types shared across make-ssh-config.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`LayerError`] - every failure raised while decoding, building or writing layers
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert an [`anyhow::Error`] chain for CLI display
//!
//! All errors are fatal. The run stops at the first one and reports it unchanged; errors
//! are never aggregated.

pub mod error;

pub use error::{ErrorContext, GenericError, LayerError, UserError, user_friendly_error};
