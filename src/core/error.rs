//! Error handling for make-ssh-config
//!
//! Every failure while compiling layers is fatal: the first error aborts the run and no
//! output is written. Errors are modelled in two tiers:
//! - [`LayerError`] - strongly-typed failures raised by the value model, the builder, the
//!   renderer and the writer. Each variant carries the offending key, field or value.
//! - [`ErrorContext`] - a wrapper adding details and a suggestion for CLI display.
//!
//! # Error Categories
//!
//! - **Schema**: [`LayerError::InvalidRecordKey`], [`LayerError::UnknownMatchKey`],
//!   [`LayerError::HostAndMatch`], [`LayerError::InvalidShape`], ...
//! - **Reference**: [`LayerError::UndefinedLayer`]
//! - **Semantic**: [`LayerError::MatchAllNotAlone`], [`LayerError::QuoteInValue`],
//!   [`LayerError::BadOptionValue`]
//! - **Template**: [`LayerError::Template`]
//! - **Decode**: [`LayerError::Decode`], including value types [`Value`](crate::value::Value)
//!   cannot hold (floats, tagged values, non-string keys)
//!
//! # Examples
//!
//! ```rust,no_run
//! use make_ssh_config::core::{ErrorContext, LayerError};
//!
//! let context = ErrorContext::new(LayerError::UndefinedLayer {
//!     name: "bastion".to_string(),
//!     suggestion: None,
//! })
//! .with_suggestion("Declare the layer before the record that merges it");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;

use crate::templating::EngineError;

/// Failures raised while decoding, building or writing layers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LayerError {
    /// A record carries a top-level key outside the layer schema.
    #[error("Invalid layer attribute '{key}'")]
    InvalidRecordKey {
        /// The unexpected key as written in the input
        key: String,
    },

    /// A `match` mapping carries a key that is not a Match criterion.
    #[error("Unknown match key '{key}'")]
    UnknownMatchKey {
        /// The unexpected criterion
        key: String,
    },

    /// A record declares both selectors.
    #[error("Specifying both host and match is prohibited")]
    HostAndMatch,

    /// A field holds a value of the wrong shape.
    #[error("{field} must be {expected}, got {found}")]
    InvalidShape {
        /// Field name, e.g. `host`, `config`, `merge`
        field: String,
        /// Human description of the accepted shapes
        expected: &'static str,
        /// Kind of the value that was found
        found: &'static str,
    },

    /// The input document is not a sequence of records.
    #[error("Input must be a sequence of records, got {found}")]
    NotASequence {
        /// Kind of the top-level document
        found: &'static str,
    },

    /// A record in the input sequence is not a mapping.
    #[error("Record #{index} must be a mapping, got {found}")]
    RecordNotMapping {
        /// Zero-based position in the input sequence
        index: usize,
        /// Kind of the offending record
        found: &'static str,
    },

    /// `merge` references a layer that was never registered.
    #[error("Undefined record '{name}'")]
    UndefinedLayer {
        /// The missing layer name
        name: String,
        /// Closest registered name, if any is similar enough
        suggestion: Option<String>,
    },

    /// `all` combined with other Match criteria.
    #[error("The 'all' token must be alone or immediately after 'canonical'")]
    MatchAllNotAlone,

    /// An option value needs quoting but already contains a double quote.
    #[error("Double quote character in {value:?}")]
    QuoteInValue {
        /// The offending value
        value: String,
    },

    /// A config option holds a value the writer cannot express.
    #[error("Bad type {kind} in option {option}{}", at_index(.index))]
    BadOptionValue {
        /// Option keyword
        option: String,
        /// Position inside a list value
        index: Option<usize>,
        /// Shape of the offending value
        kind: &'static str,
    },

    /// The template capability failed for a string.
    #[error("Failed to render {template:?}: {source}")]
    Template {
        /// The string that was being rendered
        template: String,
        /// Underlying engine failure
        #[source]
        source: EngineError,
    },

    /// The YAML decoder rejected the input.
    #[error("Failed to parse input: {message}")]
    Decode {
        /// Decoder message, including the location when known
        message: String,
    },
}

impl From<serde_yaml::Error> for LayerError {
    fn from(error: serde_yaml::Error) -> Self {
        LayerError::Decode {
            message: error.to_string(),
        }
    }
}

fn at_index(index: &Option<usize>) -> String {
    index.map(|i| format!(" at index {i}")).unwrap_or_default()
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: LayerError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: LayerError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Message printed for errors that carry no [`LayerError`] in their chain.
#[derive(Debug)]
pub struct GenericError {
    message: String,
    details: Option<String>,
}

impl GenericError {
    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);
        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }
    }
}

/// A user-presentable error, either typed or generic.
#[derive(Debug)]
pub enum UserError {
    /// A [`LayerError`] found in the chain, with suggestions
    Layer(ErrorContext),
    /// Anything else (I/O, argument errors)
    Generic(GenericError),
}

impl UserError {
    /// Print the error to stderr.
    pub fn display(&self) {
        match self {
            UserError::Layer(ctx) => ctx.display(),
            UserError::Generic(err) => err.display(),
        }
    }
}

/// Convert any error into a user-friendly format with contextual suggestions.
///
/// The chain is walked for a [`LayerError`]; when one is found, the outer context messages
/// (record position and name) become the details and a suggestion is attached based on
/// the error kind.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> UserError {
    let outer: Vec<String> = error
        .chain()
        .take_while(|e| e.downcast_ref::<LayerError>().is_none())
        .map(ToString::to_string)
        .collect();

    let Some(layer_error) = error.chain().find_map(|e| e.downcast_ref::<LayerError>()) else {
        let mut messages = error.chain().map(ToString::to_string);
        let message = messages.next().unwrap_or_default();
        let rest: Vec<String> = messages.collect();
        return UserError::Generic(GenericError {
            message,
            details: (!rest.is_empty()).then(|| rest.join(": ")),
        });
    };

    let mut ctx = ErrorContext::new(layer_error.clone());
    if !outer.is_empty() {
        ctx = ctx.with_details(outer.join(": "));
    }
    if let Some(suggestion) = suggestion_for(layer_error) {
        ctx = ctx.with_suggestion(suggestion);
    }
    UserError::Layer(ctx)
}

fn suggestion_for(error: &LayerError) -> Option<String> {
    match error {
        LayerError::InvalidRecordKey {
            ..
        } => Some("Valid layer attributes are: config, host, match, merge, name, vars".into()),
        LayerError::UnknownMatchKey {
            ..
        } => Some(
            "Valid match keys are: all, canonical, exec, host, originalhost, user, localuser"
                .into(),
        ),
        LayerError::HostAndMatch => {
            Some("Split the record in two, or move the host patterns into match.host".into())
        }
        LayerError::UndefinedLayer {
            suggestion: Some(name),
            ..
        } => Some(format!("Did you mean '{name}'?")),
        LayerError::UndefinedLayer {
            ..
        } => Some("Layers can only merge records declared earlier in the file".into()),
        LayerError::MatchAllNotAlone => {
            Some("Use 'all' on its own or only together with 'canonical'".into())
        }
        LayerError::QuoteInValue {
            ..
        } => Some("Values containing spaces are quoted automatically; remove the '\"'".into()),
        LayerError::Template {
            ..
        } => Some("Check your template syntax and variable declarations".into()),
        _ => None,
    }
}
