//! Template substitution for layer values.
//!
//! Values in a record may reference variables with `{{ ... }}` markers. The actual
//! expression and template language is provided by a [`TemplateEngine`]; the crate ships
//! [`TeraEngine`], backed by Tera's Jinja2-like syntax.
//!
//! # Expression vs. template
//!
//! A string that is *wholly* one `{{ ... }}` block is first evaluated as an expression, so
//! its result keeps its type:
//!
//! ```yaml
//! vars:
//!   port: 2222
//! config:
//!   Port: "{{ port }}"          # the integer 2222
//!   HostName: "{{ name }}.lan"  # text substitution
//! ```
//!
//! If the inner text does not parse as an expression (for example `"{{ a }}-{{ b }}"`),
//! the whole string is rendered as a template instead.
//!
//! # Modules
//!
//! - [`engine`] - the Tera-backed engine
//! - [`renderer`] - recursive rendering of [`Value`](crate::value::Value) trees

pub mod engine;
pub mod renderer;

pub use engine::TeraEngine;
pub use renderer::render_value;

use crate::value::{Value, Vars};

/// Failure reported by a [`TemplateEngine`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The source does not parse.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The source parsed but could not be evaluated against the context.
    #[error("{0}")]
    Render(String),
}

/// Expression and template evaluation capability.
///
/// Implementations must be synchronous and must not retain state between calls that
/// would make a result depend on earlier calls.
pub trait TemplateEngine {
    /// Evaluate `expression` (the text between `{{` and `}}`) and return its typed result.
    ///
    /// Returns [`EngineError::Syntax`] when the text is not a single expression.
    fn evaluate_expression(&self, expression: &str, context: &Vars) -> Result<Value, EngineError>;

    /// Render `source` as a template, substituting markers anywhere in the text.
    fn render_template(&self, source: &str, context: &Vars) -> Result<String, EngineError>;
}
