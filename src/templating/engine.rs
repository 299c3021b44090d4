//! Template engine backed by Tera.

use tera::{Context as TeraContext, Tera};

use super::{EngineError, TemplateEngine};
use crate::value::{Value, Vars};

/// Name of the template holding a wrapped expression.
const EXPRESSION_TEMPLATE: &str = "__expression";

/// Variable the wrapped expression assigns its result to.
const EXPRESSION_RESULT: &str = "__expression_result";

/// [`TemplateEngine`] implementation using Tera.
///
/// A fresh `Tera` instance is created per call (just empty maps), so no template or
/// state leaks from one render into the next.
///
/// Expressions are evaluated by compiling
/// `{% set __expression_result = <expr> %}{{ __expression_result | json_encode() }}`
/// and decoding the JSON output, which keeps integers, booleans and lists typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraEngine;

impl TeraEngine {
    pub const fn new() -> Self {
        Self
    }

    fn context(vars: &Vars) -> TeraContext {
        let mut context = TeraContext::new();
        for (key, value) in vars {
            context.insert(key.as_str(), value);
        }
        context
    }

    /// Collapse a Tera error chain into one line, dropping internal template names.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut messages = Vec::new();
        let mut current: Option<&dyn Error> = Some(error);
        while let Some(err) = current {
            let cleaned = err
                .to_string()
                .replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "")
                .replace("Failed to parse '__tera_one_off'", "")
                .replace(&format!("while rendering '{EXPRESSION_TEMPLATE}'"), "")
                .replace(&format!("Failed to render '{EXPRESSION_TEMPLATE}'"), "")
                .replace(&format!("Failed to parse '{EXPRESSION_TEMPLATE}'"), "")
                .trim()
                .to_string();
            if !cleaned.is_empty() {
                messages.push(cleaned);
            }
            current = err.source();
        }

        if messages.is_empty() {
            "template evaluation failed".to_string()
        } else {
            messages.join(": ")
        }
    }
}

impl TemplateEngine for TeraEngine {
    fn evaluate_expression(&self, expression: &str, context: &Vars) -> Result<Value, EngineError> {
        let source = format!(
            "{{% set {EXPRESSION_RESULT} = {expression} %}}\
             {{{{ {EXPRESSION_RESULT} | json_encode() }}}}"
        );

        let mut tera = Tera::default();
        tera.add_raw_template(EXPRESSION_TEMPLATE, &source)
            .map_err(|e| EngineError::Syntax(Self::format_tera_error(&e)))?;

        let rendered = tera
            .render(EXPRESSION_TEMPLATE, &Self::context(context))
            .map_err(|e| EngineError::Render(Self::format_tera_error(&e)))?;

        let json: serde_json::Value = serde_json::from_str(&rendered).map_err(|e| {
            EngineError::Render(format!("expression produced undecodable output: {e}"))
        })?;

        tracing::trace!("Expression {:?} evaluated to {}", expression, rendered);
        Ok(Value::from_json(json))
    }

    fn render_template(&self, source: &str, context: &Vars) -> Result<String, EngineError> {
        let mut tera = Tera::default();
        tera.render_str(source, &Self::context(context))
            .map_err(|e| EngineError::Render(Self::format_tera_error(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(entries: &[(&str, Value)]) -> Vars {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_expression_keeps_integer_type() {
        let engine = TeraEngine::new();
        assert_eq!(engine.evaluate_expression(" 1 + 1 ", &Vars::new()).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_expression_returns_lists() {
        let engine = TeraEngine::new();
        let context = vars(&[("hosts", Value::list([Value::from("a"), Value::from("b")]))]);
        assert_eq!(
            engine.evaluate_expression(" hosts ", &context).unwrap(),
            Value::list([Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_expression_with_filter() {
        let engine = TeraEngine::new();
        let context = vars(&[("user", Value::from("admin"))]);
        assert_eq!(
            engine.evaluate_expression(" user | upper ", &context).unwrap(),
            Value::from("ADMIN")
        );
    }

    #[test]
    fn test_multiple_blocks_are_not_an_expression() {
        let engine = TeraEngine::new();
        let err = engine.evaluate_expression(" a }}-{{ b ", &Vars::new()).unwrap_err();
        assert!(matches!(err, EngineError::Syntax(_)), "{err:?}");
    }

    #[test]
    fn test_undefined_variable_is_render_error() {
        let engine = TeraEngine::new();
        let err = engine.evaluate_expression(" missing ", &Vars::new()).unwrap_err();
        assert!(matches!(err, EngineError::Render(_)), "{err:?}");

        let err = engine.render_template("x-{{ missing }}", &Vars::new()).unwrap_err();
        let EngineError::Render(message) = err else {
            panic!("expected render error");
        };
        assert!(!message.contains("__tera_one_off"), "{message}");
    }

    #[test]
    fn test_render_template_substitutes() {
        let engine = TeraEngine::new();
        let context = vars(&[("name", Value::from("web"))]);
        assert_eq!(engine.render_template("{{ name }}-host", &context).unwrap(), "web-host");
        assert_eq!(engine.render_template("plain text", &context).unwrap(), "plain text");
    }
}
