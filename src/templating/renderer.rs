//! Recursive rendering of value trees.
//!
//! [`render_value`] walks a [`Value`] and substitutes every string through a
//! [`TemplateEngine`]. Lists and mappings are rendered once per node identity: when the
//! same `Rc` node is reachable from several places, later visits reuse the first result,
//! so the output shares the node exactly as the input did.

use std::collections::HashMap;
use std::rc::Rc;

use super::{EngineError, TemplateEngine};
use crate::core::LayerError;
use crate::value::{Mapping, Value, Vars};

const EXPRESSION_OPEN: &str = "{{";
const EXPRESSION_CLOSE: &str = "}}";

/// Render `value` against `context`.
///
/// - null, booleans and integers are returned unchanged
/// - a string that is exactly one `{{ ... }}` block is evaluated as an expression, falling
///   back to template rendering when it does not parse as one
/// - any other string is rendered as a template
/// - lists and mappings are rendered element-wise, preserving order and keys
pub fn render_value(
    engine: &dyn TemplateEngine,
    value: &Value,
    context: &Vars,
) -> Result<Value, LayerError> {
    Renderer {
        engine,
        context,
        memo: HashMap::new(),
    }
    .render(value)
}

struct Renderer<'a> {
    engine: &'a dyn TemplateEngine,
    context: &'a Vars,
    /// Rendered results keyed by source node address. Source nodes outlive the render,
    /// so an address cannot be reused while it is in the table.
    memo: HashMap<usize, Value>,
}

impl Renderer<'_> {
    fn render(&mut self, value: &Value) -> Result<Value, LayerError> {
        match value {
            Value::Null | Value::Bool(_) | Value::Int(_) => Ok(value.clone()),
            Value::String(s) => self.render_str(s),
            Value::List(items) => {
                let id = Rc::as_ptr(items) as usize;
                if let Some(done) = self.memo.get(&id) {
                    tracing::trace!("Reusing rendered list node {:#x}", id);
                    return Ok(done.clone());
                }
                let rendered = items
                    .iter()
                    .map(|item| self.render(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let rendered = Value::List(Rc::new(rendered));
                self.memo.insert(id, rendered.clone());
                Ok(rendered)
            }
            Value::Map(entries) => {
                let id = Rc::as_ptr(entries) as usize;
                if let Some(done) = self.memo.get(&id) {
                    tracing::trace!("Reusing rendered mapping node {:#x}", id);
                    return Ok(done.clone());
                }
                let rendered = entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), self.render(v)?)))
                    .collect::<Result<Mapping, LayerError>>()?;
                let rendered = Value::Map(Rc::new(rendered));
                self.memo.insert(id, rendered.clone());
                Ok(rendered)
            }
        }
    }

    fn render_str(&self, s: &str) -> Result<Value, LayerError> {
        let wrap = |source: EngineError| LayerError::Template {
            template: s.to_string(),
            source,
        };

        if let Some(inner) = s
            .strip_prefix(EXPRESSION_OPEN)
            .and_then(|rest| rest.strip_suffix(EXPRESSION_CLOSE))
        {
            match self.engine.evaluate_expression(inner, self.context) {
                Ok(value) => return Ok(value),
                Err(EngineError::Syntax(reason)) => {
                    tracing::trace!(
                        "{:?} is not a bare expression ({}), rendering as template",
                        s,
                        reason
                    );
                }
                Err(e) => return Err(wrap(e)),
            }
        }

        self.engine.render_template(s, self.context).map(Value::String).map_err(wrap)
    }
}
