//! Layer model.
//!
//! A [`Layer`] is one resolved record: its flattened config, the variables it exposes to
//! records that merge it, and at most one selector. Layers are immutable once built.
//!
//! - [`ci_map`] - the case-insensitive ordered map holding config options
//! - [`merge`] - null-deletes-key merging of config maps
//! - [`match_spec`] - `Match` criteria, their validation and token order

pub mod ci_map;
pub mod match_spec;
pub mod merge;

pub use ci_map::CaseInsensitiveMap;
pub use match_spec::MatchSpec;
pub use merge::{config_from_mapping, merge_config};

use crate::core::LayerError;
use crate::value::{Value, Vars};

/// Config options keyed case-insensitively by keyword.
pub type ConfigMap = CaseInsensitiveMap<Value>;

/// Which block, if any, a layer is written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Host(Vec<String>),
    Match(MatchSpec),
}

/// One resolved configuration unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub config: ConfigMap,
    pub vars: Vars,
    /// `None` for template-only layers, which are never written.
    pub selector: Option<Selector>,
}

impl Layer {
    pub fn host(&self) -> Option<&[String]> {
        match &self.selector {
            Some(Selector::Host(patterns)) => Some(patterns),
            _ => None,
        }
    }

    pub fn match_spec(&self) -> Option<&MatchSpec> {
        match &self.selector {
            Some(Selector::Match(spec)) => Some(spec),
            _ => None,
        }
    }

    /// Header line without the trailing newline, e.g. `Host a b` or `Match user root`.
    ///
    /// Returns `None` for template-only layers and for an empty host list.
    pub fn header_line(&self) -> Result<Option<String>, LayerError> {
        match &self.selector {
            None => Ok(None),
            Some(Selector::Host(patterns)) if patterns.is_empty() => Ok(None),
            Some(Selector::Host(patterns)) => Ok(Some(format!("Host {}", patterns.join(" ")))),
            Some(Selector::Match(spec)) => Ok(Some(format!("Match {}", spec.tokens()?.join(" ")))),
        }
    }

    /// `(keyword, value)` pairs in config order. List values yield one pair per element.
    pub fn declarations(&self) -> Result<Vec<(&str, String)>, LayerError> {
        let mut decls = Vec::new();
        for (option, value) in self.config.iter() {
            match value {
                Value::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        decls.push((option, scalar_text(option, Some(i), item)?));
                    }
                }
                other => decls.push((option, scalar_text(option, None, other)?)),
            }
        }
        Ok(decls)
    }
}

fn scalar_text(option: &str, index: Option<usize>, value: &Value) -> Result<String, LayerError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Bool(true) => Ok("yes".to_string()),
        Value::Bool(false) => Ok("no".to_string()),
        other => Err(LayerError::BadOptionValue {
            option: option.to_string(),
            index,
            kind: other.kind(),
        }),
    }
}
