//! `Match` block criteria.

use crate::core::LayerError;
use crate::value::Value;

/// Keys accepted in a `match` mapping.
pub const MATCH_KEYS: [&str; 7] =
    ["all", "canonical", "exec", "host", "originalhost", "user", "localuser"];

/// Normalized criteria of a `Match` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSpec {
    pub all: bool,
    pub canonical: bool,
    pub host: Vec<String>,
    pub originalhost: Vec<String>,
    pub user: Vec<String>,
    pub localuser: Vec<String>,
    pub exec: Option<String>,
}

impl MatchSpec {
    /// Normalize a rendered `match` mapping.
    ///
    /// `all` and `canonical` are coerced by truthiness, the list criteria accept a string or
    /// (nested) lists of strings, and `exec` accepts a string or an integer. A falsy `exec`
    /// (null, `false`, `0`, `""`) is treated as absent.
    pub fn from_value(value: &Value) -> Result<Self, LayerError> {
        let entries = value.as_mapping().ok_or_else(|| LayerError::InvalidShape {
            field: "match".to_string(),
            expected: "a mapping",
            found: value.kind(),
        })?;

        if let Some((key, _)) = entries.iter().find(|(k, _)| !MATCH_KEYS.contains(&k.as_str())) {
            return Err(LayerError::UnknownMatchKey {
                key: key.clone(),
            });
        }

        let field = |key: &str| value.get(key).unwrap_or(&Value::Null);
        let list = |key: &str| field(key).flatten_strings(&format!("match.{key}"));

        let exec = match field("exec") {
            falsy if !falsy.is_truthy() => None,
            Value::String(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            other => {
                return Err(LayerError::InvalidShape {
                    field: "match.exec".to_string(),
                    expected: "a string",
                    found: other.kind(),
                });
            }
        };

        let spec = Self {
            all: field("all").is_truthy(),
            canonical: field("canonical").is_truthy(),
            host: list("host")?,
            originalhost: list("originalhost")?,
            user: list("user")?,
            localuser: list("localuser")?,
            exec,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// `all` may only stand alone or directly after `canonical`.
    pub fn validate(&self) -> Result<(), LayerError> {
        let has_criteria = self.exec.is_some()
            || !self.host.is_empty()
            || !self.originalhost.is_empty()
            || !self.user.is_empty()
            || !self.localuser.is_empty();

        if self.all && has_criteria {
            return Err(LayerError::MatchAllNotAlone);
        }
        Ok(())
    }

    /// Arguments of the `Match` line, in the order the SSH client expects them.
    pub fn tokens(&self) -> Result<Vec<String>, LayerError> {
        self.validate()?;

        let mut args = Vec::new();
        if self.canonical {
            args.push("canonical".to_string());
        }
        if self.all {
            args.push("all".to_string());
        }
        for (keyword, values) in [
            ("host", &self.host),
            ("originalhost", &self.originalhost),
            ("user", &self.user),
            ("localuser", &self.localuser),
        ] {
            if !values.is_empty() {
                args.push(keyword.to_string());
                args.push(values.join(","));
            }
        }
        if let Some(exec) = &self.exec {
            args.push("exec".to_string());
            args.push(exec.clone());
        }
        Ok(args)
    }

    /// Mapping form exposed to `config` templates as `match`.
    pub fn to_value(&self) -> Value {
        let strings = |items: &[String]| Value::list(items.iter().map(|s| Value::from(s.as_str())));
        Value::map([
            ("all", Value::Bool(self.all)),
            ("canonical", Value::Bool(self.canonical)),
            ("host", strings(&self.host)),
            ("originalhost", strings(&self.originalhost)),
            ("user", strings(&self.user)),
            ("localuser", strings(&self.localuser)),
            ("exec", Value::from(self.exec.clone())),
        ])
    }
}
