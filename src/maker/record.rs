//! Raw record access and schema checks.

use crate::core::LayerError;
use crate::value::{Mapping, Value};

/// Top-level keys a record may carry.
pub const RECORD_KEYS: [&str; 6] = ["config", "host", "match", "merge", "name", "vars"];

/// Borrowed view over one input record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    entries: &'a Mapping,
}

impl<'a> Record<'a> {
    /// Wrap a decoded record, rejecting unknown top-level keys.
    pub fn new(value: &'a Value) -> Result<Self, LayerError> {
        let entries = value.as_mapping().ok_or_else(|| LayerError::InvalidShape {
            field: "record".to_string(),
            expected: "a mapping",
            found: value.kind(),
        })?;

        if let Some((key, _)) = entries.iter().find(|(k, _)| !RECORD_KEYS.contains(&k.as_str())) {
            return Err(LayerError::InvalidRecordKey {
                key: key.clone(),
            });
        }

        Ok(Self {
            entries,
        })
    }

    /// Field value, treating explicit null as absent.
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v).filter(|v| !v.is_null())
    }

    /// The record name; null and the empty string mean unnamed.
    pub fn name(&self) -> Result<Option<&'a str>, LayerError> {
        match self.field("name") {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(LayerError::InvalidShape {
                field: "name".to_string(),
                expected: "a string",
                found: other.kind(),
            }),
        }
    }

    /// Names listed in `merge`, flattened, in order.
    pub fn merge_names(&self) -> Result<Vec<String>, LayerError> {
        self.field("merge").map_or_else(|| Ok(Vec::new()), |v| v.flatten_strings("merge"))
    }

    /// A mapping-valued field such as `vars` or `config`. Empty mappings count as absent.
    pub fn mapping(&self, key: &str) -> Result<Option<&'a Value>, LayerError> {
        let Some(value) = self.field(key) else {
            return Ok(None);
        };
        match value {
            Value::Map(entries) => Ok((!entries.is_empty()).then_some(value)),
            other => Err(LayerError::InvalidShape {
                field: key.to_string(),
                expected: "a mapping",
                found: other.kind(),
            }),
        }
    }
}
