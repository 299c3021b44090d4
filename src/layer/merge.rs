//! Config map merging.

use super::{CaseInsensitiveMap, ConfigMap};
use crate::value::Value;

/// Merge `overlay` onto `base`, case-insensitively.
///
/// Null entries of `base` are dropped. For each overlay entry, null deletes the key from
/// the result (absent keys are ignored) and any other value sets or replaces it. Neither
/// input is modified.
pub fn merge_config(base: &ConfigMap, overlay: &ConfigMap) -> ConfigMap {
    let mut merged: ConfigMap = CaseInsensitiveMap::new();

    for (key, value) in base.iter().filter(|(_, v)| !v.is_null()) {
        merged.insert(key, value.clone());
    }

    for (key, value) in overlay.iter() {
        if value.is_null() {
            if merged.remove(key).is_some() {
                tracing::trace!("Option '{}' removed by overlay", key);
            }
        } else {
            merged.insert(key, value.clone());
        }
    }

    merged
}

/// Build a config map from a rendered mapping node.
pub fn config_from_mapping(entries: &[(String, Value)]) -> ConfigMap {
    entries.iter().map(|(k, v)| (k.as_str(), v.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entries: &[(&str, Value)]) -> ConfigMap {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_null_deletes_key() {
        let base = config(&[("A", Value::Int(1)), ("B", Value::Int(2))]);
        let overlay = config(&[("B", Value::Null), ("C", Value::Int(3))]);
        assert_eq!(
            merge_config(&base, &overlay),
            config(&[("A", Value::Int(1)), ("C", Value::Int(3))])
        );
    }

    #[test]
    fn test_overlay_wins() {
        let base = config(&[("A", Value::Int(1))]);
        let overlay = config(&[("A", Value::Int(2))]);
        assert_eq!(merge_config(&base, &overlay), config(&[("A", Value::Int(2))]));
    }

    #[test]
    fn test_case_insensitive_override_keeps_base_casing_and_position() {
        let base = config(&[("User", Value::from("root")), ("Port", Value::Int(22))]);
        let overlay = config(&[("user", Value::from("admin"))]);
        let merged = merge_config(&base, &overlay);
        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            [("User", &Value::from("admin")), ("Port", &Value::Int(22))]
        );
    }

    #[test]
    fn test_null_for_absent_key_and_null_in_base() {
        let base = config(&[("A", Value::Null), ("B", Value::Int(2))]);
        let overlay = config(&[("Z", Value::Null)]);
        let merged = merge_config(&base, &overlay);
        assert_eq!(merged, config(&[("B", Value::Int(2))]));
        assert!(!merged.contains_key("a"));
    }

    #[test]
    fn test_inputs_untouched() {
        let base = config(&[("A", Value::Int(1))]);
        let overlay = config(&[("a", Value::Null)]);
        let merged = merge_config(&base, &overlay);
        assert!(merged.is_empty());
        assert_eq!(base.get("A"), Some(&Value::Int(1)));
        assert_eq!(overlay.len(), 1);
    }
}
