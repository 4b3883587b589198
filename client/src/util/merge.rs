//! Recursive JSON merge for layered configuration.

#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;

use serde_json::Value;

/// Merge `overlay` onto `base`.
///
/// Objects merge key by key, recursively. Any other overlay value (array,
/// string, number, bool, null) replaces the base value wholesale; arrays are
/// never concatenated or merged element-wise.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}
