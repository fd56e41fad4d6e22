//! Sensitive-field masking of upstream payloads.
//!
//! Applied to every payload before it is wrapped in a tool result, so
//! credentials stored upstream never reach the MCP client.

use serde_json::Value;

/// Case-insensitive substrings that mark a key as sensitive.
const SENSITIVE_KEYS: [&str; 5] = ["token", "secret", "password", "apikey", "api_key"];

/// Recursively replace the value of every sensitive key with `"***"`.
///
/// Pure structural transform over the JSON tree: objects and arrays are
/// rebuilt, scalars pass through unchanged.
pub fn mask_sensitive(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    if is_sensitive_key(&k) {
                        (k, Value::String("***".to_string()))
                    } else {
                        (k, mask_sensitive(v))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(mask_sensitive).collect()),
        scalar => scalar,
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|s| key.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_nested_objects_and_arrays() {
        let input = json!({
            "token": "abc",
            "nested": {"password": "secret"},
            "list": [{"api_key": "123"}],
        });
        let masked = mask_sensitive(input);
        assert_eq!(masked["token"], "***");
        assert_eq!(masked["nested"]["password"], "***");
        assert_eq!(masked["list"][0]["api_key"], "***");
    }

    #[test]
    fn matches_substrings_case_insensitively() {
        let masked = mask_sensitive(json!({
            "AccessToken": "abc",
            "user_PASSWORD_hash": "def",
            "ApiKey": "ghi",
        }));
        assert_eq!(masked["AccessToken"], "***");
        assert_eq!(masked["user_PASSWORD_hash"], "***");
        assert_eq!(masked["ApiKey"], "***");
    }

    #[test]
    fn leaves_other_keys_and_scalars_untouched() {
        let input = json!({"id": "42", "name": "x", "count": 3, "tags": ["a", "b"]});
        assert_eq!(mask_sensitive(input.clone()), input);
        assert_eq!(mask_sensitive(json!("plain")), json!("plain"));
        assert_eq!(mask_sensitive(Value::Null), Value::Null);
    }
}
