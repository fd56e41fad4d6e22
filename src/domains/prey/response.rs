//! The `{data, meta?}` envelope applied to every successful tool result.

use serde_json::{Map, Value};

/// Wrap a payload in the standard envelope. `meta` is attached only when
/// present (paginated list endpoints).
pub fn wrap(data: Value, meta: Option<Value>) -> Value {
    let mut envelope = Map::new();
    envelope.insert("data".to_string(), data);
    if let Some(meta) = meta {
        envelope.insert("meta".to_string(), meta);
    }
    Value::Object(envelope)
}
