//! Payload adapters between tool arguments and Superthread request bodies.

use serde_json::{json, Map, Value};

/// Rewrite card arguments into the shape the cards endpoint expects.
///
/// - `owner_id` becomes `members: [{user_id}]`
/// - `tag_names` is copied into `tags` and left in place, along with any
///   `tag_ids`; when only `tag_ids` is given it is moved into `tags`
pub fn card_payload(mut payload: Map<String, Value>) -> Map<String, Value> {
    if let Some(owner) = payload.remove("owner_id") {
        if is_set(&owner) {
            payload.insert("members".into(), json!([{ "user_id": owner }]));
        }
    }

    if let Some(names) = payload.get("tag_names").filter(|v| v.is_array()).cloned() {
        payload.insert("tags".into(), names);
    } else if let Some(ids) = payload.get("tag_ids").filter(|v| v.is_array()).cloned() {
        payload.remove("tag_ids");
        payload.insert("tags".into(), ids);
    }

    payload
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
