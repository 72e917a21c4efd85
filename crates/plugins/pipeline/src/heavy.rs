//! Recursive removal of verbose upstream fields.

use serde_json::{Map, Value};

/// Fields that inflate Superthread payloads without helping an agent act on them.
pub const HEAVY_FIELDS: &[&str] = &[
    // timestamps
    "time_created",
    "time_updated",
    "start_date",
    "due_date",
    "completed_date",
    "created_at",
    "updated_at",
    // embedded user objects
    "user",
    "user_updated",
    "created_by",
    "updated_by",
    // large arrays
    "members",
    "checklists",
    "child_cards",
    "linked_cards",
    "tags",
    "attachments",
    // metadata
    "external_links",
    "hints",
    "collaboration",
    "permissions",
    "settings",
    // media blobs
    "icon",
    "cover_image",
    "avatar",
];

pub fn is_heavy(key: &str) -> bool {
    HEAVY_FIELDS.contains(&key)
}

/// Strip every [`HEAVY_FIELDS`] key at any depth, keeping structure intact.
pub fn strip_heavy_fields(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(strip_heavy_fields).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !is_heavy(key))
                .map(|(key, value)| (key, strip_heavy_fields(value)))
                .collect::<Map<String, Value>>(),
        ),
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_nested_objects_and_arrays() {
        let input = json!({
            "id": "c1",
            "time_created": 1700000000,
            "members": [{"user_id": "u1"}],
            "lists": [{
                "id": "l1",
                "icon": "data:image/png;base64,AAAA",
                "cards": [{"id": "c2", "tags": ["x"], "title": "Keep"}]
            }]
        });

        let stripped = strip_heavy_fields(input);

        assert_eq!(
            stripped,
            json!({
                "id": "c1",
                "lists": [{"id": "l1", "cards": [{"id": "c2", "title": "Keep"}]}]
            })
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(strip_heavy_fields(json!("text")), json!("text"));
        assert_eq!(strip_heavy_fields(json!(42)), json!(42));
        assert_eq!(strip_heavy_fields(Value::Null), Value::Null);
    }

    #[test]
    fn test_top_level_array() {
        let stripped = strip_heavy_fields(json!([{"id": 1, "avatar": "x"}, {"id": 2}]));
        assert_eq!(stripped, json!([{"id": 1}, {"id": 2}]));
    }
}
