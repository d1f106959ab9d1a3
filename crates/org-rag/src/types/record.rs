//! Directory record types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A source record fetched from the directory service.
///
/// `id` and `email` are required; everything else is optional and rendered
/// with a placeholder when missing during text synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl DirectoryRecord {
    /// Permissively normalize one raw directory entry.
    ///
    /// Returns `None` when `id` or `email` is missing or not a string; the
    /// caller drops such entries instead of aborting the batch.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let id = obj.get("id").and_then(Value::as_str)?;
        let email = obj.get("email").and_then(Value::as_str)?;

        let string_field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };

        Some(Self {
            id: id.to_string(),
            email: email.to_string(),
            name: string_field("name"),
            created_at: string_field("createdAt"),
            updated_at: string_field("updatedAt"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_valid_record() {
        let record = DirectoryRecord::from_value(&json!({
            "id": "u-1",
            "email": "ana@example.com",
            "name": "Ana",
            "createdAt": "2026-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(record.id, "u-1");
        assert_eq!(record.email, "ana@example.com");
        assert_eq!(record.name.as_deref(), Some("Ana"));
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_drops_record_missing_required_fields() {
        assert!(DirectoryRecord::from_value(&json!({ "email": "x@y.z" })).is_none());
        assert!(DirectoryRecord::from_value(&json!({ "id": "u-2" })).is_none());
        assert!(DirectoryRecord::from_value(&json!({ "id": 42, "email": "x@y.z" })).is_none());
        assert!(DirectoryRecord::from_value(&json!("not an object")).is_none());
    }
}
