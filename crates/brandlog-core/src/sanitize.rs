//! Removes sensitive keys from payloads before they leave process memory.

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// Normalized names of keys that are never persisted or transmitted.
const SENSITIVE_KEYS: &[&str] = &[
    "apikey",
    "password",
    "passwd",
    "token",
    "accesstoken",
    "refreshtoken",
    "idtoken",
    "secret",
    "clientsecret",
    "authorization",
];

/// Returns true if `key` names a sensitive field.
///
/// Matching ignores case and `_`/`-` separators, so `apiKey`, `api_key`
/// and `API-KEY` are all caught.
pub fn is_sensitive_key(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    SENSITIVE_KEYS.contains(&normalized.as_str())
}

/// Produces a deep copy of `value` with sensitive keys removed at every level.
///
/// `Null` is returned unchanged. The input is never mutated.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut cleaned = Map::with_capacity(map.len());
            for (key, inner) in map {
                if is_sensitive_key(key) {
                    continue;
                }
                cleaned.insert(key.clone(), sanitize(inner));
            }
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        other => other.clone(),
    }
}

/// Serializes `value` to JSON and sanitizes the result.
///
/// Serialization failures are returned rather than silently dropping data.
pub fn sanitize_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let json = serde_json::to_value(value)?;
    Ok(sanitize(&json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn contains_sensitive(value: &Value) -> bool {
        match value {
            Value::Object(map) => map
                .iter()
                .any(|(k, v)| is_sensitive_key(k) || contains_sensitive(v)),
            Value::Array(items) => items.iter().any(contains_sensitive),
            _ => false,
        }
    }

    #[test]
    fn test_removes_top_level_keys() {
        let input = json!({"name": "Ada", "apiKey": "sk-1", "password": "hunter2", "token": "t"});
        let cleaned = sanitize(&input);
        assert_eq!(cleaned, json!({"name": "Ada"}));
    }

    #[test]
    fn test_removes_nested_keys_in_objects_and_arrays() {
        let input = json!({
            "profile": {
                "handle": "@ada",
                "auth": {"token": "abc", "scope": "read"}
            },
            "accounts": [
                {"site": "linkedin", "password": "p"},
                {"site": "twitter", "api_key": "k"}
            ]
        });

        let cleaned = sanitize(&input);

        assert!(!contains_sensitive(&cleaned));
        assert_eq!(
            cleaned,
            json!({
                "profile": {"handle": "@ada", "auth": {"scope": "read"}},
                "accounts": [{"site": "linkedin"}, {"site": "twitter"}]
            })
        );
    }

    #[test]
    fn test_does_not_mutate_input() {
        let input = json!({"token": "abc", "keep": 1});
        let before = input.clone();
        let _ = sanitize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_null_and_scalars_pass_through() {
        assert_eq!(sanitize(&Value::Null), Value::Null);
        assert_eq!(sanitize(&json!(42)), json!(42));
        assert_eq!(sanitize(&json!("token")), json!("token"));
    }

    #[test]
    fn test_key_matching_is_normalized() {
        assert!(is_sensitive_key("apiKey"));
        assert!(is_sensitive_key("API_KEY"));
        assert!(is_sensitive_key("refresh-token"));
        assert!(!is_sensitive_key("tokenizer"));
        assert!(!is_sensitive_key("name"));
    }

    #[test]
    fn test_sanitize_serializable() {
        let mut form = HashMap::new();
        form.insert("name", "Ada");
        form.insert("password", "secret");

        let cleaned = sanitize_serializable(&form).unwrap();

        assert_eq!(cleaned, json!({"name": "Ada"}));
    }

    #[test]
    fn test_sanitize_serializable_fails_loudly() {
        // Maps with non-string keys cannot become JSON objects.
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "x");

        assert!(sanitize_serializable(&bad).is_err());
    }
}
