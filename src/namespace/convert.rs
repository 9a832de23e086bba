//! Namespace ingestion and dumping.
//!
//! Namespaces can be built from JSON values or TOML text (configuration
//! layers usually arrive as one of the two), and dumped back to JSON for
//! diagnostics. The dump is lossy: objects and lazy values render as their
//! repr strings.

use serde_json::Value as Json;

use crate::refine::RefineError;

use super::{Namespace, Value};

impl Namespace {
    /// Build a namespace from a JSON value. Objects nest; anything else
    /// (including arrays) becomes a scalar leaf. A non-object top level
    /// yields an empty namespace.
    pub fn from_json(value: Json) -> Namespace {
        let mut ns = Namespace::new();
        if let Json::Object(map) = value {
            for (key, value) in map {
                ns.insert(key, json_to_value(value));
            }
        }
        ns
    }

    /// Parse a TOML document into a namespace.
    pub fn from_toml_str(input: &str) -> Result<Namespace, RefineError> {
        let value: toml::Value = toml::from_str(input)
            .map_err(|e| RefineError::Parse(format!("TOML parse error: {e}")))?;
        Ok(Namespace::from_json(toml_to_json(value)))
    }

    /// Dump to JSON for diagnostics. Lossy: refinable objects and lazy
    /// values render as repr strings.
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        )
    }
}

fn json_to_value(value: Json) -> Value {
    match value {
        Json::Object(_) => Value::Namespace(Namespace::from_json(value)),
        other => Value::Scalar(other),
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Namespace(ns) => ns.to_json(),
        Value::Scalar(json) => json.clone(),
        other => Json::String(format!("{other:?}")),
    }
}

/// Convert a TOML value to a JSON value.
fn toml_to_json(toml: toml::Value) -> Json {
    match toml {
        toml::Value::String(s) => Json::String(s),
        toml::Value::Integer(i) => Json::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        toml::Value::Boolean(b) => Json::Bool(b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(arr) => Json::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, Json> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            Json::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nests_objects() {
        let ns = Namespace::from_json(json!({
            "timeout": 900,
            "cache": { "derived": "on" }
        }));
        assert_eq!(ns.get_i64("timeout"), Some(900));
        assert_eq!(ns.get_str("cache__derived"), Some("on"));
    }

    #[test]
    fn test_from_json_arrays_stay_scalar() {
        let ns = Namespace::from_json(json!({ "schemes": ["A", "B"] }));
        assert_eq!(
            ns.get_path("schemes").unwrap().as_scalar(),
            Some(&json!(["A", "B"]))
        );
    }

    #[test]
    fn test_from_toml_str() {
        let ns = Namespace::from_toml_str(
            "timeout = 900\n\n[cache]\nderived = \"on\"\n",
        )
        .unwrap();
        assert_eq!(ns.get_i64("timeout"), Some(900));
        assert_eq!(ns.get_str("cache__derived"), Some("on"));
    }

    #[test]
    fn test_from_toml_str_parse_error() {
        let err = Namespace::from_toml_str("not = valid = toml").unwrap_err();
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_to_json_round_trip() {
        let original = json!({ "a": 1, "b": { "c": "x" } });
        let ns = Namespace::from_json(original.clone());
        assert_eq!(ns.to_json(), original);
    }
}
