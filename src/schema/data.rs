//! Resource Data
//!
//! The record a single read works on: the user's configuration going in, the
//! computed state and tracking identifier coming out.

use super::Schema;
use crate::error::SchemaWriteError;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Per-read record
#[derive(Debug, Clone)]
pub struct ResourceData {
    schema: Arc<Schema>,
    config: Map<String, Value>,
    state: Map<String, Value>,
    id: Option<String>,
}

impl ResourceData {
    /// Create a record from user configuration
    pub fn new(schema: Arc<Schema>, config: Map<String, Value>) -> Self {
        Self {
            schema,
            config,
            state: Map::new(),
            id: None,
        }
    }

    /// Create a record that already carries an identifier (prior read or import)
    pub fn with_id(schema: Arc<Schema>, config: Map<String, Value>, id: &str) -> Self {
        let mut data = Self::new(schema, config);
        data.set_id(id);
        data
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Current value of an attribute, state first then configuration
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key).or_else(|| self.config.get(key))
    }

    /// Value of an attribute if it is set to something other than its zero value
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !is_zero(v))
    }

    /// Non-empty string value of an attribute
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_ok(key).and_then(|v| v.as_str())
    }

    /// Non-empty string value the user configured, ignoring anything reads wrote
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config
            .get(key)
            .filter(|v| !is_zero(v))
            .and_then(|v| v.as_str())
    }

    /// Drop everything previous reads wrote
    pub fn clear_state(&mut self) {
        self.state.clear();
    }

    /// Write an attribute after checking it against the schema
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), SchemaWriteError> {
        let Some(attr) = self.schema.get(key) else {
            return Err(SchemaWriteError::new(key, "attribute is not declared"));
        };
        attr.ty
            .check(key, &value)
            .map_err(|reason| SchemaWriteError::new(key, reason))?;

        self.state.insert(key.to_string(), value);
        Ok(())
    }

    /// Tracking identifier, empty until a read assigns one
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = (!id.is_empty()).then(|| id.to_string());
    }

    /// Attributes written by reads
    pub fn state(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Identifier plus every known attribute value, for display
    pub fn to_json(&self) -> Value {
        let mut out = self.config.clone();
        out.extend(self.state.clone());
        out.insert("id".to_string(), Value::String(self.id().to_string()));
        Value::Object(out)
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrType, Attribute};
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new()
                .attr("name", Attribute::required(AttrType::String, ""))
                .attr("region", Attribute::optional(AttrType::String, "").with_computed())
                .attr("network", Attribute::computed(AttrType::String, "")),
        )
    }

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_get_ok_skips_zero_values() {
        let data = ResourceData::new(schema(), config(json!({"name": "r1", "region": ""})));
        assert_eq!(data.get_str("name"), Some("r1"));
        assert_eq!(data.get_str("region"), None);
        assert!(data.get("region").is_some());
    }

    #[test]
    fn test_set_shadows_config() {
        let mut data = ResourceData::new(schema(), config(json!({"region": ""})));
        data.set("region", json!("us-central1")).unwrap();
        assert_eq!(data.get_str("region"), Some("us-central1"));
    }

    #[test]
    fn test_config_str_ignores_state() {
        let mut data = ResourceData::new(schema(), config(json!({"name": "r1"})));
        data.set("region", json!("us-central1")).unwrap();
        data.set("name", json!("r2")).unwrap();

        assert_eq!(data.config_str("region"), None);
        assert_eq!(data.config_str("name"), Some("r1"));

        data.clear_state();
        assert!(data.state().is_empty());
        assert_eq!(data.get_str("name"), Some("r1"));
    }

    #[test]
    fn test_set_rejects_undeclared_and_mistyped() {
        let mut data = ResourceData::new(schema(), Map::new());

        let err = data.set("zone", json!("us-central1-a")).unwrap_err();
        assert_eq!(err.field, "zone");

        let err = data.set("network", json!(42)).unwrap_err();
        assert_eq!(err.to_string(), "Error setting network: network: expected string, got number");
        assert!(data.state().is_empty());
    }

    #[test]
    fn test_id_roundtrip() {
        let mut data = ResourceData::new(schema(), Map::new());
        assert_eq!(data.id(), "");
        data.set_id("projects/p/regions/r/routers/n");
        assert_eq!(data.id(), "projects/p/regions/r/routers/n");

        let data = ResourceData::with_id(schema(), Map::new(), "edge-router");
        assert_eq!(data.to_json()["id"], "edge-router");
    }
}
