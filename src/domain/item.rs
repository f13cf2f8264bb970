use serde_json::{Map, Value};

use super::bag::is_valid_name;
use super::error::DataBagError;

/// A single JSON document in a data bag.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBagItem {
    raw_data: Map<String, Value>,
}

impl DataBagItem {
    /// Builds an item from a parsed document. A missing `id` is filled with `default_id`.
    pub fn from_value(value: Value, default_id: Option<&str>) -> Result<Self, DataBagError> {
        let mut raw_data = match value {
            Value::Object(map) => map,
            other => {
                return Err(DataBagError::InvalidItem(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        if !raw_data.contains_key("id") {
            if let Some(id) = default_id {
                raw_data.insert("id".to_string(), Value::String(id.to_string()));
            }
        }

        let id = match raw_data.get("id") {
            Some(Value::String(id)) => id,
            Some(_) => {
                return Err(DataBagError::InvalidItem(
                    "'id' must be a string".to_string(),
                ))
            }
            None => {
                return Err(DataBagError::InvalidItem(
                    "item is missing an 'id'".to_string(),
                ))
            }
        };

        if !is_valid_name(id) {
            return Err(DataBagError::InvalidItem(format!(
                "Data Bag items must have an id matching /^[\\.\\-[:alnum:]_]+$/, you gave: '{}'",
                id
            )));
        }

        Ok(Self { raw_data })
    }

    pub fn id(&self) -> &str {
        self.raw_data
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn raw_data(&self) -> &Map<String, Value> {
        &self.raw_data
    }

    pub fn into_raw_data(self) -> Map<String, Value> {
        self.raw_data
    }
}

/// Parses user-supplied JSON. Only plain JSON values are produced; no type tags are interpreted.
pub fn validate_json_string(raw: &str) -> Result<Value, DataBagError> {
    serde_json::from_str::<Value>(raw).map_err(|e| DataBagError::Syntax {
        text: raw.to_string(),
        message: e.to_string(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
