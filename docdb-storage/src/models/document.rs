//! Schema-free JSON document.
//!
//! The identifier lives in `_id` and the revision marker in `_rev`, as the service stores them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StorageError;

pub const ID_FIELD: &str = "_id";
pub const REV_FIELD: &str = "_rev";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document; the service assigns an id on insert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; anything other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, StorageError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StorageError::InvalidArgument(format!(
                "document must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.into()));
        self
    }

    /// Sets a field, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn rev(&self) -> Option<&str> {
        self.0.get(REV_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = StorageError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
