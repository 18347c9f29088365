//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! JSON objects become [`Mapping`]s. An [`Object`](super::Object) is written
//! as a JSON object carrying its class name under `"$class"` followed by its
//! instance attributes; class-level and delegated attributes are not written.

use super::{Mapping, Value};
use crate::error::Result;
use serde_json::json;

const CLASS_KEY: &str = "$class";

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map(Value::Float).unwrap_or(Value::Null)
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Mapping>(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => json!(*i),
            Value::UInt(u) => json!(*u),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, item) in map.iter() {
                    out.insert(key.to_string(), serde_json::Value::from(item));
                }
                serde_json::Value::Object(out)
            }
            Value::Object(obj) => {
                let mut out = serde_json::Map::new();
                out.insert(CLASS_KEY.to_string(), json!(obj.class_name()));
                for (name, item) in obj.own_attrs() {
                    if name == CLASS_KEY {
                        log::warn!("event=to_json name={} status=skipped reason=reserved", name);
                        continue;
                    }
                    out.insert(name.to_string(), serde_json::Value::from(item));
                }
                serde_json::Value::Object(out)
            }
        }
    }
}

impl Value {
    /// Parses JSON text into a value.
    pub fn from_json_str(text: &str) -> Result<Value> {
        let parsed: serde_json::Value = serde_json::from_str(text)?;
        Ok(Value::from(parsed))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}
