//! Option maps handed to factories, and typed parsing of them.

use crate::error::{FilterError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Free-form options passed to a filter factory.
pub type Options = Map<String, Value>;

/// Normalize a loosely shaped options value.
///
/// Accepts an object, `null` (empty options) or an array of `[key, value]` pairs.
pub fn options_from_value(value: &Value) -> Result<Options> {
    match value {
        Value::Null => Ok(Options::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::Array(pairs) => {
            let mut options = Options::new();
            for pair in pairs {
                match pair.as_array().map(Vec::as_slice) {
                    Some([Value::String(key), value]) => {
                        options.insert(key.clone(), value.clone());
                    }
                    _ => {
                        return Err(FilterError::invalid_argument(format!(
                            "expected [key, value] pair in options, got {pair}"
                        )))
                    }
                }
            }
            Ok(options)
        }
        other => Err(FilterError::invalid_argument(format!(
            "options must be an object or a list of key/value pairs, got {}",
            value_kind(other)
        ))),
    }
}

/// Deserialize an options map into a filter's typed configuration.
///
/// Option structs use `#[serde(deny_unknown_fields)]`, so unknown keys fail here.
pub fn parse_options<T: DeserializeOwned>(filter: &str, options: &Options) -> Result<T> {
    serde_json::from_value(Value::Object(options.clone()))
        .map_err(|e| FilterError::invalid_argument(format!("{filter}: {e}")))
}

/// Short name of a JSON value's type, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
