//! Allow-list and deny-list filters.
//!
//! Both compare the input against a configured list of values. In strict
//! mode values must be equal as JSON; otherwise numbers compare by value
//! (`1 == 1.0`) and a number matches a string holding its textual form.

use serde::Deserialize;
use serde_json::Value;
use sluice_core::{parse_options, Filter, Options, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ListOptions {
    list: Vec<Value>,
    strict: bool,
}

#[derive(Debug, Clone, Default)]
struct ValueList {
    values: Vec<Value>,
    strict: bool,
}

impl ValueList {
    fn contains(&self, value: &Value) -> bool {
        if self.strict {
            return self.values.contains(value);
        }
        self.values.iter().any(|candidate| loose_eq(candidate, value))
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64().zip(y.as_f64()).is_some_and(|(x, y)| x == y),
        },
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim().parse::<f64>().ok().zip(n.as_f64()).is_some_and(|(x, y)| x == y)
        }
        _ => a == b,
    }
}

/// Pass values found in the list; everything else becomes null.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    list: ValueList,
}

impl AllowList {
    pub fn new(values: Vec<Value>, strict: bool) -> Self {
        Self { list: ValueList { values, strict } }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: ListOptions = parse_options("AllowList", options)?;
        Ok(Self::new(opts.list, opts.strict))
    }
}

impl Filter for AllowList {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(if self.list.contains(&value) { value } else { Value::Null })
    }

    fn name(&self) -> &str {
        "AllowList"
    }
}

/// Null out values found in the list; everything else passes.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    list: ValueList,
}

impl DenyList {
    pub fn new(values: Vec<Value>, strict: bool) -> Self {
        Self { list: ValueList { values, strict } }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: ListOptions = parse_options("DenyList", options)?;
        Ok(Self::new(opts.list, opts.strict))
    }
}

impl Filter for DenyList {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(if self.list.contains(&value) { Value::Null } else { value })
    }

    fn name(&self) -> &str {
        "DenyList"
    }
}
