//! Cast filters: integer, float, null and boolean conversion.

use crate::util::NoOptions;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Number, Value};
use sluice_core::{parse_options, Filter, Options, Result};
use std::sync::LazyLock;

static RE_LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());
static RE_LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Integer value of a string's leading digits; 0 when there are none.
fn leading_int(s: &str) -> i64 {
    RE_LEADING_INT
        .captures(s)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .unwrap_or(0)
}

fn leading_float(s: &str) -> f64 {
    RE_LEADING_FLOAT
        .captures(s)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Cast scalars to integers. Null, arrays and objects pass through.
#[derive(Debug, Default, Clone)]
pub struct ToInt;

impl ToInt {
    pub fn from_options(options: &Options) -> Result<Self> {
        parse_options::<NoOptions>("ToInt", options)?;
        Ok(Self)
    }
}

impl Filter for ToInt {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Value::Number(n),
            Value::Number(n) => {
                let f = n.as_f64().unwrap_or(0.0);
                Value::from(f.trunc() as i64)
            }
            Value::String(s) => Value::from(leading_int(&s)),
            Value::Bool(b) => Value::from(i64::from(b)),
            other => other,
        })
    }

    fn name(&self) -> &str {
        "ToInt"
    }
}

/// Cast scalars to floats. Null, arrays and objects pass through.
#[derive(Debug, Default, Clone)]
pub struct ToFloat;

impl ToFloat {
    pub fn from_options(options: &Options) -> Result<Self> {
        parse_options::<NoOptions>("ToFloat", options)?;
        Ok(Self)
    }
}

impl Filter for ToFloat {
    fn filter(&self, value: Value) -> Result<Value> {
        let f = match &value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => leading_float(s),
            Value::Bool(b) => f64::from(u8::from(*b)),
            _ => return Ok(value),
        };
        Ok(Number::from_f64(f).map(Value::Number).unwrap_or(value))
    }

    fn name(&self) -> &str {
        "ToFloat"
    }
}

/// Value classes that can be treated as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyKind {
    /// `false`
    Boolean,
    /// `0`
    Integer,
    /// `0.0`
    Float,
    /// `""`
    String,
    /// `"0"`
    Zero,
    /// `[]`
    EmptyArray,
    /// `null`
    Null,
    /// `"false"`, case-insensitive
    FalseString,
}

impl EmptyKind {
    const DEFAULTS: &'static [EmptyKind] = &[
        EmptyKind::Boolean,
        EmptyKind::Integer,
        EmptyKind::Float,
        EmptyKind::String,
        EmptyKind::Zero,
        EmptyKind::EmptyArray,
        EmptyKind::Null,
    ];

    fn is_empty(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Boolean, Value::Bool(b)) => !b,
            (Self::Integer, Value::Number(n)) => n.as_i64() == Some(0) || n.as_u64() == Some(0),
            (Self::Float, Value::Number(n)) => n.is_f64() && n.as_f64() == Some(0.0),
            (Self::String, Value::String(s)) => s.is_empty(),
            (Self::Zero, Value::String(s)) => s == "0",
            (Self::EmptyArray, Value::Array(a)) => a.is_empty(),
            (Self::Null, Value::Null) => true,
            (Self::FalseString, Value::String(s)) => s.eq_ignore_ascii_case("false"),
            _ => false,
        }
    }

    /// The "true" counterpart recognised when boolean casting is off.
    fn is_truthy(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Boolean, Value::Bool(b)) => *b,
            (Self::Integer, Value::Number(n)) => n.as_i64() == Some(1),
            (Self::Float, Value::Number(n)) => n.is_f64() && n.as_f64() == Some(1.0),
            (Self::Zero, Value::String(s)) => s == "1",
            (Self::FalseString, Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ToNullOptions {
    types: Option<Vec<EmptyKind>>,
}

/// Replace "empty" values with null.
#[derive(Debug, Clone)]
pub struct ToNull {
    types: Vec<EmptyKind>,
}

impl ToNull {
    pub fn new(types: Vec<EmptyKind>) -> Self {
        Self { types }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: ToNullOptions = parse_options("ToNull", options)?;
        Ok(opts.types.map(Self::new).unwrap_or_default())
    }
}

impl Default for ToNull {
    fn default() -> Self {
        Self::new(EmptyKind::DEFAULTS.to_vec())
    }
}

impl Filter for ToNull {
    fn filter(&self, value: Value) -> Result<Value> {
        if self.types.iter().any(|t| t.is_empty(&value)) {
            return Ok(Value::Null);
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "ToNull"
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct BooleanOptions {
    casting: bool,
    types: Option<Vec<EmptyKind>>,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self { casting: true, types: None }
    }
}

/// Convert values to booleans.
///
/// Values matching one of `types` become `false`. With casting on, everything
/// else becomes `true`; with casting off, only the matching "true"
/// counterparts (`true`, `1`, `"1"`, `"true"`) do and the rest pass through.
#[derive(Debug, Clone)]
pub struct Boolean {
    casting: bool,
    types: Vec<EmptyKind>,
}

impl Boolean {
    pub fn new(casting: bool, types: Vec<EmptyKind>) -> Self {
        Self { casting, types }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: BooleanOptions = parse_options("Boolean", options)?;
        let types = opts.types.unwrap_or_else(|| EmptyKind::DEFAULTS.to_vec());
        Ok(Self::new(opts.casting, types))
    }
}

impl Default for Boolean {
    fn default() -> Self {
        Self::new(true, EmptyKind::DEFAULTS.to_vec())
    }
}

impl Filter for Boolean {
    fn filter(&self, value: Value) -> Result<Value> {
        if self.types.iter().any(|t| t.is_empty(&value)) {
            return Ok(Value::Bool(false));
        }
        if self.casting || self.types.iter().any(|t| t.is_truthy(&value)) {
            return Ok(Value::Bool(true));
        }
        Ok(value)
    }

    fn name(&self) -> &str {
        "Boolean"
    }
}
