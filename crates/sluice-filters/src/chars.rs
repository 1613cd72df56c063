//! Character-class filters and regex replacement.

use crate::util::map_strings;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use sluice_core::{parse_options, Filter, FilterError, Options, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CharClassOptions {
    allow_white_space: bool,
}

/// Keep only ASCII digits. Numbers are filtered through their textual form.
#[derive(Debug, Default, Clone)]
pub struct Digits;

impl Digits {
    pub fn from_options(options: &Options) -> Result<Self> {
        parse_options::<crate::util::NoOptions>("Digits", options)?;
        Ok(Self)
    }
}

impl Filter for Digits {
    fn filter(&self, value: Value) -> Result<Value> {
        let keep = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
        Ok(match value {
            Value::Number(n) => Value::String(keep(&n.to_string())),
            other => map_strings(other, keep),
        })
    }

    fn name(&self) -> &str {
        "Digits"
    }
}

/// Keep alphabetic characters, optionally whitespace too.
#[derive(Debug, Default, Clone)]
pub struct Alpha {
    allow_white_space: bool,
}

impl Alpha {
    pub fn new(allow_white_space: bool) -> Self {
        Self { allow_white_space }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: CharClassOptions = parse_options("Alpha", options)?;
        Ok(Self::new(opts.allow_white_space))
    }
}

impl Filter for Alpha {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| {
            s.chars()
                .filter(|c| c.is_alphabetic() || (self.allow_white_space && c.is_whitespace()))
                .collect()
        }))
    }

    fn name(&self) -> &str {
        "Alpha"
    }
}

/// Keep alphanumeric characters, optionally whitespace too.
#[derive(Debug, Default, Clone)]
pub struct Alnum {
    allow_white_space: bool,
}

impl Alnum {
    pub fn new(allow_white_space: bool) -> Self {
        Self { allow_white_space }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: CharClassOptions = parse_options("Alnum", options)?;
        Ok(Self::new(opts.allow_white_space))
    }
}

impl Filter for Alnum {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| {
            s.chars()
                .filter(|c| c.is_alphanumeric() || (self.allow_white_space && c.is_whitespace()))
                .collect()
        }))
    }

    fn name(&self) -> &str {
        "Alnum"
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PregReplaceOptions {
    pattern: String,
    #[serde(default)]
    replacement: String,
}

/// Replace every match of a regular expression.
///
/// The replacement uses `$1` / `${name}` group syntax.
#[derive(Debug, Clone)]
pub struct PregReplace {
    pattern: Regex,
    replacement: String,
}

impl PregReplace {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| FilterError::invalid_argument(format!("PregReplace: bad pattern: {e}")))?;
        Ok(Self { pattern, replacement: replacement.into() })
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: PregReplaceOptions = parse_options("PregReplace", options)?;
        Self::new(&opts.pattern, opts.replacement)
    }
}

impl Filter for PregReplace {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| {
            self.pattern.replace_all(s, self.replacement.as_str()).into_owned()
        }))
    }

    fn name(&self) -> &str {
        "PregReplace"
    }
}
