//! String filters: case conversion, trimming, newline removal, affixes.

use crate::util::{map_strings, NoOptions};
use serde::Deserialize;
use serde_json::Value;
use sluice_core::{parse_options, Filter, Options, Result};

/// Upper-case strings (Unicode default mapping).
#[derive(Debug, Default, Clone)]
pub struct StringToUpper;

impl StringToUpper {
    pub fn from_options(options: &Options) -> Result<Self> {
        parse_options::<NoOptions>("StringToUpper", options)?;
        Ok(Self)
    }
}

impl Filter for StringToUpper {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, str::to_uppercase))
    }

    fn name(&self) -> &str {
        "StringToUpper"
    }
}

/// Lower-case strings (Unicode default mapping).
#[derive(Debug, Default, Clone)]
pub struct StringToLower;

impl StringToLower {
    pub fn from_options(options: &Options) -> Result<Self> {
        parse_options::<NoOptions>("StringToLower", options)?;
        Ok(Self)
    }
}

impl Filter for StringToLower {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, str::to_lowercase))
    }

    fn name(&self) -> &str {
        "StringToLower"
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TrimOptions {
    charlist: Option<String>,
}

/// Trim whitespace, or the characters of `charlist`, from both ends.
#[derive(Debug, Default, Clone)]
pub struct StringTrim {
    charlist: Option<Vec<char>>,
}

impl StringTrim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_charlist(charlist: &str) -> Self {
        Self { charlist: Some(charlist.chars().collect()) }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: TrimOptions = parse_options("StringTrim", options)?;
        Ok(match opts.charlist {
            Some(list) if !list.is_empty() => Self::with_charlist(&list),
            _ => Self::new(),
        })
    }

    fn trim(&self, s: &str) -> String {
        match &self.charlist {
            Some(chars) => s.trim_matches(|c| chars.contains(&c)).to_string(),
            None => s.trim().to_string(),
        }
    }
}

impl Filter for StringTrim {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| self.trim(s)))
    }

    fn name(&self) -> &str {
        "StringTrim"
    }
}

/// Remove carriage returns and line feeds.
#[derive(Debug, Default, Clone)]
pub struct StripNewlines;

impl StripNewlines {
    pub fn from_options(options: &Options) -> Result<Self> {
        parse_options::<NoOptions>("StripNewlines", options)?;
        Ok(Self)
    }
}

impl Filter for StripNewlines {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| s.replace(['\r', '\n'], "")))
    }

    fn name(&self) -> &str {
        "StripNewlines"
    }
}

/// Text form of a scalar that can carry an affix.
fn affix_target(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrefixOptions {
    prefix: String,
}

/// Prepend a fixed string to strings and numbers.
#[derive(Debug, Clone)]
pub struct StringPrefix {
    prefix: String,
}

impl StringPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: PrefixOptions = parse_options("StringPrefix", options)?;
        Ok(Self::new(opts.prefix))
    }
}

impl Filter for StringPrefix {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(match affix_target(&value) {
            Some(text) => Value::String(format!("{}{text}", self.prefix)),
            None => value,
        })
    }

    fn name(&self) -> &str {
        "StringPrefix"
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuffixOptions {
    suffix: String,
}

/// Append a fixed string to strings and numbers.
#[derive(Debug, Clone)]
pub struct StringSuffix {
    suffix: String,
}

impl StringSuffix {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: SuffixOptions = parse_options("StringSuffix", options)?;
        Ok(Self::new(opts.suffix))
    }
}

impl Filter for StringSuffix {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(match affix_target(&value) {
            Some(text) => Value::String(format!("{text}{}", self.suffix)),
            None => value,
        })
    }

    fn name(&self) -> &str {
        "StringSuffix"
    }
}
