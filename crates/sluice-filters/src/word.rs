//! Word-form filters: camel case to and from separated words.

use crate::util::map_strings;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use sluice_core::{parse_options, Filter, FilterError, Options, Result};

fn require_separator(filter: &str, separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(FilterError::invalid_argument(format!("{filter}: separator must not be empty")));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SeparatorOptions {
    separator: String,
}

impl Default for SeparatorOptions {
    fn default() -> Self {
        Self { separator: " ".into() }
    }
}

/// Split camel-cased words with a separator: `CamelCaseWord` → `Camel Case Word`.
///
/// A boundary sits before an upper-case letter that follows a lower-case
/// letter or digit, and before the last capital of an acronym that is
/// followed by a lower-case letter (`HTMLParser` → `HTML Parser`).
#[derive(Debug, Clone)]
pub struct CamelCaseToSeparator {
    name: &'static str,
    separator: String,
}

impl CamelCaseToSeparator {
    pub fn new(separator: impl Into<String>) -> Self {
        Self { name: "CamelCaseToSeparator", separator: separator.into() }
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: SeparatorOptions = parse_options("CamelCaseToSeparator", options)?;
        require_separator("CamelCaseToSeparator", &opts.separator)?;
        Ok(Self::new(opts.separator))
    }

    /// `CamelCaseToDash`.
    pub fn dash() -> Self {
        Self { name: "CamelCaseToDash", separator: "-".into() }
    }

    /// `CamelCaseToUnderscore`.
    pub fn underscore() -> Self {
        Self { name: "CamelCaseToUnderscore", separator: "_".into() }
    }

    pub fn split(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut out = String::with_capacity(s.len() + 8);
        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && c.is_uppercase() {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_lower) {
                    out.push_str(&self.separator);
                }
            }
            out.push(c);
        }
        out
    }
}

impl Filter for CamelCaseToSeparator {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| self.split(s)))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Join separated words into camel case: `foo bar` → `FooBar`.
#[derive(Debug, Clone)]
pub struct SeparatorToCamelCase {
    name: &'static str,
    boundary: Regex,
}

impl SeparatorToCamelCase {
    pub fn new(separator: &str) -> Result<Self> {
        require_separator("SeparatorToCamelCase", separator)?;
        Ok(Self::named("SeparatorToCamelCase", separator))
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: SeparatorOptions = parse_options("SeparatorToCamelCase", options)?;
        Self::new(&opts.separator)
    }

    /// `DashToCamelCase`.
    pub fn dash() -> Self {
        Self::named("DashToCamelCase", "-")
    }

    /// `UnderscoreToCamelCase`.
    pub fn underscore() -> Self {
        Self::named("UnderscoreToCamelCase", "_")
    }

    fn named(name: &'static str, separator: &str) -> Self {
        let boundary = Regex::new(&format!(r"{}(\P{{Z}})", regex::escape(separator)))
            .expect("escaped separator is a valid pattern");
        Self { name, boundary }
    }

    pub fn join(&self, s: &str) -> String {
        let joined = self
            .boundary
            .replace_all(s, |caps: &regex::Captures| caps[1].to_uppercase());
        upper_first(&joined)
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Filter for SeparatorToCamelCase {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| self.join(s)))
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SeparatorToSeparatorOptions {
    search_separator: String,
    replacement_separator: String,
}

impl Default for SeparatorToSeparatorOptions {
    fn default() -> Self {
        Self { search_separator: " ".into(), replacement_separator: "-".into() }
    }
}

/// Swap one separator for another: `foo bar` → `foo-bar`.
#[derive(Debug, Clone)]
pub struct SeparatorToSeparator {
    name: &'static str,
    search: String,
    replacement: String,
}

impl SeparatorToSeparator {
    pub fn new(search: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
        let search = search.into();
        require_separator("SeparatorToSeparator", &search)?;
        Ok(Self { name: "SeparatorToSeparator", search, replacement: replacement.into() })
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let opts: SeparatorToSeparatorOptions = parse_options("SeparatorToSeparator", options)?;
        Self::new(opts.search_separator, opts.replacement_separator)
    }

    /// `DashToUnderscore`.
    pub fn dash_to_underscore() -> Self {
        Self { name: "DashToUnderscore", search: "-".into(), replacement: "_".into() }
    }

    /// `UnderscoreToDash`.
    pub fn underscore_to_dash() -> Self {
        Self { name: "UnderscoreToDash", search: "_".into(), replacement: "-".into() }
    }
}

impl Filter for SeparatorToSeparator {
    fn filter(&self, value: Value) -> Result<Value> {
        Ok(map_strings(value, |s| s.replace(&self.search, &self.replacement)))
    }

    fn name(&self) -> &str {
        self.name
    }
}
