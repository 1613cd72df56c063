//! Declarative chain configuration.
//!
//! A config carries two lists: `callbacks` (closures with priorities) and
//! `filters` (registry names with options and priorities). Malformed entries
//! are skipped and reported back instead of failing the whole config;
//! a well-formed entry naming an unknown filter still fails.

use crate::chain::{FilterChain, FilterSpec, DEFAULT_PRIORITY};
use serde_json::{Map, Value};
use sluice_core::{options_from_value, value_kind, Callback, FilterError, Options, Result};
use sluice_registry::FilterRegistry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A closure entry. `callback: None` is malformed and gets skipped.
#[derive(Debug, Clone, Default)]
pub struct CallbackConfig {
    pub callback: Option<Callback>,
    pub priority: Option<i32>,
}

impl CallbackConfig {
    pub fn new(callback: Callback) -> Self {
        Self { callback: Some(callback), priority: None }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Bulk description of a chain.
///
/// Filter entries stay loosely typed (`{"name", "options", "priority"}`
/// objects) so malformed ones can be reported rather than rejected up front.
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    pub callbacks: Vec<CallbackConfig>,
    pub filters: Vec<Value>,
}

impl ChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(mut self, entry: CallbackConfig) -> Self {
        self.callbacks.push(entry);
        self
    }

    pub fn filter(mut self, spec: Value) -> Self {
        self.filters.push(spec);
        self
    }

    /// Read a config object such as `{"filters": [{"name": "StringTrim"}]}`.
    ///
    /// Closures cannot be expressed in JSON, so each `callbacks` item turns
    /// into an entry without a callback and is reported as skipped.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(FilterError::invalid_argument(format!(
                "chain config must be an object, got {}",
                value_kind(value)
            )));
        };
        let mut config = Self::new();
        for (key, section) in map {
            match key.as_str() {
                "filters" => config.filters = section_items(key, section)?,
                "callbacks" => {
                    config.callbacks = section_items(key, section)?
                        .iter()
                        .map(|item| CallbackConfig {
                            callback: None,
                            priority: item
                                .get("priority")
                                .and_then(Value::as_i64)
                                .and_then(|p| i32::try_from(p).ok()),
                        })
                        .collect();
                }
                other => debug!(key = other, "ignoring unknown chain config key"),
            }
        }
        Ok(config)
    }
}

fn section_items(key: &str, section: &Value) -> Result<Vec<Value>> {
    match section {
        Value::Array(items) => Ok(items.clone()),
        Value::Null => Ok(Vec::new()),
        other => Err(FilterError::invalid_argument(format!(
            "chain config '{key}' must be a list, got {}",
            value_kind(other)
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Callbacks,
    Filters,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callbacks => f.write_str("callbacks"),
            Self::Filters => f.write_str("filters"),
        }
    }
}

/// A config entry that was not attached, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub section: Section,
    pub index: usize,
    pub reason: String,
}

/// A chain built from config plus the entries left out of it.
#[derive(Debug, Clone)]
pub struct ParsedChain {
    pub chain: FilterChain,
    pub skipped: Vec<SkippedEntry>,
}

/// A filter entry that passed shape checks.
struct FilterEntry {
    name: String,
    options: Options,
    priority: i32,
}

fn parse_filter_entry(spec: &Value) -> std::result::Result<FilterEntry, String> {
    let map: &Map<String, Value> = spec
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", value_kind(spec)))?;
    let name = match map.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(other) => return Err(format!("name must be a non-empty string, got {}", value_kind(other))),
        None => return Err("missing name".to_string()),
    };
    let priority = match map.get("priority") {
        None | Some(Value::Null) => DEFAULT_PRIORITY,
        Some(p) => p
            .as_i64()
            .and_then(|p| i32::try_from(p).ok())
            .ok_or_else(|| format!("priority must be a 32-bit integer, got {p}"))?,
    };
    let options = match map.get("options") {
        None => Options::new(),
        Some(raw) => options_from_value(raw).map_err(|e| e.to_string())?,
    };
    Ok(FilterEntry { name, options, priority })
}

impl FilterChain {
    /// Attach every well-formed entry of `config`; return the skipped ones.
    ///
    /// Callbacks are attached before filters. Every filter entry is resolved
    /// before the chain is touched, so a registry failure for a well-formed
    /// entry is returned as an error and leaves the chain unchanged.
    pub fn configure(&mut self, config: &ChainConfig) -> Result<Vec<SkippedEntry>> {
        let mut skipped = Vec::new();
        let mut skip = |section: Section, index: usize, reason: String| {
            warn!(%section, index, reason = %reason, "skipping malformed chain config entry");
            skipped.push(SkippedEntry { section, index, reason });
        };

        let mut callbacks = Vec::new();
        for (index, entry) in config.callbacks.iter().enumerate() {
            match &entry.callback {
                Some(cb) => {
                    callbacks.push((cb.clone(), entry.priority.unwrap_or(DEFAULT_PRIORITY)));
                }
                None => skip(Section::Callbacks, index, "missing callback".to_string()),
            }
        }

        let mut filters = Vec::new();
        for (index, spec) in config.filters.iter().enumerate() {
            match parse_filter_entry(spec) {
                Ok(entry) => {
                    let plugin = self.plugin(&entry.name, &entry.options)?;
                    let spec = FilterSpec { name: entry.name, options: entry.options };
                    filters.push((spec, plugin, entry.priority));
                }
                Err(reason) => skip(Section::Filters, index, reason),
            }
        }

        for (callback, priority) in callbacks {
            self.attach(callback, priority);
        }
        for (spec, plugin, priority) in filters {
            debug!(name = %spec.name, priority, "attached filter by name");
            self.push_spec(spec, plugin, priority);
        }
        Ok(skipped)
    }
}

/// Build a chain from `config`, resolving names through `registry`.
pub fn parse_config(config: &ChainConfig, registry: Arc<FilterRegistry>) -> Result<ParsedChain> {
    let mut chain = FilterChain::with_registry(registry);
    let skipped = chain.configure(config)?;
    debug!(attached = chain.len(), skipped = skipped.len(), "parsed chain config");
    Ok(ParsedChain { chain, skipped })
}
