//! The filter chain.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sluice_core::{Candidate, Filter, FilterError, Options, Plugin, Result};
use sluice_registry::FilterRegistry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Priority used when none is given.
pub const DEFAULT_PRIORITY: i32 = 1000;

/// Registry name and options an entry was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    #[serde(default)]
    pub options: Options,
}

/// One attached unit with its priority.
#[derive(Clone)]
pub struct ChainEntry {
    plugin: Plugin,
    priority: i32,
    origin: Option<FilterSpec>,
}

impl ChainEntry {
    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Set when the entry was attached by name.
    pub fn origin(&self) -> Option<&FilterSpec> {
        self.origin.as_ref()
    }
}

impl fmt::Debug for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEntry")
            .field("plugin", &self.plugin)
            .field("priority", &self.priority)
            .field("origin", &self.origin.as_ref().map(|o| o.name.as_str()))
            .finish()
    }
}

/// A priority-ordered sequence of filters and callbacks.
///
/// Entries are kept sorted by descending priority, so iteration never
/// reorders or drains the chain. Cloning copies the ordering and shares the
/// attached units. Mutation needs `&mut self`; hand a clone to each thread
/// that needs its own chain.
#[derive(Clone, Default)]
pub struct FilterChain {
    entries: Vec<ChainEntry>,
    registry: Option<Arc<FilterRegistry>>,
}

impl FilterChain {
    /// An empty chain; the built-in registry is created on first by-name attach.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Arc<FilterRegistry>) -> Self {
        Self { entries: Vec::new(), registry: Some(registry) }
    }

    pub fn set_registry(&mut self, registry: Arc<FilterRegistry>) -> &mut Self {
        self.registry = Some(registry);
        self
    }

    /// The registry used for by-name attachment, created on demand.
    pub fn registry(&mut self) -> &Arc<FilterRegistry> {
        self.registry.get_or_insert_with(sluice_filters::default_registry)
    }

    pub fn has_registry(&self) -> bool {
        self.registry.is_some()
    }

    /// Attach a filter or callback at `priority`.
    pub fn attach(&mut self, plugin: impl Into<Plugin>, priority: i32) -> &mut Self {
        self.insert(ChainEntry { plugin: plugin.into(), priority, origin: None });
        self
    }

    /// Attach at [`DEFAULT_PRIORITY`].
    pub fn attach_default(&mut self, plugin: impl Into<Plugin>) -> &mut Self {
        self.attach(plugin, DEFAULT_PRIORITY)
    }

    /// Attach a type-erased value, rejecting anything that is not a filter or callback.
    pub fn attach_any(&mut self, candidate: Candidate, priority: i32) -> Result<&mut Self> {
        let plugin = candidate.into_plugin().map_err(|rejected| {
            FilterError::invalid_argument(format!(
                "expected a filter or callback, got {}",
                rejected.type_name()
            ))
        })?;
        Ok(self.attach(plugin, priority))
    }

    /// Build `name` with `options` from the registry and attach it.
    ///
    /// Resolution errors are returned unchanged and leave the chain untouched.
    pub fn attach_by_name(
        &mut self,
        name: &str,
        options: Options,
        priority: i32,
    ) -> Result<&mut Self> {
        let plugin = self.registry().build(name, &options)?;
        debug!(name, priority, "attached filter by name");
        self.insert(ChainEntry {
            plugin,
            priority,
            origin: Some(FilterSpec { name: name.to_string(), options }),
        });
        Ok(self)
    }

    /// Build a plugin from the registry without attaching it.
    pub fn plugin(&mut self, name: &str, options: &Options) -> Result<Plugin> {
        self.registry().build(name, options)
    }

    /// Append every entry of `other`, keeping its priorities.
    ///
    /// Merged entries land after existing entries of equal priority.
    pub fn merge(&mut self, other: &FilterChain) -> &mut Self {
        debug!(incoming = other.len(), existing = self.len(), "merging filter chains");
        for entry in &other.entries {
            self.insert(entry.clone());
        }
        if self.registry.is_none() {
            self.registry = other.registry.clone();
        }
        self
    }

    /// Run `value` through every entry in order.
    ///
    /// An empty chain returns its input. The first error stops the chain and
    /// is returned as-is.
    pub fn filter(&self, value: Value) -> Result<Value> {
        self.entries.iter().try_fold(value, |acc, entry| {
            trace!(unit = entry.plugin.name(), priority = entry.priority, "applying filter");
            entry.plugin.apply(acc)
        })
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attached units in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Plugin> + Clone + '_ {
        self.entries.iter().map(ChainEntry::plugin)
    }

    /// Entries with their priorities, in execution order.
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Snapshot of the attached units.
    pub fn plugins(&self) -> Vec<Plugin> {
        self.iter().cloned().collect()
    }

    /// Remove every entry.
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    pub(crate) fn insert(&mut self, entry: ChainEntry) {
        trace!(unit = entry.plugin.name(), priority = entry.priority, "attaching filter");
        // Sorted by descending priority; insert after every entry of equal or
        // higher priority so ties keep attach order.
        let at = self.entries.partition_point(|e| e.priority >= entry.priority);
        self.entries.insert(at, entry);
    }

    pub(crate) fn push_spec(&mut self, spec: FilterSpec, plugin: Plugin, priority: i32) {
        self.insert(ChainEntry { plugin, priority, origin: Some(spec) });
    }
}

impl Filter for FilterChain {
    fn filter(&self, value: Value) -> Result<Value> {
        FilterChain::filter(self, value)
    }

    fn name(&self) -> &str {
        "FilterChain"
    }
}

impl<'a> IntoIterator for &'a FilterChain {
    type Item = &'a Plugin;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, ChainEntry>, fn(&ChainEntry) -> &Plugin>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().map(ChainEntry::plugin as fn(&ChainEntry) -> &Plugin)
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("entries", &self.entries)
            .field("has_registry", &self.registry.is_some())
            .finish()
    }
}
