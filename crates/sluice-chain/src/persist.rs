//! Persisted form of a chain: registry names, options and priorities.
//!
//! Only entries attached by name can be persisted; instances and closures
//! cannot be reconstructed. The registry itself is never written out: a
//! deserialized chain re-creates the built-in registry when it next needs one.

use crate::chain::{FilterChain, FilterSpec};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sluice_core::{FilterError, Options, Result};
use sluice_registry::FilterRegistry;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub name: String,
    #[serde(default)]
    pub options: Options,
    pub priority: i32,
}

/// Serializable description of a chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub filters: Vec<PersistedEntry>,
}

impl FilterChain {
    /// Describe the chain in persistable form.
    pub fn snapshot(&self) -> Result<ChainSnapshot> {
        let filters = self
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry.origin() {
                Some(spec) => Ok(PersistedEntry {
                    name: spec.name.clone(),
                    options: spec.options.clone(),
                    priority: entry.priority(),
                }),
                None => Err(FilterError::Unsupported(format!(
                    "entry {i} ({}) was not attached by name and cannot be persisted",
                    entry.plugin().name()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ChainSnapshot { filters })
    }

    /// Rebuild a chain from a snapshot, building every entry from `registry`.
    pub fn restore(snapshot: ChainSnapshot, registry: Arc<FilterRegistry>) -> Result<Self> {
        let mut chain = FilterChain::with_registry(Arc::clone(&registry));
        chain.restore_entries(snapshot, &registry)?;
        Ok(chain)
    }

    fn restore_entries(&mut self, snapshot: ChainSnapshot, registry: &FilterRegistry) -> Result<()> {
        for entry in snapshot.filters {
            let plugin = registry.build(&entry.name, &entry.options)?;
            let spec = FilterSpec { name: entry.name, options: entry.options };
            self.push_spec(spec, plugin, entry.priority);
        }
        Ok(())
    }
}

impl Serialize for FilterChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.snapshot().map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterChain {
    /// Entries are rebuilt through a temporary built-in registry; the chain
    /// itself keeps none until it next needs one.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let snapshot = ChainSnapshot::deserialize(deserializer)?;
        let registry = sluice_filters::default_registry();
        let mut chain = FilterChain::new();
        chain.restore_entries(snapshot, &registry).map_err(D::Error::custom)?;
        Ok(chain)
    }
}
