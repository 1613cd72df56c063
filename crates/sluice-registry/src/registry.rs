//! Name → factory registry with aliases and a shared-instance cache.

use crate::config::RegistryConfig;
use parking_lot::RwLock;
use sluice_core::{
    Callback, Candidate, Filter, FilterError, Options, Plugin, ResolutionError, Result,
};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds a candidate plugin from an options map.
pub type Factory = Arc<dyn Fn(&Options) -> Result<Candidate> + Send + Sync>;

/// Fold a name into its lookup key: lower-case, separators dropped.
///
/// `StringToUpper`, `stringtoupper` and `string_to_upper` share one key.
pub fn canonical_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' ' | '\\' | '/'))
        .flat_map(char::to_lowercase)
        .collect()
}

struct Registered {
    display_name: String,
    factory: Factory,
}

#[derive(Default)]
struct Inner {
    factories: HashMap<String, Registered>,
    aliases: HashMap<String, String>,
    shared: HashMap<String, Plugin>,
}

impl Inner {
    fn resolve(&self, name: &str) -> Result<String> {
        let mut current = canonical_name(name);
        let mut visited = HashSet::new();
        loop {
            if self.factories.contains_key(&current) {
                return Ok(current);
            }
            let Some(target) = self.aliases.get(&current) else {
                return Err(ResolutionError::NotFound { name: name.to_string() }.into());
            };
            if !visited.insert(current.clone()) {
                warn!(name, "alias cycle");
                return Err(ResolutionError::AliasCycle { name: name.to_string() }.into());
            }
            current = target.clone();
        }
    }
}

/// Resolves filter names to plugins.
///
/// Share one instance across threads as `Arc<FilterRegistry>`; the maps sit
/// behind a read-mostly lock and factories run with no lock held.
pub struct FilterRegistry {
    inner: RwLock<Inner>,
    config: RegistryConfig,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self { inner: RwLock::new(Inner::default()), config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a factory producing any type; the product is validated on resolution.
    pub fn register_factory<T, F>(&self, name: &str, factory: F) -> &Self
    where
        T: Any + Send + Sync,
        F: Fn(&Options) -> Result<T> + Send + Sync + 'static,
    {
        let factory: Factory =
            Arc::new(move |options: &Options| factory(options).map(Candidate::new));
        self.insert_factory(name, factory)
    }

    /// Register a constructor for a concrete filter type.
    pub fn register_filter<F, C>(&self, name: &str, ctor: C) -> &Self
    where
        F: Filter + 'static,
        C: Fn(&Options) -> Result<F> + Send + Sync + 'static,
    {
        self.register_factory(name, move |options| ctor(options).map(Plugin::from_filter))
    }

    /// Register a closure; every resolution hands out the same closure.
    pub fn register_callback(&self, name: &str, callback: Callback) -> &Self {
        self.register_factory(name, move |_| Ok(Plugin::Callback(callback.clone())))
    }

    /// Register a pre-built plugin; `get` and `build` both return it.
    pub fn register_instance(&self, name: &str, plugin: Plugin) -> &Self {
        self.register_factory(name, move |_| Ok(plugin.clone()))
    }

    fn insert_factory(&self, name: &str, factory: Factory) -> &Self {
        let key = canonical_name(name);
        debug!(name, key = %key, "registering filter factory");
        let mut inner = self.inner.write();
        inner.aliases.remove(&key);
        inner.shared.remove(&key);
        inner
            .factories
            .insert(key, Registered { display_name: name.to_string(), factory });
        self
    }

    /// Make `alias` resolve to whatever `target` resolves to.
    ///
    /// Fails if `alias` already names a registered factory.
    pub fn alias(&self, alias: &str, target: &str) -> Result<&Self> {
        let key = canonical_name(alias);
        let target_key = canonical_name(target);
        if key == target_key {
            return Err(FilterError::invalid_argument(format!(
                "alias '{alias}' cannot point at itself"
            )));
        }
        let mut inner = self.inner.write();
        if let Some(existing) = inner.factories.get(&key) {
            return Err(FilterError::invalid_argument(format!(
                "alias '{alias}' conflicts with registered filter '{}'",
                existing.display_name
            )));
        }
        debug!(alias, target, "registering filter alias");
        inner.aliases.insert(key, target_key);
        Ok(self)
    }

    /// Follow aliases to the canonical key of a registered factory.
    pub fn resolve_name(&self, name: &str) -> Result<String> {
        self.inner.read().resolve(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.resolve_name(name).is_ok()
    }

    /// Display names of every registered factory, sorted.
    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut names: Vec<String> =
            inner.factories.values().map(|r| r.display_name.clone()).collect();
        names.sort();
        names
    }

    /// Resolve a name to a plugin.
    ///
    /// Without options the product is cached per name and shared by later
    /// option-less calls (unless sharing is disabled). With options a fresh
    /// instance is always built.
    pub fn get(&self, name: &str, options: Option<&Options>) -> Result<Plugin> {
        match options {
            Some(options) => self.build(name, options),
            None if self.config.share_by_default => {
                let key = self.resolve_name(name)?;
                if let Some(plugin) = self.inner.read().shared.get(&key) {
                    return Ok(plugin.clone());
                }
                let plugin = self.construct(name, &key, &Options::new())?;
                let mut inner = self.inner.write();
                Ok(inner.shared.entry(key).or_insert(plugin).clone())
            }
            None => self.build(name, &Options::new()),
        }
    }

    /// Resolve a name and always construct a new instance.
    pub fn build(&self, name: &str, options: &Options) -> Result<Plugin> {
        let key = self.resolve_name(name)?;
        self.construct(name, &key, options)
    }

    fn construct(&self, name: &str, key: &str, options: &Options) -> Result<Plugin> {
        let factory = {
            let inner = self.inner.read();
            match inner.factories.get(key) {
                Some(registered) => Arc::clone(&registered.factory),
                None => return Err(ResolutionError::NotFound { name: name.to_string() }.into()),
            }
        };
        debug!(name, key, "building filter");
        let candidate = factory(options)?;
        validate(name, candidate)
    }
}

/// Accept only products a chain can run.
fn validate(name: &str, candidate: Candidate) -> Result<Plugin> {
    candidate.into_plugin().map_err(|rejected| {
        warn!(name, type_name = rejected.type_name(), "factory produced an invalid plugin");
        ResolutionError::InvalidPlugin {
            name: name.to_string(),
            type_name: rejected.type_name().to_string(),
        }
        .into()
    })
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("FilterRegistry")
            .field("factories", &inner.factories.len())
            .field("aliases", &inner.aliases.len())
            .field("shared", &inner.shared.len())
            .field("config", &self.config)
            .finish()
    }
}
