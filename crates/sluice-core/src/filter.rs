//! The filter capability and the two shapes a chain accepts: filter objects and callbacks.

use crate::error::Result;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A single value-in/value-out transformation.
///
/// Implementations may keep state behind interior mutability; chains and
/// registries never inspect it.
pub trait Filter: Send + Sync {
    /// Transform one value.
    fn filter(&self, value: Value) -> Result<Value>;

    /// Name used in logs and debug output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

type CallbackFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// A shared closure used as a filter.
#[derive(Clone)]
pub struct Callback {
    name: Arc<str>,
    func: Arc<CallbackFn>,
}

impl Callback {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::named("callback", func)
    }

    pub fn named<F>(name: impl AsRef<str>, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self { name: Arc::from(name.as_ref()), func: Arc::new(func) }
    }

    pub fn call(&self, value: Value) -> Result<Value> {
        (self.func)(value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both handles share the same closure.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Anything a chain can run: a filter object or a callback.
#[derive(Clone)]
pub enum Plugin {
    Filter(Arc<dyn Filter>),
    Callback(Callback),
}

impl Plugin {
    pub fn from_filter<F: Filter + 'static>(filter: F) -> Self {
        Self::Filter(Arc::new(filter))
    }

    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::Callback(Callback::new(func))
    }

    /// Run the unit: `filter` for objects, a direct call for callbacks.
    pub fn apply(&self, value: Value) -> Result<Value> {
        match self {
            Self::Filter(f) => f.filter(value),
            Self::Callback(cb) => cb.call(value),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Filter(f) => f.name(),
            Self::Callback(cb) => cb.name(),
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    pub fn as_filter(&self) -> Option<&Arc<dyn Filter>> {
        match self {
            Self::Filter(f) => Some(f),
            Self::Callback(_) => None,
        }
    }

    /// True when both plugins share the same underlying unit.
    pub fn ptr_eq(&self, other: &Plugin) -> bool {
        match (self, other) {
            (Self::Filter(a), Self::Filter(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Self::Callback(a), Self::Callback(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(filter) => f.debug_tuple("Filter").field(&filter.name()).finish(),
            Self::Callback(cb) => f.debug_tuple("Callback").field(&cb.name()).finish(),
        }
    }
}

impl<F: Filter + 'static> From<F> for Plugin {
    fn from(filter: F) -> Self {
        Self::from_filter(filter)
    }
}

impl From<Arc<dyn Filter>> for Plugin {
    fn from(filter: Arc<dyn Filter>) -> Self {
        Self::Filter(filter)
    }
}

impl From<Callback> for Plugin {
    fn from(cb: Callback) -> Self {
        Self::Callback(cb)
    }
}

/// A type-erased value that may or may not be a usable plugin.
///
/// Factories and dynamic attach paths hand these over; [`Candidate::into_plugin`]
/// accepts `Plugin`, `Arc<dyn Filter>`, `Box<dyn Filter>` and `Callback`.
pub struct Candidate {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Candidate {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self { value: Box::new(value), type_name: std::any::type_name::<T>() }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Downcast into a plugin, handing the candidate back when it is not one.
    pub fn into_plugin(self) -> std::result::Result<Plugin, Candidate> {
        let type_name = self.type_name;
        let value = match self.value.downcast::<Plugin>() {
            Ok(plugin) => return Ok(*plugin),
            Err(v) => v,
        };
        let value = match value.downcast::<Arc<dyn Filter>>() {
            Ok(filter) => return Ok(Plugin::Filter(*filter)),
            Err(v) => v,
        };
        let value = match value.downcast::<Box<dyn Filter>>() {
            Ok(filter) => return Ok(Plugin::Filter(Arc::from(*filter))),
            Err(v) => v,
        };
        match value.downcast::<Callback>() {
            Ok(cb) => Ok(Plugin::Callback(*cb)),
            Err(value) => Err(Candidate { value, type_name }),
        }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("type_name", &self.type_name).finish()
    }
}

impl From<Plugin> for Candidate {
    fn from(plugin: Plugin) -> Self {
        Candidate::new(plugin)
    }
}
