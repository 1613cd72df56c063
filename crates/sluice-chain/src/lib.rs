//! Sluice chain: priority-ordered composition of filters.
//!
//! Entries run from the highest priority number to the lowest; entries that
//! share a priority run in the order they were attached. Filters can be
//! attached as instances, as closures, or by name through a
//! [`FilterRegistry`](sluice_registry::FilterRegistry).

pub mod chain;
pub mod config;
pub mod persist;

pub use chain::{ChainEntry, FilterChain, FilterSpec, DEFAULT_PRIORITY};
pub use config::{parse_config, CallbackConfig, ChainConfig, ParsedChain, Section, SkippedEntry};
pub use persist::{ChainSnapshot, PersistedEntry};
