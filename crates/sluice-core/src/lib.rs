//! Sluice core: the filter capability, plugin shapes, options and errors
//! shared by the registry, the built-in filters and the chain.

pub mod error;
pub mod filter;
pub mod options;

pub use error::{FilterError, ResolutionError, Result};
pub use filter::{Callback, Candidate, Filter, Plugin};
pub use options::{options_from_value, parse_options, value_kind, Options};
pub use serde_json::Value;
