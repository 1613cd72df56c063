//! Sluice registry: resolves filter names to freshly built or shared plugins.
//!
//! Names are case-insensitive and may be chained through aliases; every
//! product is validated before it leaves the registry.

pub mod config;
pub mod registry;

pub use config::RegistryConfig;
pub use registry::{canonical_name, Factory, FilterRegistry};

#[cfg(test)]
mod tests;
