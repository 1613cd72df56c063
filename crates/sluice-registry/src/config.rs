use serde::{Deserialize, Serialize};

/// Registry behaviour flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Cache the instance produced by an option-less `get` and hand it out again.
    pub share_by_default: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { share_by_default: true }
    }
}
