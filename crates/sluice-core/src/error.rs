use thiserror::Error;

/// Why a registry name could not be turned into a usable plugin.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Filter not found: {name}")]
    NotFound { name: String },
    #[error("Alias cycle detected while resolving: {name}")]
    AliasCycle { name: String },
    #[error("Plugin '{name}' produced {type_name}, expected a filter or callback")]
    InvalidPlugin { name: String, type_name: String },
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilterError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
