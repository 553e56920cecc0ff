use thiserror::Error;

/// Errors emitted while loading permission grants.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid grant list: {0}")]
    InvalidGrants(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AccessError>;
