use thiserror::Error;

#[derive(Debug, Error)]
pub enum GiftError {
    /// A recommendation request produced no usable result. Network failures,
    /// backend errors, empty bodies and unparseable JSON all collapse here.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GiftError {
    /// Returns `true` for the single user-facing failure of a recommendation
    /// request. The caller shows one generic retry message for all of them.
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, GiftError>;
