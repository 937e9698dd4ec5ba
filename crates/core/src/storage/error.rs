use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// A conditional update's existence predicate was not met. Distinct
    /// from `QueryFailed` so callers can tell "shop does not exist" apart
    /// from a service fault.
    #[error("{entity_type} does not exist: {id}")]
    PreconditionFailed {
        entity_type: &'static str,
        id: String,
    },
    /// Every sampled order id was already taken.
    #[error("no unused order id found after {attempts} attempts")]
    IdGenerationExhausted { attempts: u32 },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
