use thiserror::Error;

/// Errors that can occur when interacting with a repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not complete the operation.
    #[error("Store unavailable for {entity_type}: {reason}")]
    Unavailable {
        entity_type: &'static str,
        reason: String,
    },

    /// The id sequence for an entity type is exhausted.
    #[error("Identifier space exhausted for {entity_type}")]
    IdsExhausted { entity_type: &'static str },
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
