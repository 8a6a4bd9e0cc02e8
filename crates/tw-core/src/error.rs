use crate::entity::{EntityId, EntityKind};

/// Alias for `Result<T, TwError>`.
pub type TwResult<T> = Result<T, TwError>;

/// Errors that can occur when talking to a collaborator store.
#[derive(Debug, thiserror::Error)]
pub enum TwError {
    /// The requested entity ID does not exist in the registry.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity of the same kind with the same name already exists.
    #[error("{kind} already exists: \"{name}\"")]
    DuplicateName {
        /// The kind the name collided in.
        kind: EntityKind,
        /// The colliding name.
        name: String,
    },

    /// The collaborator cannot serve requests right now.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// A key/value store rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored state could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
