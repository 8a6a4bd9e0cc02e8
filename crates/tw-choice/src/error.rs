use tw_core::TwError;

/// Alias for `Result<T, ChoiceError>`.
pub type ChoiceResult<T> = Result<T, ChoiceError>;

/// Errors from saving or loading engine state.
#[derive(Debug, thiserror::Error)]
pub enum ChoiceError {
    /// Engine state could not be encoded or decoded.
    #[error("choice state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key/value store rejected the write.
    #[error("choice state storage failed: {0}")]
    Storage(#[from] TwError),
}
