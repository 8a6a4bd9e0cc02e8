//! Error types for table sessions.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while loading, saving, or replaying a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A script or saved session state was not valid JSON.
    #[error("invalid session JSON: {0}")]
    Script(#[from] serde_json::Error),

    /// Registry or ledger state could not be stored or restored.
    #[error("{0}")]
    Core(#[from] tw_core::TwError),

    /// Choice engine state could not be stored or restored.
    #[error("{0}")]
    Choice(#[from] tw_choice::ChoiceError),
}
