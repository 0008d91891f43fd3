//! Errors returned by sketch constructors.
//!
//! Only construction can fail: once a sketch exists, `update` and `estimate`
//! are defined for every input and every state.

use thiserror::Error;

/// Sketch construction error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    /// A precision, capacity or divisibility precondition was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type used by sketch constructors.
pub type Result<T, E = SketchError> = std::result::Result<T, E>;

impl SketchError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(%message, "rejected sketch arguments");
        SketchError::InvalidArgument(message)
    }
}
