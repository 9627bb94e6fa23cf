//! Engine error types.

use thiserror::Error;

/// Errors that can occur while invoking the lint engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process could not be started.
    #[error("Failed to start lint engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine produced output that is not a valid response.
    #[error("Invalid engine response: {0}")]
    Protocol(String),

    /// The engine process exited unsuccessfully.
    #[error("Lint engine exited with {0}")]
    Exit(String),

    /// The engine reported that it aborted the lint run.
    #[error("Lint engine aborted: {0}")]
    Aborted(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates an aborted error.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::Aborted(message.into())
    }
}
