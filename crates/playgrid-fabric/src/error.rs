//! Fabric transport error types.

use thiserror::Error;

/// Result type alias for fabric operations.
pub type FabricResult<T> = Result<T, FabricError>;

/// Errors that can occur while talking to the remote fabric.
#[derive(Debug, Error)]
pub enum FabricError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("client identity error: {0}")]
    Identity(String),

    #[error("invalid fabric configuration: {0}")]
    Config(String),
}
