//! Session pool error types.

use thiserror::Error;

use crate::session::SessionStatus;

/// Result type alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors surfaced by the session pool.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("session not found: {0}")]
    NotFound(String),

    #[error("session {id} is in {actual}, expected {expected}")]
    WrongState {
        id: String,
        expected: SessionStatus,
        actual: SessionStatus,
    },

    #[error("no cold sessions available")]
    NoColdAvailable,

    #[error("no warmed sessions available")]
    NoWarmedAvailable,

    #[error("session pool already started")]
    AlreadyStarted,

    #[error("session pool not initialized")]
    NotInitialized,

    #[error("fabric error: {0}")]
    Fabric(#[from] playgrid_fabric::FabricError),
}
