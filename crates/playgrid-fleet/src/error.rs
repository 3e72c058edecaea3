//! Fleet lifecycle error types.

use thiserror::Error;

/// Result type alias for fleet operations.
pub type FleetResult<T> = Result<T, FleetError>;

/// Errors that can occur while managing game instances.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("game instance {0} already initialized")]
    AlreadyInitialized(String),

    #[error("game instance {0} not initialized")]
    NotInitialized(String),

    #[error("game instance {0} already running")]
    AlreadyRunning(String),

    #[error("game {0} has no session config")]
    MissingSessionConfig(String),

    #[error("game {game}: invalid duration {value:?} for {field}")]
    InvalidDuration {
        game: String,
        field: &'static str,
        value: String,
    },

    #[error("fleet supervisor not initialized")]
    SupervisorNotInitialized,

    #[error("pool error: {0}")]
    Pool(#[from] playgrid_pool::PoolError),
}
