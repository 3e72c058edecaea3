//! playgrid-pool — warm session pool for one game title.
//!
//! A [`SessionPool`] owns the session table for a single title and advances
//! each session through `cold → warming → warmed → in_use`. A background
//! reconciler keeps the table aligned with the remote fabric's instance
//! list, sweeps out expired or silent sessions, and tops the pool up to its
//! configured floor.
//!
//! Clients claim sessions in two stages: `acquire_cold` starts warm-up,
//! `acquire_warmed` hands a ready session to a live user. In-use sessions
//! heartbeat until they are released.

pub mod error;
pub mod manager;
pub mod session;

pub use error::{PoolError, PoolResult};
pub use manager::{PoolConfig, SessionPool};
pub use session::{PoolStatus, Session, SessionStatus};
