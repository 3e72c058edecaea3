//! playgrid-fleet — one pool per configured game, supervised as a unit.
//!
//! A [`GameInstance`] binds one game config to one session pool and tracks
//! its initialized/running flags. The [`FleetSupervisor`] constructs,
//! initialises, starts, and stops all instances: `init` aborts on the first
//! failure, `start` is all-or-nothing (already-started instances are stopped
//! before the error returns), `stop` runs through every instance regardless
//! of per-instance errors.

pub mod error;
pub mod instance;
pub mod supervisor;

pub use error::{FleetError, FleetResult};
pub use instance::{GameInstance, GameInstanceStatus};
pub use supervisor::FleetSupervisor;
