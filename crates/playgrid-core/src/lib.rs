//! playgrid-core — shared configuration for the playgrid orchestrator.
//!
//! Holds the `playgrid.toml` schema and the duration-string helpers used
//! by every other crate in the workspace.

pub mod config;

pub use config::{
    parse_duration, FabricConfig, GameConfig, RuntimeConfig, ScreenConfig, ServerConfig,
    ServiceConfig, SessionConfig,
};
