//! playgrid-api — REST delivery layer for the playgrid orchestrator.
//!
//! Thin mapping from HTTP to the fleet supervisor's pools; all session
//! logic lives in `playgrid-pool`.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/health` | Liveness check |
//! | GET | `/api/v1/games` | List configured games |
//! | GET | `/api/v1/games/{game}` | Game instance status (incl. pool counts) |
//! | GET | `/api/v1/games/{game}/sessions` | List sessions, status-ordered |
//! | POST | `/api/v1/games/{game}/acquire_cold` | Claim a cold session |
//! | POST | `/api/v1/games/{game}/set_warmed` | Mark a session warmed |
//! | POST | `/api/v1/games/{game}/acquire_warmed` | Claim a warmed session |
//! | POST | `/api/v1/games/{game}/heartbeat` | Refresh a session heartbeat |
//! | POST | `/api/v1/games/{game}/release` | Release a session |

pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use playgrid_fleet::FleetSupervisor;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub fleet: Arc<FleetSupervisor>,
}

/// Build the complete API router.
pub fn build_router(fleet: Arc<FleetSupervisor>) -> Router {
    let state = ApiState { fleet };

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/games", get(handlers::list_games))
        .route("/games/{game}", get(handlers::get_game))
        .route("/games/{game}/sessions", get(handlers::list_sessions))
        .route("/games/{game}/acquire_cold", post(handlers::acquire_cold))
        .route("/games/{game}/set_warmed", post(handlers::set_warmed))
        .route(
            "/games/{game}/acquire_warmed",
            post(handlers::acquire_warmed),
        )
        .route("/games/{game}/heartbeat", post(handlers::heartbeat))
        .route("/games/{game}/release", post(handlers::release))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}
