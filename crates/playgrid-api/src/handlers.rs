//! REST API handlers.
//!
//! Each handler resolves `game → pool` through the fleet supervisor and
//! returns a JSON envelope.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use playgrid_pool::{PoolError, SessionPool};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn pool_error_response(e: PoolError) -> axum::response::Response {
    let status = match &e {
        PoolError::NotFound(_) => StatusCode::NOT_FOUND,
        PoolError::WrongState { .. } => StatusCode::CONFLICT,
        PoolError::NoColdAvailable | PoolError::NoWarmedAvailable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        PoolError::AlreadyStarted | PoolError::NotInitialized => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        PoolError::Fabric(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(&e.to_string(), status).into_response()
}

async fn resolve_pool(
    state: &ApiState,
    game: &str,
) -> Result<Arc<SessionPool>, axum::response::Response> {
    state
        .fleet
        .pool(game)
        .await
        .ok_or_else(|| error_response("game not found", StatusCode::NOT_FOUND).into_response())
}

/// Request body naming a session.
#[derive(Deserialize)]
pub struct SessionIdRequest {
    pub session_id: String,
}

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    ApiResponse::ok("ok")
}

/// GET /api/v1/games
pub async fn list_games(State(state): State<ApiState>) -> impl IntoResponse {
    ApiResponse::ok(state.fleet.games().await)
}

/// GET /api/v1/games/{game}
pub async fn get_game(
    State(state): State<ApiState>,
    Path(game): Path<String>,
) -> impl IntoResponse {
    match state.fleet.status(&game).await {
        Some(status) => ApiResponse::ok(status).into_response(),
        None => error_response("game not found", StatusCode::NOT_FOUND).into_response(),
    }
}

/// GET /api/v1/games/{game}/sessions
pub async fn list_sessions(
    State(state): State<ApiState>,
    Path(game): Path<String>,
) -> impl IntoResponse {
    match resolve_pool(&state, &game).await {
        Ok(pool) => ApiResponse::ok(pool.list().await).into_response(),
        Err(resp) => resp,
    }
}

/// POST /api/v1/games/{game}/acquire_cold
pub async fn acquire_cold(
    State(state): State<ApiState>,
    Path(game): Path<String>,
) -> impl IntoResponse {
    let pool = match resolve_pool(&state, &game).await {
        Ok(pool) => pool,
        Err(resp) => return resp,
    };
    match pool.acquire_cold().await {
        Ok(session) => ApiResponse::ok(session).into_response(),
        Err(e) => pool_error_response(e),
    }
}

/// POST /api/v1/games/{game}/set_warmed
pub async fn set_warmed(
    State(state): State<ApiState>,
    Path(game): Path<String>,
    Json(req): Json<SessionIdRequest>,
) -> impl IntoResponse {
    let pool = match resolve_pool(&state, &game).await {
        Ok(pool) => pool,
        Err(resp) => return resp,
    };
    match pool.set_warmed(&req.session_id).await {
        Ok(()) => ApiResponse::ok(()).into_response(),
        Err(e) => pool_error_response(e),
    }
}

/// POST /api/v1/games/{game}/acquire_warmed
pub async fn acquire_warmed(
    State(state): State<ApiState>,
    Path(game): Path<String>,
) -> impl IntoResponse {
    let pool = match resolve_pool(&state, &game).await {
        Ok(pool) => pool,
        Err(resp) => return resp,
    };
    match pool.acquire_warmed().await {
        Ok(session) => ApiResponse::ok(session).into_response(),
        Err(e) => pool_error_response(e),
    }
}

/// POST /api/v1/games/{game}/heartbeat
pub async fn heartbeat(
    State(state): State<ApiState>,
    Path(game): Path<String>,
    Json(req): Json<SessionIdRequest>,
) -> impl IntoResponse {
    let pool = match resolve_pool(&state, &game).await {
        Ok(pool) => pool,
        Err(resp) => return resp,
    };
    match pool.heartbeat(&req.session_id).await {
        Ok(()) => ApiResponse::ok(()).into_response(),
        Err(e) => pool_error_response(e),
    }
}

/// POST /api/v1/games/{game}/release
pub async fn release(
    State(state): State<ApiState>,
    Path(game): Path<String>,
    Json(req): Json<SessionIdRequest>,
) -> impl IntoResponse {
    let pool = match resolve_pool(&state, &game).await {
        Ok(pool) => pool,
        Err(resp) => return resp,
    };
    match pool.release(&req.session_id).await {
        Ok(()) => ApiResponse::ok(()).into_response(),
        Err(e) => pool_error_response(e),
    }
}
