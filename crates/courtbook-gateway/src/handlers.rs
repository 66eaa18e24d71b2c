//! `/api/game` handlers.

use crate::response::{ApiError, ApiResponse};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use courtbook_core::{CourtbookError, Placement, Session, SessionConfig, SessionPatch};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Body of add/rename player requests.
#[derive(Debug, Deserialize)]
pub struct PlayerName {
    /// Requested player name, trimmed server-side.
    #[serde(default)]
    pub name: String,
}

/// `GET /api/game/current`
pub async fn current_session(State(state): State<Arc<AppState>>) -> ApiResult<Session> {
    match state.service.current_session().await? {
        Some(session) => Ok(Json(ApiResponse::ok(session))),
        None => Ok(Json(ApiResponse {
            success: false,
            data: None,
            message: Some("No active game session found".to_string()),
            error: None,
        })),
    }
}

/// `POST /api/game`
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SessionConfig>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Session>>), ApiError> {
    let config = body(payload)?;
    let session = state.service.create_session(config).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session))))
}

/// `PUT /api/game/{id}`
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<SessionPatch>, JsonRejection>,
) -> ApiResult<Session> {
    let id = parse_id("session", &id)?;
    let patch = body(payload)?;
    let session = state.service.update_settings(id, patch).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// `POST /api/game/{id}/players`
pub async fn add_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PlayerName>, JsonRejection>,
) -> ApiResult<Session> {
    let id = parse_id("session", &id)?;
    let PlayerName { name } = body(payload)?;
    let (session, placement) = state.service.add_player(id, &name).await?;
    let response = ApiResponse::ok(session);
    Ok(Json(match placement {
        Placement::Active => response,
        Placement::Standby => response.with_message("Player added to standby list"),
    }))
}

/// `DELETE /api/game/{id}/players/{player_id}`
pub async fn remove_player(
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(String, String)>,
) -> ApiResult<Session> {
    let id = parse_id("session", &id)?;
    let player_id = parse_id("player", &player_id)?;
    let session = state.service.remove_player(id, player_id).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// `PUT /api/game/{id}/players/{player_id}`
pub async fn rename_player(
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(String, String)>,
    payload: Result<Json<PlayerName>, JsonRejection>,
) -> ApiResult<Session> {
    let id = parse_id("session", &id)?;
    let player_id = parse_id("player", &player_id)?;
    let PlayerName { name } = body(payload)?;
    let session = state.service.rename_player(id, player_id, &name).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// `POST /api/game/{id}/players/{player_id}/promote`
pub async fn promote_player(
    State(state): State<Arc<AppState>>,
    Path((id, player_id)): Path<(String, String)>,
) -> ApiResult<Session> {
    let id = parse_id("session", &id)?;
    let player_id = parse_id("player", &player_id)?;
    let session = state.service.promote_player(id, player_id).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// `PUT /api/game/{id}/close`
pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Session> {
    let id = parse_id("session", &id)?;
    let session = state.service.close_session(id).await?;
    Ok(Json(ApiResponse::ok(session)))
}

pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError(CourtbookError::Validation(rejection.body_text())))
}

fn parse_id(what: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError(CourtbookError::Validation(format!("Invalid {what} id: {raw}"))))
}
