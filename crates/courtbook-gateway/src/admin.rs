use crate::handlers::body;
use crate::response::{ApiError, ApiResponse};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Body of `POST /api/admin/verify-password`.
#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    /// Candidate password.
    #[serde(default)]
    pub password: String,
}

/// `POST /api/admin/verify-password`
///
/// 200 on match, 401 on mismatch, 500 when no password is configured.
pub async fn verify_password(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let PasswordRequest { password } = body(payload)?;
    state.admin_secret.verify(&password)?;
    info!("Admin password verified");
    Ok(Json(ApiResponse::message("Password verified")))
}

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `true`.
    pub success: bool,
    /// Fixed status text.
    pub message: &'static str,
    /// RFC 3339 server time.
    pub timestamp: String,
}

/// `GET /api/health`
pub async fn health_handler() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Server is running",
        timestamp: Utc::now().to_rfc3339(),
    })
}
