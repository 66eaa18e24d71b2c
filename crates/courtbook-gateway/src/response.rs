use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courtbook_core::CourtbookError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request did what was asked.
    pub success: bool,
    /// Payload, usually the updated session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable note or error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Stable error kind on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A success envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Attaches a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A success envelope without data.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// A failure envelope.
    pub fn failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(kind.into()),
        }
    }
}

/// Handler error carrying a [`CourtbookError`] to the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub CourtbookError);

impl From<CourtbookError> for ApiError {
    fn from(err: CourtbookError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error kind.
pub fn status_code(err: &CourtbookError) -> StatusCode {
    match err {
        CourtbookError::Validation(_)
        | CourtbookError::DuplicateName(_)
        | CourtbookError::CapacityExceeded { .. } => StatusCode::BAD_REQUEST,
        CourtbookError::PlayerNotFound(_) | CourtbookError::SessionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        CourtbookError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CourtbookError::Storage(_)
        | CourtbookError::Config(_)
        | CourtbookError::Json(_)
        | CourtbookError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(&self.0);
        if status.is_server_error() {
            error!(kind = self.0.kind(), error = %self.0, "Request failed");
        } else {
            warn!(kind = self.0.kind(), error = %self.0, "Request rejected");
        }
        // Internal details stay in the log.
        let message = if self.0.is_client_error() || matches!(self.0, CourtbookError::Config(_)) {
            self.0.to_string()
        } else {
            "Internal server error".to_string()
        };
        (status, Json(ApiResponse::failure(self.0.kind(), message))).into_response()
    }
}
