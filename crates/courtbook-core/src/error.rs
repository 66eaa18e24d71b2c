use thiserror::Error;
use uuid::Uuid;

/// A convenience `Result` alias using [`CourtbookError`].
pub type CourtbookResult<T> = Result<T, CourtbookError>;

/// Unified error type for roster, session and gateway operations.
///
/// Every variant maps to a stable machine-checkable kind (see [`CourtbookError::kind`])
/// so API clients can branch on it without parsing the message.
#[derive(Error, Debug)]
pub enum CourtbookError {
    /// Malformed or out-of-range input (empty name, courts outside 1..=10, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A player with the same case-insensitive name is already registered.
    #[error("Player name already exists: {0}")]
    DuplicateName(String),

    /// Active and standby lists are both full.
    #[error("Maximum capacity reached (including standby): {capacity} players")]
    CapacityExceeded {
        /// Combined active + standby capacity of the session.
        capacity: usize,
    },

    /// The player id is not present in the list(s) searched.
    #[error("Player not found: {0}")]
    PlayerNotFound(Uuid),

    /// No session with this id exists.
    #[error("Game session not found: {0}")]
    SessionNotFound(Uuid),

    /// The persistence backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Required server configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// A shared secret did not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CourtbookError {
    /// Stable error kind reported in the `error` field of API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::DuplicateName(_) => "DuplicateName",
            Self::CapacityExceeded { .. } => "CapacityExceeded",
            Self::PlayerNotFound(_) => "PlayerNotFound",
            Self::SessionNotFound(_) => "SessionNotFound",
            Self::Storage(_) | Self::Json(_) | Self::Io(_) => "StorageError",
            Self::Config(_) => "ConfigError",
            Self::Unauthorized(_) => "Unauthorized",
        }
    }

    /// Whether the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Storage(_) | Self::Json(_) | Self::Io(_) | Self::Config(_)
        )
    }
}
