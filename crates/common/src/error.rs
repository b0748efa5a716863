//! Common error types and handling for Gamebot

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classes a transport layer maps onto its own status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input, detected before any side effect
    Validation,
    /// A referenced record does not exist; nothing changed
    Lookup,
    /// Business-rule violation detected after lookup, without a write
    Conflict,
    /// A collaborator outside this process failed
    External,
    /// Fault inside the system
    Internal,
}

/// Common error type for the Gamebot application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Invalid game: {0}")]
    InvalidGame(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error for transport mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::InvalidSortKey(_) | Error::InvalidCursor(_) => {
                ErrorKind::Validation
            }
            Error::NotFound(_) | Error::GameNotFound(_) => ErrorKind::Lookup,
            Error::InvalidGame(_) | Error::AlreadyRegistered(_) | Error::Conflict(_) => {
                ErrorKind::Conflict
            }
            Error::ExternalService(_) => ErrorKind::External,
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::InvalidSortKey(_) => "INVALID_SORT_KEY",
            Error::InvalidCursor(_) => "INVALID_CURSOR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::GameNotFound(_) => "GAME_NOT_FOUND",
            Error::InvalidGame(_) => "INVALID_GAME",
            Error::AlreadyRegistered(_) => "ALREADY_REGISTERED",
            Error::Conflict(_) => "CONFLICT",
            Error::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
