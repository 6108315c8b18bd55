//! Domain error type shared by the engine, auth service and HTTP handlers

/// Errors surfaced to API callers
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GameError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::InvalidCredentials | Self::Conflict(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Upstream(_)
            | Self::Storage(_)
            | Self::PasswordHash(_)
            | Self::Serialization(_)
            | Self::Internal(_) => 500,
        }
    }
}

pub type GameResult<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GameError::invalid_input("bad").status_code(), 400);
        assert_eq!(GameError::InvalidCredentials.status_code(), 400);
        assert_eq!(GameError::unauthorized("no token").status_code(), 401);
        assert_eq!(GameError::not_found("User not found").status_code(), 404);
        assert_eq!(
            GameError::Internal(anyhow::anyhow!("boom")).status_code(),
            500
        );
    }

    #[test]
    fn test_message_is_plain_for_client_errors() {
        assert_eq!(
            GameError::invalid_input("Invalid input").to_string(),
            "Invalid input"
        );
        assert_eq!(GameError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
