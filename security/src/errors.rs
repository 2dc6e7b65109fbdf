// security/src/errors.rs

use thiserror::Error;

/// Custom authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No session")]
    MissingSession,
    #[error("Session is invalid: {0}")]
    InvalidSession(String),
    #[error("Session has expired")]
    SessionExpired,
    #[error("Unknown or expired login state")]
    UnknownLoginState,
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),
    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Whether the caller should be told to (re-)authenticate, as opposed to
    /// a failure on our side.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::MissingSession
                | AuthError::InvalidSession(_)
                | AuthError::SessionExpired
                | AuthError::UnknownLoginState
                | AuthError::JwtError(_)
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::IdentityProvider(err.to_string())
    }
}

impl From<lib::HospitalError> for AuthError {
    fn from(err: lib::HospitalError) -> Self {
        AuthError::InternalError(err.to_string())
    }
}
