use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username must not contain control characters")]
    InvalidCharacters,
}

/// Error for Password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
}

/// Top-level error for registration, login and token checks.
///
/// Internal kinds stay distinct here; the inbound layer decides how much of
/// the distinction a caller gets to see.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Username already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    ExpiredToken,

    // Infrastructure errors
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token signing failed: {0}")]
    SigningFailed(String),
}

impl From<UsernameError> for AuthError {
    fn from(err: UsernameError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::HashingFailed(msg) => AuthError::HashingFailed(msg),
        }
    }
}

impl From<auth::TokenError> for AuthError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            auth::TokenError::SigningFailed(msg) => AuthError::SigningFailed(msg),
            auth::TokenError::InvalidToken(msg) => AuthError::InvalidToken(msg),
            auth::TokenError::ExpiredToken => AuthError::ExpiredToken,
        }
    }
}
