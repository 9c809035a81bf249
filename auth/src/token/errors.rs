use thiserror::Error;

/// Error type for token operations.
///
/// `InvalidToken` and `ExpiredToken` are both verification failures but stay
/// distinct: an expired token carried a valid signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    ExpiredToken,
}
