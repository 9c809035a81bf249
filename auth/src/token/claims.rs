use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;

/// Claims carried by an access token.
///
/// A subset of the RFC 7519 registered claims. Every field is required when
/// decoding, so a token missing any of them is treated as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the authenticated username)
    pub sub: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// JWT ID, unique per issued token
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject valid for `ttl` starting at `issued_at`.
    ///
    /// A zero or negative `ttl` produces claims that are already expired.
    ///
    /// # Errors
    /// * `SigningFailed` - Expiry falls outside the representable time range
    pub fn for_subject(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expiration = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::SigningFailed(format!(
                "token lifetime of {}s overflows the expiry timestamp",
                ttl.num_seconds()
            ))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Check whether the claims have lapsed at `current_timestamp`.
    ///
    /// The expiry instant itself already counts as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
