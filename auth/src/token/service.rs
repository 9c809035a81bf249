use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// A freshly signed access token and the facts it asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS string, safe to send as a single header value
    pub token: String,
    /// Username the token is bound to
    pub subject: String,
    /// Absolute expiry (Unix timestamp, seconds)
    pub expires_at: i64,
}

/// Issues and verifies signed, time-bounded bearer tokens.
///
/// Tokens are HS256 JWTs. Verification is stateless: it depends only on the
/// token itself, the secret given at construction, and the current time.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Minimum secret length accepted by service configuration (256 bits).
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a token service with a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes for HS256)
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked after the signature, without leeway, in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject` that lives for `ttl` from now.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issue a token for `subject` as if issued at `issued_at`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed or the expiry overflows
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        let claims = Claims::for_subject(subject, issued_at, ttl)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            expires_at: claims.exp,
        })
    }

    /// Verify a token and return the username it is bound to.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, malformed token, or missing claims
    /// * `ExpiredToken` - Signature is valid but the token has lapsed
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against the given instant.
    ///
    /// The signature and structure are checked before expiry, so a forged
    /// token is always `InvalidToken` regardless of its claimed `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::InvalidToken("empty subject".to_string()));
        }

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::ExpiredToken);
        }

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET);

        let issued = service
            .issue("alice", Duration::hours(1))
            .expect("Failed to issue token");
        assert!(!issued.token.is_empty());
        assert_eq!(issued.subject, "alice");

        let subject = service.verify(&issued.token).expect("Failed to verify token");
        assert_eq!(subject, "alice");
    }

    #[test]
    fn test_token_is_header_safe() {
        let service = TokenService::new(SECRET);
        let issued = service.issue("alice", Duration::hours(1)).unwrap();

        assert_eq!(issued.token.split('.').count(), 3);
        assert!(issued
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));
    }

    #[test]
    fn test_expires_at_matches_ttl() {
        let service = TokenService::new(SECRET);
        let issued_at = Utc::now();

        let issued = service
            .issue_at("alice", issued_at, Duration::minutes(15))
            .unwrap();

        assert_eq!(issued.expires_at, issued_at.timestamp() + 15 * 60);
    }

    #[test]
    fn test_overflowing_ttl_fails_to_sign() {
        let service = TokenService::new(SECRET);

        let result = service.issue("alice", Duration::seconds(100_000_000_000_000));

        assert!(matches!(result, Err(TokenError::SigningFailed(_))));
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let service = TokenService::new(SECRET);
        let issued = service.issue("alice", Duration::zero()).unwrap();

        assert_eq!(service.verify(&issued.token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let service = TokenService::new(SECRET);
        let issued = service.issue("alice", Duration::seconds(-30)).unwrap();

        assert_eq!(service.verify(&issued.token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_expiry_boundary() {
        let service = TokenService::new(SECRET);
        let issued_at = Utc::now();
        let issued = service
            .issue_at("alice", issued_at, Duration::seconds(60))
            .unwrap();

        let just_before = issued_at + Duration::seconds(59);
        let at_expiry = issued_at + Duration::seconds(60);

        assert_eq!(
            service.verify_at(&issued.token, just_before),
            Ok("alice".to_string())
        );
        assert_eq!(
            service.verify_at(&issued.token, at_expiry),
            Err(TokenError::ExpiredToken)
        );
    }

    #[test]
    fn test_verify_garbage() {
        let service = TokenService::new(SECRET);

        for token in ["", "invalid.token.here", "a.b", "not a token", "...."] {
            assert!(
                matches!(service.verify(token), Err(TokenError::InvalidToken(_))),
                "accepted {:?}",
                token
            );
        }
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let service1 = TokenService::new(b"secret1_at_least_32_bytes_long_key!");
        let service2 = TokenService::new(b"secret2_at_least_32_bytes_long_key!");

        let issued = service1.issue("alice", Duration::hours(1)).unwrap();

        assert!(matches!(
            service2.verify(&issued.token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_forged_expired_token_is_invalid_not_expired() {
        let service1 = TokenService::new(b"secret1_at_least_32_bytes_long_key!");
        let service2 = TokenService::new(b"secret2_at_least_32_bytes_long_key!");

        let issued = service1.issue("alice", Duration::seconds(-60)).unwrap();

        assert!(matches!(
            service2.verify(&issued.token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_any_flipped_character_is_invalid() {
        let service = TokenService::new(SECRET);
        let issued = service.issue("alice", Duration::hours(1)).unwrap();
        let original: Vec<char> = issued.token.chars().collect();

        for position in 0..original.len() {
            let mut tampered = original.clone();
            tampered[position] = if original[position] == 'A' { 'Q' } else { 'A' };
            let tampered: String = tampered.into_iter().collect();

            assert!(
                matches!(service.verify(&tampered), Err(TokenError::InvalidToken(_))),
                "tampered token accepted at position {}",
                position
            );
        }
    }

    #[test]
    fn test_unsigned_token_is_invalid() {
        let service = TokenService::new(SECRET);
        let issued = service.issue("alice", Duration::hours(1)).unwrap();

        let unsigned = issued
            .token
            .rsplit_once('.')
            .map(|(message, _)| format!("{}.", message))
            .unwrap();

        assert!(matches!(
            service.verify(&unsigned),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_missing_claims_is_invalid() {
        let service = TokenService::new(SECRET);

        #[derive(serde::Serialize)]
        struct NoExpiry {
            sub: String,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExpiry {
                sub: "alice".to_string(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_empty_subject_is_invalid() {
        let service = TokenService::new(SECRET);
        let issued = service.issue("", Duration::hours(1)).unwrap();

        assert!(matches!(
            service.verify(&issued.token),
            Err(TokenError::InvalidToken(_))
        ));
    }
}
