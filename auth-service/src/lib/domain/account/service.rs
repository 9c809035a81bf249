use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::IssuedToken;
use auth::PasswordHasher;
use auth::TokenService;

use crate::account::errors::AuthError;
use crate::account::models::Credentials;
use crate::account::models::UserRecord;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;

/// Well-formed Argon2id hash with the default cost parameters that no
/// password is expected to match. Verified against on the unknown-user path
/// so both login failures cost one full hash computation.
const DECOY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZGVjb3lzYWx0ZGVjb3lzYWx0$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Domain service implementation for registration and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    tokens: Arc<TokenService>,
    password_hasher: PasswordHasher,
    token_ttl: chrono::Duration,
    store_timeout: Duration,
}

impl<CS> AuthService<CS>
where
    CS: CredentialStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `tokens` - Token issuer shared with the auth middleware
    /// * `token_ttl` - Lifetime of tokens issued at login
    /// * `store_timeout` - Upper bound for every credential store call
    pub fn new(
        store: Arc<CS>,
        tokens: Arc<TokenService>,
        token_ttl: chrono::Duration,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            tokens,
            password_hasher: PasswordHasher::new(),
            token_ttl,
            store_timeout,
        }
    }

    async fn within_timeout<T, F>(&self, operation: &'static str, call: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Credential store call timed out"
                );
                Err(AuthError::StoreUnavailable(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.store_timeout.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl<CS> AuthServicePort for AuthService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, credentials: Credentials) -> Result<(), AuthError> {
        let Credentials { username, password } = credentials;

        if self
            .within_timeout("exists", self.store.exists(&username))
            .await?
        {
            tracing::info!(username = %username, "Registration rejected: username taken");
            return Err(AuthError::UserAlreadyExists(username.to_string()));
        }

        let hasher = self.password_hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| AuthError::HashingFailed(e.to_string()))??;

        let record = UserRecord::new(username.clone(), password_hash);

        // The pre-check above is not atomic with the insert; the store's own
        // uniqueness constraint decides concurrent registrations.
        self.within_timeout("insert", self.store.insert(record))
            .await
            .map_err(|e| {
                if let AuthError::UserAlreadyExists(_) = e {
                    tracing::info!(
                        username = %username,
                        "Registration rejected: username taken concurrently"
                    );
                }
                e
            })?;

        tracing::info!(username = %username, "User registered");
        Ok(())
    }

    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthError> {
        let Credentials { username, password } = credentials;

        let record = self
            .within_timeout("find_by_username", self.store.find_by_username(&username))
            .await?;

        // Unknown users are checked against a decoy hash so both failure paths
        // cost one full Argon2 verification.
        let known_user = record.is_some();
        let stored_hash = record
            .map(|record| record.password_hash)
            .unwrap_or_else(|| DECOY_PASSWORD_HASH.to_string());

        let hasher = self.password_hasher;
        let matches =
            tokio::task::spawn_blocking(move || hasher.verify(password.expose(), &stored_hash))
                .await
                .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        if !known_user {
            tracing::debug!(username = %username, "Login rejected: unknown user");
            return Err(AuthError::InvalidCredentials);
        }

        if !matches {
            tracing::debug!(username = %username, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(username.as_str(), self.token_ttl)?;

        tracing::info!(
            username = %username,
            expires_at = issued.expires_at,
            "Token issued"
        );
        Ok(issued)
    }
}
