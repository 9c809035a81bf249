use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::models::Credentials;
use crate::account::models::UserRecord;
use crate::account::models::Username;
use auth::IssuedToken;

/// Port for account registration and login.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Unit on success; exactly one record has been persisted
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Username is already taken
    /// * `StoreUnavailable` - Credential store unreachable or timed out
    /// * `HashingFailed` - Password hashing failed
    async fn register(&self, credentials: Credentials) -> Result<(), AuthError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Signed token bound to the username
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or wrong password (indistinguishable)
    /// * `StoreUnavailable` - Credential store unreachable or timed out
    /// * `SigningFailed` - Token generation failed
    async fn login(&self, credentials: Credentials) -> Result<IssuedToken, AuthError>;
}

/// Persistence operations for credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Check whether a record exists for the username.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Backing store could not be reached
    async fn exists(&self, username: &Username) -> Result<bool, AuthError>;

    /// Persist a new record.
    ///
    /// The store enforces username uniqueness itself, so two concurrent
    /// inserts for the same username never both succeed.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - A record with this username is already stored
    /// * `StoreUnavailable` - Backing store could not be reached
    async fn insert(&self, record: UserRecord) -> Result<(), AuthError>;

    /// Retrieve a record by username.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Backing store could not be reached
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<UserRecord>, AuthError>;
}
