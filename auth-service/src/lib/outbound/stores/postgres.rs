use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use crate::account::errors::AuthError;
use crate::account::models::UserRecord;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

const USERNAME_KEY_CONSTRAINT: &str = "credentials_pkey";

/// Credential store backed by a PostgreSQL `credentials` table.
///
/// Username is the primary key, so the database rejects duplicate inserts
/// atomically.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(e: sqlx::Error) -> AuthError {
    tracing::error!(error = %e, "Credential store query failed");
    AuthError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn exists(&self, username: &Username) -> Result<bool, AuthError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM credentials WHERE username = $1)
            "#,
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)
    }

    async fn insert(&self, record: UserRecord) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (username, password_hash)
            VALUES ($1, $2)
            "#,
        )
        .bind(record.username.as_str())
        .bind(&record.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(USERNAME_KEY_CONSTRAINT)
                {
                    return AuthError::UserAlreadyExists(record.username.as_str().to_string());
                }
            }
            unavailable(e)
        })?;

        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT username, password_hash
            FROM credentials
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        match row {
            Some(r) => {
                let stored_username: String = r.try_get("username").map_err(unavailable)?;
                let password_hash: String = r.try_get("password_hash").map_err(unavailable)?;
                let username = Username::new(stored_username).map_err(|e| {
                    tracing::error!(error = %e, "Stored username failed validation");
                    AuthError::StoreUnavailable(format!("corrupt credential record: {}", e))
                })?;
                Ok(Some(UserRecord::new(username, password_hash)))
            }
            None => Ok(None),
        }
    }
}
