use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::account::errors::AuthError;
use crate::account::errors::PasswordError;
use crate::account::errors::UsernameError;
use crate::account::models::Credentials;
use crate::account::models::Password;
use crate::account::models::Username;

pub mod login;
pub mod protected;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Translate domain errors into the externally visible categories.
///
/// Credential and token failures collapse into fixed messages, and
/// infrastructure details are logged here instead of being returned.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            AuthError::UserAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::InvalidToken(_) | AuthError::ExpiredToken => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AuthError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Request failed: credential store unavailable");
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            AuthError::HashingFailed(_) | AuthError::SigningFailed(_) => {
                tracing::error!(error = %err, "Request failed: internal error");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// HTTP request body for register and login (raw JSON).
///
/// Missing fields decode as empty strings so they are reported as invalid
/// input rather than as a decoding failure.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

impl fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
pub enum ParseCredentialsRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),
}

impl CredentialsRequest {
    pub fn try_into_credentials(self) -> Result<Credentials, ParseCredentialsRequestError> {
        let username = Username::new(self.username)?;
        let password = Password::new(self.password)?;
        Ok(Credentials::new(username, password))
    }
}

impl From<ParseCredentialsRequestError> for ApiError {
    fn from(err: ParseCredentialsRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::InvalidInput("x".to_string()), StatusCode::BAD_REQUEST),
            (AuthError::UserAlreadyExists("alice".to_string()), StatusCode::CONFLICT),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken("bad".to_string()), StatusCode::UNAUTHORIZED),
            (AuthError::ExpiredToken, StatusCode::UNAUTHORIZED),
            (AuthError::StoreUnavailable("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (AuthError::HashingFailed("oom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::SigningFailed("key".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_token_failures_are_indistinguishable() {
        assert_eq!(
            ApiError::from(AuthError::InvalidToken("bad signature".to_string())),
            ApiError::from(AuthError::ExpiredToken)
        );
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::from(AuthError::StoreUnavailable(
            "connection to 10.0.0.5:5432 refused".to_string(),
        ));
        assert_eq!(
            err,
            ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
        );
    }

    #[test]
    fn test_credentials_request_missing_fields() {
        let request: CredentialsRequest = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert!(matches!(
            request.try_into_credentials(),
            Err(ParseCredentialsRequestError::Password(PasswordError::Empty))
        ));

        let request: CredentialsRequest = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert!(matches!(
            request.try_into_credentials(),
            Err(ParseCredentialsRequestError::Username(UsernameError::Empty))
        ));
    }

    #[test]
    fn test_credentials_request_debug_redacts_password() {
        let request: CredentialsRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw123"}"#).unwrap();
        assert!(!format!("{:?}", request).contains("pw123"));
    }
}
