use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Resource reachable only through the auth middleware.
pub async fn protected(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<ProtectedResponseData> {
    tracing::debug!(username = %user.username, "Protected resource accessed");

    ApiSuccess::new(
        StatusCode::OK,
        ProtectedResponseData {
            message: format!("Hello, {}", user.username),
            username: user.username,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedResponseData {
    pub username: String,
    pub message: String,
}
