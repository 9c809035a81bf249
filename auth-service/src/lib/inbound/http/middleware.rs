use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::account::errors::AuthError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified subject of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Middleware that validates bearer tokens and adds the subject to request extensions.
///
/// The wrapped handler only runs when the token verifies at the current
/// instant; every other outcome is answered with 401 here.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let username = state.tokens.verify(token).map_err(|e| {
        match AuthError::from(e) {
            AuthError::ExpiredToken => tracing::warn!("Rejected request: token expired"),
            other => tracing::warn!(error = %other, "Rejected request: token invalid"),
        }
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser { username });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req.headers().get(header::AUTHORIZATION).ok_or_else(|| {
        tracing::debug!("Rejected request: missing Authorization header");
        ApiError::Unauthorized("Missing Authorization header".to_string())
    })?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    match auth_str.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )),
    }
}
