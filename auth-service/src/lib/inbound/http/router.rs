use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::not_found;
use super::handlers::protected::protected;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub tokens: Arc<TokenService>,
}

/// Build the route table once at startup.
///
/// `/register` and `/login` are public; everything on the protected router
/// sits behind the bearer-token middleware. Unmatched paths and unsupported
/// methods on known paths fall through to a JSON 404.
pub fn create_router(auth_service: Arc<dyn AuthServicePort>, tokens: Arc<TokenService>) -> Router {
    let state = AppState {
        auth_service,
        tokens,
    };

    let public_routes = Router::new()
        .route("/register", post(register).fallback(not_found))
        .route("/login", post(login).fallback(not_found));

    let protected_routes = Router::new()
        .route("/protected", get(protected).fallback(not_found))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span so bearer tokens never reach the logs.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
