use std::sync::Arc;

use auth::TokenService;
use auth_service::account::ports::AuthServicePort;
use auth_service::account::service::AuthService;
use auth_service::config::Config;
use auth_service::config::StoreBackend;
use auth_service::inbound::http::router::create_router;
use auth_service::stores::InMemoryCredentialStore;
use auth_service::stores::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_seconds = config.jwt.ttl_seconds,
        store_timeout_ms = config.store.timeout_ms,
        "Configuration loaded"
    );

    let tokens = Arc::new(TokenService::new(config.jwt.secret.as_bytes()));
    let token_ttl = config.jwt.ttl();
    let store_timeout = config.store.timeout();

    let auth_service: Arc<dyn AuthServicePort> = match config.store.backend()? {
        StoreBackend::Memory => {
            tracing::warn!(store = "memory", "Using in-memory credential store");
            Arc::new(AuthService::new(
                Arc::new(InMemoryCredentialStore::new()),
                Arc::clone(&tokens),
                token_ttl,
                store_timeout,
            ))
        }
        StoreBackend::Postgres(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.store.max_connections)
                .acquire_timeout(store_timeout)
                .connect(&url)
                .await?;
            tracing::info!(
                max_connections = config.store.max_connections,
                store = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(store = "postgresql", "Database migrations completed");

            Arc::new(AuthService::new(
                Arc::new(PostgresCredentialStore::new(pg_pool)),
                Arc::clone(&tokens),
                token_ttl,
                store_timeout,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, tokens);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
