//! kwt-sms API server binary entrypoint.

use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use kwt_common::config::AppConfig;
use kwt_common::db::create_pool;
use kwt_notifier::{Dispatcher, Notifier};

use kwt_api::routes::create_router;
use kwt_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("kwt_api=debug,kwt_notifier=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting kwt-sms API server...");

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let notifier = Notifier::new(
        config.kwtsms_api_url.clone(),
        config.sms_request_timeout_secs.map(Duration::from_secs),
    )?;
    if config.sms_request_timeout_secs.is_none() {
        tracing::warn!("SMS_REQUEST_TIMEOUT_SECS unset; SMS requests have no timeout");
    }
    tracing::info!(endpoint = %notifier.endpoint(), "SMS notifier ready");

    let listen_addr = config.listen_addr;
    let state = AppState::new(pool, config, Dispatcher::new(notifier));

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("API server listening on {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    Ok(())
}
