mod config;
mod errors;
mod layout;
mod models;
mod routes;
mod sessions;
mod state;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::metric_table_surface;
use crate::routes::build_router;
use crate::sessions::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvpage v{}", env!("CARGO_PKG_VERSION"));

    // Measurement surface: static font metric tables, ready once loaded
    let surface = Arc::new(metric_table_surface());
    info!("Measurement surface ready");

    let idle_ttl = chrono::Duration::seconds(i64::try_from(config.session_idle_secs)?);
    let sessions = SessionRegistry::new(
        config.storage_public_url.clone(),
        config.max_sessions,
        idle_ttl,
    );
    info!(
        max_sessions = config.max_sessions,
        idle_secs = config.session_idle_secs,
        "Session registry initialized"
    );
    spawn_session_reaper(sessions.clone());

    let state = AppState {
        config: config.clone(),
        surface,
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Sweeps idle sessions every half TTL (at least once a second).
fn spawn_session_reaper(sessions: SessionRegistry) {
    let period = sessions
        .idle_ttl()
        .to_std()
        .unwrap_or_default()
        .checked_div(2)
        .unwrap_or_default()
        .max(std::time::Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sessions.purge_idle().await;
        }
    });
}
