// src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use http::{header, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::fmt::init as tracing_init;

use vacation_stats::auth::PasswordHasher;
use vacation_stats::config::AppConfig;
use vacation_stats::repository::PgStatsRepository;
use vacation_stats::state::{AppState, SystemClock};
use vacation_stats::{build_app, database};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return;
        }
    };

    let db_pool = match database::create_pool(&config.database_url, config.database_max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create database pool");
            return;
        }
    };

    let app_state = AppState::new(
        Arc::new(PgStatsRepository::new(db_pool)),
        PasswordHasher::new(config.password_iterations),
        config.session.clone(),
        Arc::new(SystemClock),
    );

    let app = build_app(app_state).layer(cors_layer(&config.cors_allowed_origins));

    // Try port..port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => {
                    bound = Some((l, addr));
                    break;
                }
                Err(e) => {
                    if offset == 0 {
                        tracing::warn!(%addr, error = %e, "Port in use, trying next");
                    }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", config.port, config.host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}

// The dashboard frontend calls the API with credentials, so origins are listed explicitly.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
