//! Raffleline Server
//!
//! Production server for the raffle inventory REST API.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RL_API_PORT` | `4000` | HTTP API port |
//! | `RL_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `RL_MONGO_DB` | `raffleline` | MongoDB database name |
//! | `SMTP_HOST` | `smtp.gmail.com` | SMTP relay host |
//! | `SMTP_PORT` | `587` | SMTP relay port |
//! | `SMTP_USER` | - | SMTP username, also the sender default |
//! | `SMTP_PASS` | - | SMTP password |
//! | `EMAIL_FROM` | `SMTP_USER` | Sender address |
//! | `EMAIL_CC` | - | Audit copy recipient |
//! | `EMAIL_SEND_TIMEOUT_MS` | `8000` | Per-attempt send timeout |
//! | `EMAIL_MAX_RETRIES` | `3` | Retries after the first attempt |
//! | `EMAIL_BACKOFF_BASE_MS` | `600` | Backoff base, doubled per attempt |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rl_inventory::api::{raffle_router, RaffleState};
use rl_inventory::repository::{LotteryRepository, UserRepository};
use rl_inventory::service::InventoryService;
use rl_mailer::{EmailDispatcher, MailerConfig};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Raffleline Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("RL_API_PORT", 4000);
    let mongo_url = env_or("RL_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("RL_MONGO_DB", "raffleline");

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Repositories
    let lotteries = Arc::new(LotteryRepository::new(&db));
    let users = Arc::new(UserRepository::new(&db));

    // Mail dispatcher over an SMTP connection pool. A failed startup
    // verification is logged, not fatal; each delivery rebuilds and
    // reverifies the transport on retry anyway.
    let mailer_config = MailerConfig::from_env();
    let mailer = EmailDispatcher::smtp(mailer_config)?;
    {
        let mailer = Arc::clone(&mailer);
        tokio::spawn(async move {
            if mailer.verify_transport().await {
                info!("SMTP transport verified");
            } else {
                warn!("SMTP transport verification failed, deliveries will retry");
            }
        });
    }

    let service = Arc::new(InventoryService::new(lotteries, users, mailer));
    let state = RaffleState { service };

    let app = Router::new()
        .nest("/api/raffle", raffle_router(state))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API listening on {}", api_addr);
    let api_listener = TcpListener::bind(&api_addr).await?;
    let api_handle = tokio::spawn(async move {
        axum::serve(api_listener, app).await.unwrap();
    });

    shutdown_signal().await;
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
