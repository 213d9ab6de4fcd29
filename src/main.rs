//! # Payments Demo Webhook Service
//!
//! Entry point for the payments demo platform's ingestion layer. Receives
//! lifecycle webhooks from the Straddle provider, verifies and reconciles
//! them into an in-memory snapshot cache, and fans events out to live
//! dashboard subscribers.

#![recursion_limit = "256"]

pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod models;
pub mod services;
pub mod state;
pub mod webhook;

use ntex::web;
use ntex_cors::Cors;
use std::sync::Arc;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;

    logger::setup_simple_logger(!app_config.is_prod())?;

    // One snapshot cache and one broadcaster shared by all workers; the
    // store is the single writer point for the whole process.
    let store = Arc::new(state::memory::InMemoryStateStore::new());
    let broadcaster = services::broadcast::EventBroadcaster::default();

    // Trace every committed mutation; the dashboard consumes the same feed
    // through /events.
    let mut changes = store.subscribe_changes();
    ntex::rt::spawn(async move {
        while let Ok(change) = changes.recv().await {
            log::debug!("state committed: {:?}", change);
        }
    });

    let app_state = front::AppState {
        store,
        broadcaster,
        webhook_secret: app_config.straddle_webhook_secret.clone(),
    };

    configure_and_run_server(app_state).await
}

/// Configures and starts the web server
async fn configure_and_run_server(app_state: front::AppState) -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;
    let server_addr = app_config.server_addr();

    log::info!(
        "starting webhook service on {}:{} (env: {})",
        server_addr.0,
        server_addr.1,
        app_config.env
    );

    web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_origin(&config::APP_CONFIG.dashboard_origin)
                    .finish(),
            )
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(app_state.clone())
            .configure(webhook::routes::straddle)
            .configure(front::routes::dashboard)
    })
    .bind(server_addr)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
