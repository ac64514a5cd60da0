//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, over a freshly seeded ward.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server (with OpenAPI/Swagger
//! UI). The workspace's main `uti-run` binary also pulls the patient list from the record backend
//! before serving.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState, ClockTicker};
use uti_core::{CoreConfig, EnvValues, Ward};

/// Main entry point for the UTI REST API server
///
/// # Environment Variables
/// - `UTI_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `UTI_NURSE_NAME`: Name recorded on tasks, SBAR notes and checklists
/// - `UTI_SHIFT`: Pins the current shift instead of deriving it from the clock
/// - `UTI_CLOCK_REFRESH_SECS`: Wall-clock refresh period
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("uti_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env_values(EnvValues::from_process_env())?);
    let addr = cfg.rest_addr();
    let refresh = cfg.clock_refresh();

    tracing::info!("-- Starting UTI REST API on {}", addr);

    let ward = Ward::seeded(cfg, chrono::Utc::now())?;
    let state = AppState::new(ward);
    let _ticker = ClockTicker::spawn(state.clone(), refresh);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
