use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, ClockTicker};
use backend::BackendClient;
use uti_core::{CoreConfig, EnvValues, Ward};

/// Main entry point for the UTI dashboard
///
/// Loads `.env`, resolves the configuration, asks the record backend for its patient list and
/// serves the REST API over a seeded ward. The backend is optional: when it is unreachable the
/// dashboard still starts with its seed data.
///
/// # Environment Variables
/// - `UTI_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `UTI_BACKEND_URL`: Base URL of the record backend
/// - `UTI_NURSE_NAME`: Name recorded on tasks, SBAR notes and checklists
/// - `UTI_SHIFT`: Pins the current shift
/// - `UTI_CLOCK_REFRESH_SECS`: Wall-clock refresh period
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("uti_run=info".parse()?)
                .add_directive("uti_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("backend=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env_values(EnvValues::from_process_env())?);
    let rest_addr = cfg.rest_addr();

    let client = BackendClient::new(cfg.backend_url())?;
    let remote = client.load_patients_or_empty().await;
    tracing::info!(
        count = remote.len(),
        backend = %client.base_url(),
        "record backend patients"
    );

    let ward = Ward::seeded(cfg.clone(), chrono::Utc::now())?;
    let state = AppState::new(ward);
    let _ticker = ClockTicker::spawn(state.clone(), cfg.clock_refresh());

    tracing::info!("++ Starting UTI REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, api_rest::app(state)).await?;

    Ok(())
}
