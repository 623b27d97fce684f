//! churn-ui - Telco customer churn prediction web UI
//!
//! Loads the processor, scaler and classifier artifacts once at startup and
//! serves the Data Input and Prediction Result pages.

use anyhow::Result;
use churn_common::config::{load_toml_config, Settings};
use churn_common::model::load_artifacts;
use churn_ui::cli::Args;
use churn_ui::logging;
use churn_ui::{build_router, AppState};
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing first so config loading is visible
    let log_control = logging::init();

    info!(
        "Starting churn-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let (toml_config, config_source) = load_toml_config(args.config.as_deref())?;
    config_source.log();
    let settings = Settings::resolve(args.overrides(), toml_config);

    if let Err(e) = log_control.apply_level(&settings.log_level) {
        warn!("{}, keeping level {}", e, logging::STARTUP_LEVEL);
    }

    info!(
        artifact_dir = %settings.artifact_dir.display(),
        session_ttl_secs = settings.session_ttl.as_secs(),
        "Configuration resolved"
    );

    let artifacts = load_artifacts(&settings.artifact_dir);
    match &artifacts {
        Ok(_) => info!("✓ Model artifacts loaded"),
        Err(e) => {
            error!("{}", e);
            error!("Serving in halted mode: predictions are disabled until restart");
        }
    }

    let state = AppState::new(artifacts, settings.session_ttl);
    let app = build_router(state);

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("churn-ui listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
