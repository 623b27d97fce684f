//! Command-line arguments

use churn_common::config::Overrides;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for churn-ui
#[derive(Parser, Debug)]
#[command(name = "churn-ui")]
#[command(about = "Telco customer churn prediction web UI")]
#[command(version)]
pub struct Args {
    /// Directory holding the processor, scaler and model artifacts
    #[arg(short, long, env = "CHURN_ARTIFACT_DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CHURN_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CHURN_PORT")]
    pub port: Option<u16>,

    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long, env = "CHURN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            artifact_dir: self.artifact_dir.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}
