//! Tracing setup
//!
//! The subscriber is installed before the config file is read, so events
//! emitted while settings are resolved still reach the output. It starts at
//! `info` (or whatever `RUST_LOG` says) and switches to the configured level
//! once settings are known. `RUST_LOG`, when set, always wins.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Level used until the config file has been read
pub const STARTUP_LEVEL: &str = "info";

/// Reloadable filter layer installed directly on the registry
pub type FilterLayer = reload::Layer<EnvFilter, Registry>;

#[derive(Debug, thiserror::Error)]
pub enum LogLevelError {
    #[error("Invalid log level '{level}': {reason}")]
    Invalid { level: String, reason: String },

    #[error("Log filter reload failed: {0}")]
    Reload(#[from] reload::Error),
}

/// Handle for changing the active level after startup
#[derive(Clone)]
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogControl {
    /// True when `RUST_LOG` chose the filter
    pub fn from_env(&self) -> bool {
        self.from_env
    }

    /// Switch to the configured level. A no-op when `RUST_LOG` is set.
    pub fn apply_level(&self, level: &str) -> Result<(), LogLevelError> {
        if self.from_env {
            return Ok(());
        }
        let filter = EnvFilter::try_new(level).map_err(|e| LogLevelError::Invalid {
            level: level.to_string(),
            reason: e.to_string(),
        })?;
        self.handle.reload(filter)?;
        Ok(())
    }
}

/// Startup filter layer and its control handle
pub fn level_filter() -> (FilterLayer, LogControl) {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(STARTUP_LEVEL), false),
    };
    let (layer, handle) = reload::Layer::new(filter);
    (layer, LogControl { handle, from_env })
}

/// Install the global subscriber: reloadable filter plus fmt output
pub fn init() -> LogControl {
    let (filter, control) = level_filter();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    control
}
