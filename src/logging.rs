use tracing_subscriber::EnvFilter;

use crate::errors::{RecoveryError, Result};

/// `RUST_LOG` wins when set; otherwise `-v` raises the level for this crate.
pub fn init_tracing(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,item_recovery={}", default_level)))
        .map_err(|e| RecoveryError::Config(format!("invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RecoveryError::Config(format!("failed to initialize tracing: {}", e)))
}
