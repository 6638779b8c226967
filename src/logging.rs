// src/logging.rs
// =============================================================================
// Sets up tracing output.
//
// Logs go to stderr so stdout stays clean for results (and --json).
// RUST_LOG wins when set; otherwise -v flags pick the level for this crate.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

// Verbosity: 0 = warnings only, 1 = info, 2+ = debug
pub fn init_logging(verbosity: u8) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,link_harvest=info",
        _ => "warn,link_harvest=debug",
    }
}
