use anyhow::{anyhow, Context};
use std::fs::File;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the file to which logs are appended.  The
/// program draws on the terminal, so nothing is logged unless it is set.
pub(crate) const LOG_FILE_VAR: &str = "MONTHPICK_LOG";

const DEFAULT_FILTER: &str = "debug";

pub(crate) fn init_tracing() -> anyhow::Result<()> {
    let Some(path) = std::env::var_os(LOG_FILE_VAR) else {
        return Ok(());
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.to_string_lossy()))?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;
    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}
