use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`). Stdout stays
/// free for the binaries' summaries.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
}
