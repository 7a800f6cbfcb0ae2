use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Logs to stderr. `RUST_LOG` takes precedence over the configured level.
pub fn init_telemetry(config: &LogConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("{e}"))
}
