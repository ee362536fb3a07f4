use std::process::ExitCode;

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!("tessera starting");
    Ok(tessera_cli::run()?)
}
