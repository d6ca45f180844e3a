use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

fn main() -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let stdout_subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .pretty()
        .finish();
    tracing::subscriber::set_global_default(stdout_subscriber)?;

    let files = std::env::args_os().skip(1).map(PathBuf::from).collect();
    meshview::meshview_main(files)
}
