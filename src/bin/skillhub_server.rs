//! SkillHub HTTP server.
//!
//! Configuration comes from the environment (see `SiteConfig`); logging is
//! controlled with `RUST_LOG`.

use anyhow::Result;
use skillhub::SiteConfig;
use skillhub::server::{AppState, start_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = SiteConfig::from_env()?;
    let state = AppState::load(config)?;
    start_server(state).await
}
