mod cli;
mod config;
mod errors;
mod export;
mod layout;
mod models;
mod preview;
mod render;
mod session;
mod state;
mod store;

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging; stderr keeps stdout free for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(
        "Starting resume builder v{} (font {:?}, output {})",
        env!("CARGO_PKG_VERSION"),
        config.font,
        config.output_dir.display()
    );

    cli::run(config)
}
