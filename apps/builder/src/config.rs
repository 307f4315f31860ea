use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::FontFamily;

/// Application configuration loaded from environment variables.
/// Every variable has a default; CLI flags override what is loaded here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Preset name or `#rrggbb`.
    pub accent_color: String,
    pub font: FontFamily,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            accent_color: env_or("RESUME_ACCENT_COLOR", "#2563eb"),
            font: env_or("RESUME_FONT", "times")
                .parse::<FontFamily>()
                .context("RESUME_FONT must be one of times, helvetica, courier")?,
            output_dir: PathBuf::from(env_or("RESUME_OUTPUT_DIR", ".")),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
