use std::path::PathBuf;

use crate::config::Config;
use crate::models::{AccentColor, StyleConfig};
use crate::store::FormStore;

/// Everything one editing session owns. Created empty at start, dropped at exit;
/// nothing is persisted.
#[derive(Debug)]
pub struct SessionState {
    pub store: FormStore,
    /// Accent color and font applied on export.
    pub style: StyleConfig,
    /// Where `export` writes when no directory is given.
    pub output_dir: PathBuf,
}

impl SessionState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: FormStore::new(),
            style: StyleConfig {
                accent: AccentColor::from_preset_or_hex(&config.accent_color),
                font: config.font,
            },
            output_dir: config.output_dir.clone(),
        }
    }
}
