use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::export::export;
use crate::models::{AccentColor, FontFamily, StyleConfig};
use crate::preview::render_preview;
use crate::session::{load_document, presets_listing, run_session};
use crate::state::SessionState;
use crate::store::FormStore;

#[derive(Parser, Debug)]
#[command(
    name = "builder",
    about = "Build a resume from form input and export it as a paginated PDF",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit a resume interactively, one command per line (default command)
    Session(StyleArgs),
    /// Export a JSON resume document to PDF
    Export(ExportArgs),
    /// Print the plain-text preview of a JSON resume document
    Preview(InputArgs),
    /// List the accent color presets
    Presets,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StyleArgs {
    /// Accent color preset name or #rrggbb, overrides RESUME_ACCENT_COLOR
    #[arg(long)]
    accent: Option<String>,
    /// Font family (times, helvetica, courier), overrides RESUME_FONT
    #[arg(long)]
    font: Option<FontFamily>,
    /// Output directory, overrides RESUME_OUTPUT_DIR
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
pub(crate) struct InputArgs {
    /// JSON document with the same fields as the form (camelCase)
    #[arg(long, short)]
    input: PathBuf,
}

impl StyleArgs {
    fn apply(self, mut config: Config) -> Config {
        if let Some(accent) = self.accent {
            config.accent_color = accent;
        }
        if let Some(font) = self.font {
            config.font = font;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        config
    }
}

pub(crate) fn run(config: Config) -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Session(StyleArgs::default()));

    match command {
        Command::Session(style) => {
            let config = style.apply(config);
            let mut state = SessionState::new(&config);
            let stdin = io::stdin();
            run_session(&mut state, stdin.lock(), io::stdout()).context("session failed")?;
        }
        Command::Export(args) => {
            let config = args.style.apply(config);
            let path = &args.input.input;
            let document = load_document(path)
                .with_context(|| format!("failed to read document {}", path.display()))?;
            let store = FormStore::from_document(document);
            let style = StyleConfig {
                accent: AccentColor::from_preset_or_hex(&config.accent_color),
                font: config.font,
            };
            let report = export(store.document(), &style, &config.output_dir).context("export failed")?;
            info!(path = %report.path.display(), pages = report.pages, "Done");
            println!("{}", report.path.display());
        }
        Command::Preview(args) => print!("{}", preview_file(&args.input)?),
        Command::Presets => println!("{}", presets_listing()),
    }
    Ok(())
}

/// Imports a JSON document through the store and renders its preview.
fn preview_file(path: &Path) -> Result<String> {
    let document = load_document(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let store = FormStore::from_document(document);
    Ok(render_preview(store.document()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_file_imports_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r#"{"experience":[{"title":"Engineer","startDate":"2021-06","current":true,"endDate":"2022-01"}]}"#,
        )
        .unwrap();
        let preview = preview_file(&path).unwrap();
        assert!(preview.contains("Engineer (Jun 2021 - Present)"));
    }

    #[test]
    fn test_preview_file_missing_input_is_an_error() {
        assert!(preview_file(Path::new("/nonexistent/doc.json")).is_err());
    }
}
