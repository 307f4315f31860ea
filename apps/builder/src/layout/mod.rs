// Layout: measures text against static font metrics, wraps it, and paginates the
// document into positioned draw commands. Pure and synchronous; no I/O.

pub mod commands;
pub mod engine;
pub mod font_metrics;
pub mod page;
pub mod text;
pub mod wrap;

// Re-export the public API consumed by the renderer, export and preview.
pub use commands::{DrawCommand, Page};
pub use engine::layout_document;
pub use font_metrics::FontSpec;
pub use page::default_page_config;
