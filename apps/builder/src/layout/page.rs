//! Page geometry and the page-break check.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::commands::{DrawCommand, Page};

/// Fixed page geometry, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn left(&self) -> f32 {
        self.margin_mm
    }

    pub fn right(&self) -> f32 {
        self.width_mm - self.margin_mm
    }

    /// Lowest y a block may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height_mm - self.margin_mm
    }
}

/// A4 portrait with 20mm margins.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 20.0,
    }
}

/// Vertical cursor plus the pages emitted so far.
///
/// `y` grows downward from the top edge. The current page is always the last one
/// in `pages`, so there is at least one page even for an empty document.
#[derive(Debug)]
pub struct Paginator {
    config: PageConfig,
    pages: Vec<Page>,
    cursor: f32,
}

impl Paginator {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            cursor: config.margin_mm,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor += dy;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Starts a new page when a block of `height` would cross the bottom margin.
    /// Returns whether a break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor + height > self.config.bottom_limit() {
            self.pages.push(Page::default());
            self.cursor = self.config.margin_mm;
            true
        } else {
            false
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        if command.bottom() > self.config.bottom_limit() {
            warn!(
                bottom = command.bottom(),
                limit = self.config.bottom_limit(),
                "Draw command crosses the bottom margin"
            );
        }
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}
