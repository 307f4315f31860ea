use std::sync::Arc;

use crate::layout::font_metrics::FontSpec;
use crate::models::Rgb;
use crate::store::photo::RasterImage;

/// One positioned drawing operation. Coordinates are millimetres from the top-left
/// corner of the page; text `y` is the baseline and `x` its left edge.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text {
        x: f32,
        y: f32,
        text: String,
        font: FontSpec,
        color: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        width: f32,
        color: Rgb,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: Arc<RasterImage>,
    },
    /// A text run that is also a hyperlink; `width` is the measured run width.
    Link {
        x: f32,
        y: f32,
        text: String,
        font: FontSpec,
        color: Rgb,
        url: String,
        width: f32,
    },
}

impl DrawCommand {
    /// Lowest y touched by the command.
    pub fn bottom(&self) -> f32 {
        match self {
            DrawCommand::Text { y, .. } | DrawCommand::Link { y, .. } => *y,
            DrawCommand::Rule { y, width, .. } => y + width / 2.0,
            DrawCommand::Image { y, height, .. } => y + height,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub commands: Vec<DrawCommand>,
}
