//! Greedy word wrap against the static font metrics.
//!
//! This is the text-measurement facility the layout engine relies on: given a
//! string, a face and a maximum width, it returns the lines a viewer will draw.

use crate::layout::font_metrics::{get_metrics, FontSpec, PT_PER_MM};

/// Wraps `text` to `max_width_mm`.
///
/// Explicit newlines always start a new line (blank input lines are kept as empty
/// lines). Words wider than the whole line are broken at character boundaries.
/// Text with no visible characters wraps to zero lines.
pub fn wrap_text(text: &str, font: &FontSpec, max_width_mm: f32) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let metrics = get_metrics(font.family, font.style);
    // Work in em units to avoid a multiply per glyph.
    let max_em = max_width_mm * PT_PER_MM / font.size_pt;

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in words {
            let word_w = metrics.measure_str(word);
            let space_w = if current.is_empty() {
                0.0
            } else {
                metrics.space_width
            };

            if current_width + space_w + word_w <= max_em {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += space_w + word_w;
                continue;
            }

            // Word doesn't fit on this line: flush and retry on a fresh line.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            if word_w <= max_em {
                current.push_str(word);
                current_width = word_w;
            } else {
                for c in word.chars() {
                    let c_w = metrics.char_width(c);
                    if !current.is_empty() && current_width + c_w > max_em {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0.0;
                    }
                    current.push(c);
                    current_width += c_w;
                }
            }
        }
        lines.push(current);
    }

    // Trailing blank lines carry no ink.
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
