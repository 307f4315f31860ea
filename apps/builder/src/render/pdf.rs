//! PDF backend on `pdf-writer`.
//!
//! - Text uses the standard Type1 faces with `WinAnsiEncoding`, so no font files
//!   are embedded and the static metrics in `layout::font_metrics` match the viewer.
//! - Content streams and image data are Flate-compressed.
//! - No timestamps or random ids are written: output is byte-identical per input.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::errors::AppError;
use crate::layout::font_metrics::PT_PER_MM;
use crate::layout::{DrawCommand, FontSpec, Page};
use crate::models::Rgb;
use crate::render::{DocumentMeta, DocumentWriter};

const CREATOR: &str = concat!("builder ", env!("CARGO_PKG_VERSION"));

// ────────────────────────────────────────────────────────────────────────────
// Writer
// ────────────────────────────────────────────────────────────────────────────

/// Writes pages of a fixed physical size as a PDF document.
#[derive(Debug, Clone, Copy)]
pub struct PdfDocumentWriter {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
}

impl PdfDocumentWriter {
    pub fn new(page_width_mm: f32, page_height_mm: f32) -> Self {
        Self {
            page_width_mm,
            page_height_mm,
        }
    }

    fn x(&self, mm: f32) -> f32 {
        mm * PT_PER_MM
    }

    /// Layout y grows down from the top edge; PDF y grows up from the bottom.
    fn y(&self, mm: f32) -> f32 {
        (self.page_height_mm - mm) * PT_PER_MM
    }
}

impl DocumentWriter for PdfDocumentWriter {
    fn write(&self, pages: &[Page], meta: &DocumentMeta) -> Result<Vec<u8>, AppError> {
        let mut refs = RefAllocator::default();
        let catalog_id = refs.next();
        let tree_id = refs.next();
        let info_id = refs.next();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);

        let fonts = FontResources::collect(pages, &mut refs);
        for (base, (font_ref, _)) in &fonts.by_base_name {
            pdf.type1_font(*font_ref)
                .base_font(Name(base.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let page_ids: Vec<Ref> = pages.iter().map(|_| refs.next()).collect();
        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for (page, &page_id) in pages.iter().zip(&page_ids) {
            self.write_page(&mut pdf, &mut refs, page, page_id, tree_id, &fonts)?;
        }

        let mut info = pdf.document_info(info_id);
        if !meta.title.is_empty() {
            info.title(TextStr(&meta.title));
        }
        if !meta.author.is_empty() {
            info.author(TextStr(&meta.author));
        }
        info.creator(TextStr(CREATOR));
        info.finish();

        let bytes = pdf.finish();
        debug!(pages = pages.len(), bytes = bytes.len(), "PDF written");
        Ok(bytes)
    }

    fn backend_name(&self) -> &'static str {
        "pdf-writer"
    }
}

impl PdfDocumentWriter {
    fn write_page(
        &self,
        pdf: &mut Pdf,
        refs: &mut RefAllocator,
        page: &Page,
        page_id: Ref,
        tree_id: Ref,
        fonts: &FontResources,
    ) -> Result<(), AppError> {
        let content_id = refs.next();
        let mut content = Content::new();
        let mut images: Vec<(Vec<u8>, Ref)> = Vec::new();
        let mut annotations: Vec<Ref> = Vec::new();

        for command in &page.commands {
            match command {
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font,
                    color,
                } => self.show_text(&mut content, fonts, *x, *y, text, font, *color),

                DrawCommand::Link {
                    x,
                    y,
                    text,
                    font,
                    color,
                    url,
                    width,
                } => {
                    self.show_text(&mut content, fonts, *x, *y, text, font, *color);
                    let annot_id = refs.next();
                    let mut annot = pdf.annotation(annot_id);
                    annot.subtype(AnnotationType::Link);
                    annot.rect(Rect::new(
                        self.x(*x),
                        self.y(*y) - font.size_pt * 0.2,
                        self.x(x + width),
                        self.y(*y) + font.size_pt * 0.8,
                    ));
                    annot.border(0.0, 0.0, 0.0, None);
                    annot
                        .action()
                        .action_type(ActionType::Uri)
                        .uri(Str(url.as_bytes()));
                    annot.finish();
                    annotations.push(annot_id);
                }

                DrawCommand::Rule {
                    x1,
                    x2,
                    y,
                    width,
                    color,
                } => {
                    let (r, g, b) = color.unit();
                    content.set_stroke_rgb(r, g, b);
                    content.set_line_width(width * PT_PER_MM);
                    content.move_to(self.x(*x1), self.y(*y));
                    content.line_to(self.x(*x2), self.y(*y));
                    content.stroke();
                }

                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    image,
                } => {
                    let image_id = refs.next();
                    let name = format!("Im{}", images.len() + 1).into_bytes();
                    let data = deflate(&image.rgb)?;
                    let mut xobject = pdf.image_xobject(image_id, &data);
                    xobject.filter(Filter::FlateDecode);
                    xobject.width(image.width as i32);
                    xobject.height(image.height as i32);
                    xobject.color_space().device_rgb();
                    xobject.bits_per_component(8);
                    xobject.finish();

                    content.save_state();
                    content.transform([
                        width * PT_PER_MM,
                        0.0,
                        0.0,
                        height * PT_PER_MM,
                        self.x(*x),
                        self.y(y + height),
                    ]);
                    content.x_object(Name(&name));
                    content.restore_state();
                    images.push((name, image_id));
                }
            }
        }

        let compressed = deflate(&content.finish())?;
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        let mut page_writer = pdf.page(page_id);
        page_writer.media_box(Rect::new(
            0.0,
            0.0,
            self.page_width_mm * PT_PER_MM,
            self.page_height_mm * PT_PER_MM,
        ));
        page_writer.parent(tree_id);
        page_writer.contents(content_id);
        {
            let mut resources = page_writer.resources();
            {
                let mut font_dict = resources.fonts();
                for (font_ref, name) in fonts.by_base_name.values() {
                    font_dict.pair(Name(name), *font_ref);
                }
            }
            if !images.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, image_id) in &images {
                    xobjects.pair(Name(name), *image_id);
                }
            }
        }
        if !annotations.is_empty() {
            page_writer.annotations(annotations.iter().copied());
        }
        page_writer.finish();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn show_text(
        &self,
        content: &mut Content,
        fonts: &FontResources,
        x: f32,
        y: f32,
        text: &str,
        font: &FontSpec,
        color: Rgb,
    ) {
        let Some(resource) = fonts.resource_name(font) else {
            return;
        };
        let (r, g, b) = color.unit();
        content.begin_text();
        content.set_font(Name(resource), font.size_pt);
        content.set_fill_rgb(r, g, b);
        content.next_line(self.x(x), self.y(y));
        content.show(Str(&encode_win_ansi(text)));
        content.end_text();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct RefAllocator(i32);

impl Default for RefAllocator {
    fn default() -> Self {
        Self(1)
    }
}

impl RefAllocator {
    fn next(&mut self) -> Ref {
        let id = Ref::new(self.0);
        self.0 += 1;
        id
    }
}

/// Every face used anywhere in the document, keyed by PostScript name so the
/// object order is stable.
struct FontResources {
    by_base_name: BTreeMap<&'static str, (Ref, Vec<u8>)>,
}

impl FontResources {
    fn collect(pages: &[Page], refs: &mut RefAllocator) -> Self {
        let mut names: Vec<&'static str> = pages
            .iter()
            .flat_map(|p| p.commands.iter())
            .filter_map(|c| match c {
                DrawCommand::Text { font, .. } | DrawCommand::Link { font, .. } => {
                    Some(font.base_font_name())
                }
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();

        let by_base_name = names
            .into_iter()
            .enumerate()
            .map(|(i, base)| (base, (refs.next(), format!("F{}", i + 1).into_bytes())))
            .collect();
        Self { by_base_name }
    }

    fn resource_name(&self, font: &FontSpec) -> Option<&[u8]> {
        self.by_base_name
            .get(font.base_font_name())
            .map(|(_, name)| name.as_slice())
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| AppError::Render(format!("compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| AppError::Render(format!("compression failed: {e}")))
}

/// Encodes text for a `WinAnsiEncoding` font. Characters the encoding lacks
/// become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
