//! Document layout: turns a `ResumeDocument` into pages of draw commands.
//!
//! # Flow
//! - A single vertical cursor walks down the page (`Paginator`).
//! - Every block is preceded by a page-break check. Section headers and entries are
//!   checked with a conservative estimate; wrapped text is then checked again per
//!   line (paragraphs) or per wrapped bullet (descriptions), since the real line
//!   count is only known after measuring.
//! - Sections come in a fixed order and empty collections emit nothing.
//!
//! Layout is a pure function of its inputs: the same document and style always
//! produce the same commands.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::layout::commands::{DrawCommand, Page};
use crate::layout::font_metrics::{FontSpec, FontStyle};
use crate::layout::page::{PageConfig, Paginator};
use crate::layout::text::{
    experience_date_range, format_date_for_display, join_nonempty, normalize_description,
    or_placeholder, with_suffix,
};
use crate::layout::wrap::wrap_text;
use crate::models::{
    CertificationEntry, EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo,
    ProjectEntry, ResumeDocument, Rgb, SkillGroup, StyleConfig,
};
use crate::store::photo::decode_photo;

// ────────────────────────────────────────────────────────────────────────────
// Layout constants (mm unless noted)
// ────────────────────────────────────────────────────────────────────────────

const PHOTO_SIZE: f32 = 25.0;
const RULE_WIDTH: f32 = 0.5;
const BULLET_INDENT: f32 = 3.0;
const BULLET_WRAP_INSET: f32 = 5.0;

/// Page-break estimate before a section header.
const SECTION_ESTIMATE: f32 = 20.0;
const LANGUAGES_ESTIMATE: f32 = 15.0;

const TITLE_GRAY: Rgb = Rgb::gray(80);
const CONTACT_GRAY: Rgb = Rgb::gray(60);

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the whole document. Always returns at least one page.
pub fn layout_document(doc: &ResumeDocument, style: &StyleConfig, config: PageConfig) -> Vec<Page> {
    let mut layout = Layout::new(style, config);

    layout.header(&doc.personal_info);

    if !doc.summary.trim().is_empty() {
        layout.summary(&doc.summary);
    }
    if !doc.experience.is_empty() {
        layout.experience(&doc.experience);
    }
    if !doc.education.is_empty() {
        layout.education(&doc.education);
    }
    if !doc.projects.is_empty() {
        layout.projects(&doc.projects);
    }
    if !doc.skills.is_empty() {
        layout.skills(&doc.skills);
    }
    if !doc.certifications.is_empty() {
        layout.certifications(&doc.certifications);
    }
    if !doc.languages.is_empty() {
        layout.languages(&doc.languages);
    }

    let pages = layout.pager.finish();
    debug!(
        pages = pages.len(),
        commands = pages.iter().map(|p| p.commands.len()).sum::<usize>(),
        "Layout complete"
    );
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Layout state
// ────────────────────────────────────────────────────────────────────────────

struct Layout {
    pager: Paginator,
    style: StyleConfig,
}

impl Layout {
    fn new(style: &StyleConfig, config: PageConfig) -> Self {
        Self {
            pager: Paginator::new(config),
            style: *style,
        }
    }

    fn font(&self, style: FontStyle, size_pt: f32) -> FontSpec {
        FontSpec::new(self.style.font, style, size_pt)
    }

    fn left(&self) -> f32 {
        self.pager.config().left()
    }

    fn right(&self) -> f32 {
        self.pager.config().right()
    }

    fn content_width(&self) -> f32 {
        self.pager.config().content_width()
    }

    // ── primitives ───────────────────────────────────────────────────────────

    fn text_at(&mut self, x: f32, y: f32, text: &str, font: FontSpec, color: Rgb) {
        if text.is_empty() {
            return;
        }
        self.pager.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font,
            color,
        });
    }

    /// Text at the cursor.
    fn text(&mut self, x: f32, text: &str, font: FontSpec, color: Rgb) {
        let y = self.pager.cursor();
        self.text_at(x, y, text, font, color);
    }

    /// Text at the cursor, right-aligned to the right margin.
    fn text_right(&mut self, text: &str, font: FontSpec, color: Rgb) {
        let x = self.right() - font.text_width_mm(text);
        self.text(x, text, font, color);
    }

    fn link(&mut self, x: f32, label: &str, url: &str, font: FontSpec) {
        let y = self.pager.cursor();
        self.pager.push(DrawCommand::Link {
            x,
            y,
            text: label.to_string(),
            font,
            color: Rgb::LINK,
            url: url.trim().to_string(),
            width: font.text_width_mm(label),
        });
    }

    /// Wraps `text` and draws it one line at a time, checking for a page break
    /// before every line. Returns the number of lines drawn.
    fn paragraph(&mut self, x: f32, text: &str, max_width: f32, font: FontSpec, step: f32) -> usize {
        let lines = wrap_text(text, &font, max_width);
        for line in &lines {
            self.pager.ensure_space(step);
            self.text(x, line, font, Rgb::BLACK);
            self.pager.advance(step);
        }
        lines.len()
    }

    /// The one visual template every section repeats: bold title, accent rule, gap.
    fn section_header(&mut self, title: &str, estimate: f32) {
        self.pager.ensure_space(estimate);
        debug!(section = title, page = self.pager.page_count(), "Section");
        let font = self.font(FontStyle::Bold, 12.0);
        let left = self.left();
        self.text(left, title, font, Rgb::BLACK);
        self.pager.advance(2.0);
        let rule = DrawCommand::Rule {
            x1: left,
            x2: self.right(),
            y: self.pager.cursor(),
            width: RULE_WIDTH,
            color: self.style.accent.0,
        };
        self.pager.push(rule);
        self.pager.advance(6.0);
    }

    // ── sections ─────────────────────────────────────────────────────────────

    fn header(&mut self, info: &PersonalInfo) {
        let left = self.left();

        if let Some(data_url) = info.photo.as_deref().filter(|p| !p.is_empty()) {
            match decode_photo(data_url) {
                Ok(image) => {
                    let photo = DrawCommand::Image {
                        x: self.right() - PHOTO_SIZE,
                        y: self.pager.config().margin_mm,
                        width: PHOTO_SIZE,
                        height: PHOTO_SIZE,
                        image: Arc::new(image),
                    };
                    self.pager.push(photo);
                }
                Err(e) => warn!(error = %e, "Photo could not be placed; continuing without it"),
            }
        }

        let name_font = self.font(FontStyle::Bold, 20.0);
        self.text(left, or_placeholder(&info.full_name, "Your Name"), name_font, Rgb::BLACK);
        self.pager.advance(8.0);

        if !info.title.trim().is_empty() {
            let font = self.font(FontStyle::Italic, 12.0);
            self.text(left, info.title.trim(), font, TITLE_GRAY);
            self.pager.advance(6.0);
        }

        let contact = join_nonempty(&[&info.email, &info.phone, &info.location], " | ");
        let contact_font = self.font(FontStyle::Normal, 10.0);
        if !contact.is_empty() {
            self.text(left, &contact, contact_font, CONTACT_GRAY);
            self.pager.advance(5.0);
        }

        if !info.linkedin.trim().is_empty() {
            self.link(left, "LinkedIn", &info.linkedin, contact_font);
            self.pager.advance(5.0);
        }
        if !info.website.trim().is_empty() {
            self.link(left, "Portfolio", &info.website, contact_font);
            self.pager.advance(5.0);
        }

        self.pager.advance(5.0);
    }

    fn summary(&mut self, summary: &str) {
        self.section_header("PROFESSIONAL SUMMARY", SECTION_ESTIMATE);
        let font = self.font(FontStyle::Normal, 10.0);
        let (left, width) = (self.left(), self.content_width());
        self.paragraph(left, summary, width, font, 5.0);
        self.pager.advance(5.0);
    }

    fn experience(&mut self, entries: &[ExperienceEntry]) {
        self.section_header("WORK EXPERIENCE", SECTION_ESTIMATE);
        let left = self.left();

        for exp in entries {
            self.pager.ensure_space(25.0);

            let title_font = self.font(FontStyle::Bold, 11.0);
            self.text(left, or_placeholder(&exp.title, "Job Title"), title_font, Rgb::BLACK);
            let date_font = self.font(FontStyle::Normal, 9.0);
            self.text_right(&experience_date_range(exp), date_font, Rgb::BLACK);
            self.pager.advance(5.0);

            let company = with_suffix(or_placeholder(&exp.company, "Company"), &exp.location);
            let italic = self.font(FontStyle::Italic, 10.0);
            self.text(left, &company, italic, Rgb::BLACK);
            self.pager.advance(5.0);

            self.description(&exp.description);
            self.pager.advance(3.0);
        }
        self.pager.advance(2.0);
    }

    /// Bulleted description: each normalized line is wrapped on its own and the
    /// page-break check is re-applied per wrapped line group.
    fn description(&mut self, description: &str) {
        let font = self.font(FontStyle::Normal, 10.0);
        let x = self.left() + BULLET_INDENT;
        let max_width = self.content_width() - BULLET_WRAP_INSET;

        let usable = self.pager.config().bottom_limit() - self.pager.config().margin_mm;

        for line in normalize_description(description) {
            let wrapped = wrap_text(&line.display(), &font, max_width);
            let group_height = wrapped.len() as f32 * 5.0;

            if group_height > usable {
                // Taller than a page: the group has to split, so check every line.
                for segment in &wrapped {
                    self.pager.ensure_space(4.5);
                    self.text(x, segment, font, Rgb::BLACK);
                    self.pager.advance(4.5);
                }
                continue;
            }

            self.pager.ensure_space(group_height);
            for (i, segment) in wrapped.iter().enumerate() {
                let y = self.pager.cursor() + i as f32 * 4.5;
                self.text_at(x, y, segment, font, Rgb::BLACK);
            }
            self.pager.advance(wrapped.len() as f32 * 4.5);
        }
    }

    fn education(&mut self, entries: &[EducationEntry]) {
        self.section_header("EDUCATION", SECTION_ESTIMATE);
        let (left, width) = (self.left(), self.content_width());

        for edu in entries {
            self.pager.ensure_space(20.0);

            let title_font = self.font(FontStyle::Bold, 11.0);
            self.text(left, or_placeholder(&edu.degree, "Degree"), title_font, Rgb::BLACK);
            if !edu.graduation_date.trim().is_empty() {
                let date_font = self.font(FontStyle::Normal, 9.0);
                self.text_right(&format_date_for_display(&edu.graduation_date), date_font, Rgb::BLACK);
            }
            self.pager.advance(5.0);

            let institution = with_suffix(or_placeholder(&edu.institution, "Institution"), &edu.location);
            let italic = self.font(FontStyle::Italic, 10.0);
            self.text(left, &institution, italic, Rgb::BLACK);
            self.pager.advance(5.0);

            if !edu.gpa.trim().is_empty() {
                let font = self.font(FontStyle::Normal, 10.0);
                self.text(left, &format!("GPA: {}", edu.gpa.trim()), font, Rgb::BLACK);
                self.pager.advance(4.0);
            }

            if !edu.courses.trim().is_empty() {
                let font = self.font(FontStyle::Normal, 9.0);
                let courses = format!("Relevant Coursework: {}", edu.courses.trim());
                self.paragraph(left, &courses, width, font, 4.0);
            }
            self.pager.advance(3.0);
        }
        self.pager.advance(2.0);
    }

    fn projects(&mut self, entries: &[ProjectEntry]) {
        self.section_header("PROJECTS", SECTION_ESTIMATE);
        let (left, width) = (self.left(), self.content_width());

        for proj in entries {
            self.pager.ensure_space(20.0);

            let title_font = self.font(FontStyle::Bold, 11.0);
            self.text(left, or_placeholder(&proj.name, "Project Name"), title_font, Rgb::BLACK);
            self.pager.advance(5.0);

            if !proj.description.trim().is_empty() {
                let font = self.font(FontStyle::Normal, 10.0);
                self.paragraph(left, &proj.description, width, font, 4.5);
            }

            if !proj.technologies.trim().is_empty() {
                let font = self.font(FontStyle::Italic, 9.0);
                let tech = format!("Technologies: {}", proj.technologies.trim());
                self.paragraph(left, &tech, width, font, 4.0);
            }

            if !proj.url.trim().is_empty() {
                self.pager.ensure_space(4.0);
                let font = self.font(FontStyle::Normal, 9.0);
                self.link(left, "View Project", &proj.url, font);
                self.pager.advance(4.0);
            }
            self.pager.advance(3.0);
        }
        self.pager.advance(2.0);
    }

    fn skills(&mut self, groups: &[SkillGroup]) {
        self.section_header("SKILLS", SECTION_ESTIMATE);
        let (left, width) = (self.left(), self.content_width());
        let label_font = self.font(FontStyle::Bold, 10.0);
        let items_font = self.font(FontStyle::Normal, 10.0);

        for group in groups {
            self.pager.ensure_space(10.0);
            let category = group.category.trim();

            if category.is_empty() {
                self.paragraph(left, &group.items, width, items_font, 4.5);
            } else {
                let label = format!("{category}:");
                self.text(left, &label, label_font, Rgb::BLACK);
                let offset = label_font.text_width_mm(&format!("{label} "));
                // Items sit beside the label, so their first line shares its baseline.
                let lines = self.paragraph(left + offset, &group.items, width - offset, items_font, 4.5);
                if lines == 0 {
                    self.pager.advance(4.5);
                }
            }
            self.pager.advance(1.0);
        }
        self.pager.advance(2.0);
    }

    fn certifications(&mut self, entries: &[CertificationEntry]) {
        self.section_header("CERTIFICATIONS", SECTION_ESTIMATE);
        let left = self.left();

        for cert in entries {
            self.pager.ensure_space(15.0);

            let title_font = self.font(FontStyle::Bold, 10.0);
            self.text(left, or_placeholder(&cert.name, "Certification"), title_font, Rgb::BLACK);
            if !cert.date.trim().is_empty() {
                let date_font = self.font(FontStyle::Normal, 9.0);
                self.text_right(&format_date_for_display(&cert.date), date_font, Rgb::BLACK);
            }
            self.pager.advance(5.0);

            if !cert.issuer.trim().is_empty() {
                let font = self.font(FontStyle::Italic, 9.0);
                self.text(left, cert.issuer.trim(), font, Rgb::BLACK);
                self.pager.advance(4.0);
            }

            if !cert.credential_id.trim().is_empty() {
                let font = self.font(FontStyle::Normal, 9.0);
                let credential = format!("Credential ID: {}", cert.credential_id.trim());
                self.text(left, &credential, font, Rgb::BLACK);
                self.pager.advance(4.0);
            }

            if !cert.url.trim().is_empty() {
                let font = self.font(FontStyle::Normal, 9.0);
                self.link(left, "View Certificate", &cert.url, font);
                self.pager.advance(4.0);
            }
            self.pager.advance(2.0);
        }
        self.pager.advance(2.0);
    }

    fn languages(&mut self, entries: &[LanguageEntry]) {
        self.section_header("LANGUAGES", LANGUAGES_ESTIMATE);
        let (left, width) = (self.left(), self.content_width());
        let font = self.font(FontStyle::Normal, 10.0);
        self.paragraph(left, &languages_line(entries), width, font, 4.5);
    }
}

/// `English (Native), German (B2)`; blank entries are skipped.
pub(crate) fn languages_line(entries: &[LanguageEntry]) -> String {
    entries
        .iter()
        .filter(|l| !l.name.trim().is_empty() || !l.proficiency.trim().is_empty())
        .map(|l| match l.proficiency.trim() {
            "" => l.name.trim().to_string(),
            level => format!("{} ({level})", l.name.trim()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
