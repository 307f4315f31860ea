//! Text normalization shared by the exporter and the preview.

use chrono::NaiveDate;

use crate::models::{ExperienceEntry, PRESENT};

pub const BULLET: char = '\u{2022}';
/// Shown in place of a missing date.
pub const DATE_PLACEHOLDER: &str = "MM/YYYY";

const BULLET_MARKERS: [char; 3] = [BULLET, '-', '*'];

/// Formats a stored `YYYY-MM` date as `Mon YYYY`.
///
/// `Present` passes through unchanged and an empty date becomes the placeholder.
/// Anything that doesn't parse as a year-month is shown as typed.
pub fn format_date_for_display(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return DATE_PLACEHOLDER.to_string();
    }
    if date == PRESENT {
        return PRESENT.to_string();
    }
    match NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%b %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// `start - end` for an experience entry; a current job always ends in `Present`.
pub fn experience_date_range(exp: &ExperienceEntry) -> String {
    let end = if exp.current {
        PRESENT.to_string()
    } else {
        format_date_for_display(&exp.end_date)
    };
    format!("{} - {}", format_date_for_display(&exp.start_date), end)
}

/// One line of a description after bullet normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionLine {
    Bullet(String),
    Plain(String),
}

impl DescriptionLine {
    /// The line as drawn: bullets get a single glyph and a space.
    pub fn display(&self) -> String {
        match self {
            DescriptionLine::Bullet(content) => format!("{BULLET} {content}"),
            DescriptionLine::Plain(content) => content.clone(),
        }
    }
}

/// Splits a description into lines, dropping blank ones, and normalizes a leading
/// `•`, `-` or `*` marker to a single bullet.
pub fn normalize_description(text: &str) -> Vec<DescriptionLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix(&BULLET_MARKERS[..]) {
            Some(rest) => DescriptionLine::Bullet(rest.trim().to_string()),
            None => DescriptionLine::Plain(line.to_string()),
        })
        .collect()
}

/// Joins the trimmed, non-empty parts with `separator`.
pub fn join_nonempty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Returns `value`, or `placeholder` when it is blank.
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// `primary | secondary`, or just `primary` when there is no secondary part.
pub fn with_suffix(primary: &str, secondary: &str) -> String {
    if secondary.trim().is_empty() {
        primary.to_string()
    } else {
        format!("{primary} | {}", secondary.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_year_month() {
        assert_eq!(format_date_for_display("2021-06"), "Jun 2021");
        assert_eq!(format_date_for_display("1999-12"), "Dec 1999");
    }

    #[test]
    fn test_format_date_present_passthrough() {
        assert_eq!(format_date_for_display("Present"), "Present");
    }

    #[test]
    fn test_format_date_empty_is_placeholder() {
        assert_eq!(format_date_for_display(""), DATE_PLACEHOLDER);
    }

    #[test]
    fn test_format_date_unparseable_shown_as_typed() {
        assert_eq!(format_date_for_display("Spring 2020"), "Spring 2020");
        assert_eq!(format_date_for_display("2020-13"), "2020-13");
    }

    #[test]
    fn test_bullet_normalization() {
        let lines = normalize_description("• A\n- B\n*C\nplain");
        assert_eq!(
            lines,
            vec![
                DescriptionLine::Bullet("A".into()),
                DescriptionLine::Bullet("B".into()),
                DescriptionLine::Bullet("C".into()),
                DescriptionLine::Plain("plain".into()),
            ]
        );
        assert_eq!(lines[0].display(), "• A");
        assert_eq!(lines[3].display(), "plain");
    }

    #[test]
    fn test_bullet_normalization_drops_blank_lines_and_trims() {
        let lines = normalize_description("  - Shipped v2  \n\n   \n  Led team ");
        assert_eq!(
            lines,
            vec![
                DescriptionLine::Bullet("Shipped v2".into()),
                DescriptionLine::Plain("Led team".into()),
            ]
        );
    }

    #[test]
    fn test_only_leading_marker_is_stripped() {
        let lines = normalize_description("-- double");
        assert_eq!(lines, vec![DescriptionLine::Bullet("- double".into())]);
    }

    #[test]
    fn test_experience_date_range_current() {
        let exp = ExperienceEntry {
            start_date: "2021-06".into(),
            end_date: "2023-01".into(),
            current: true,
            ..ExperienceEntry::default()
        };
        assert_eq!(experience_date_range(&exp), "Jun 2021 - Present");
    }

    #[test]
    fn test_experience_date_range_missing_dates() {
        let exp = ExperienceEntry::default();
        assert_eq!(experience_date_range(&exp), "MM/YYYY - MM/YYYY");
    }

    #[test]
    fn test_join_nonempty() {
        assert_eq!(join_nonempty(&["a@b.c", "", "Berlin"], " | "), "a@b.c | Berlin");
        assert_eq!(join_nonempty(&["", " "], " | "), "");
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("Acme", "Remote"), "Acme | Remote");
        assert_eq!(with_suffix("Acme", ""), "Acme");
    }
}
