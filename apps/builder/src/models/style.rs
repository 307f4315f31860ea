use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Hyperlink blue.
    pub const LINK: Rgb = Rgb::new(0, 102, 204);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Components scaled to 0.0..=1.0, as PDF color operators expect.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }

    /// Parses `#rrggbb` or `rrggbb`. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The accent color applied to section titles' rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentColor(pub Rgb);

impl AccentColor {
    pub const DEFAULT: AccentColor = AccentColor(Rgb::new(37, 99, 235));

    /// Parses a hex color; invalid input falls back to the default blue.
    pub fn parse_or_default(hex: &str) -> Self {
        match Rgb::from_hex(hex) {
            Some(rgb) => AccentColor(rgb),
            None => {
                tracing::warn!(input = hex, "Invalid accent color, using default");
                Self::DEFAULT
            }
        }
    }

    /// Resolves a preset name (case-insensitive) or a hex value.
    pub fn from_preset_or_hex(value: &str) -> Self {
        COLOR_PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value.trim()))
            .map(|(_, hex)| Self::parse_or_default(hex))
            .unwrap_or_else(|| Self::parse_or_default(value))
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Named accent color presets offered by the color picker.
pub const COLOR_PRESETS: &[(&str, &str)] = &[
    ("Blue", "#2563eb"),
    ("Green", "#059669"),
    ("Purple", "#7c3aed"),
    ("Red", "#dc2626"),
    ("Orange", "#ea580c"),
    ("Teal", "#0d9488"),
    ("Pink", "#db2777"),
    ("Indigo", "#4f46e5"),
];

/// Base-14 PDF font families available for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Times Roman, the classic resume serif.
    #[default]
    Times,
    Helvetica,
    Courier,
}

impl FromStr for FontFamily {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "times" | "times-roman" | "serif" => Ok(FontFamily::Times),
            "helvetica" | "arial" | "sans" | "sans-serif" => Ok(FontFamily::Helvetica),
            "courier" | "mono" | "monospace" => Ok(FontFamily::Courier),
            other => Err(AppError::UnknownFont(other.to_string())),
        }
    }
}

/// Style parameters for one export.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleConfig {
    pub accent: AccentColor,
    pub font: FontFamily,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_parses_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#059669"), Some(Rgb::new(5, 150, 105)));
        assert_eq!(Rgb::from_hex("DC2626"), Some(Rgb::new(220, 38, 38)));
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::from_hex(""), None);
    }

    #[test]
    fn test_invalid_accent_falls_back_to_default_blue() {
        let accent = AccentColor::parse_or_default("not-a-color");
        assert_eq!(accent.0, Rgb::new(37, 99, 235));
    }

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        let accent = AccentColor::from_preset_or_hex("teal");
        assert_eq!(accent.0.to_string(), "#0d9488");
    }

    #[test]
    fn test_display_round_trips_hex() {
        let rgb = Rgb::from_hex("#7c3aed").unwrap();
        assert_eq!(rgb.to_string(), "#7c3aed");
    }

    #[test]
    fn test_font_family_parsing() {
        assert_eq!("Helvetica".parse::<FontFamily>().unwrap(), FontFamily::Helvetica);
        assert_eq!("times".parse::<FontFamily>().unwrap(), FontFamily::Times);
        assert!(matches!(
            "comic".parse::<FontFamily>(),
            Err(AppError::UnknownFont(_))
        ));
    }
}
