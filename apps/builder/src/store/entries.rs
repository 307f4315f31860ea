//! Per-section field setters.
//!
//! Each entry type owns its field table: the form addresses fields by name, and the
//! name is matched here onto a typed struct field. Names are accepted in the form's
//! camelCase and in snake_case.

use uuid::Uuid;

use crate::models::{
    CertificationEntry, EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo,
    ProjectEntry, SkillGroup, PRESENT,
};

/// A value written into a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Interprets the value as a checkbox state. Text is truthy for
    /// `true`/`yes`/`on`/`1`.
    fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Text(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
        }
    }

    fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}

/// Result of a single field write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWrite {
    Applied,
    /// The field exists but is currently read-only (end date of a current job).
    Locked,
    UnknownField,
}

/// A record type stored in one repeatable section.
pub trait SectionEntry: Default {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite;
}

/// Normalizes `startDate` / `start_date` / `Start-Date` to `startdate`.
pub(crate) fn normalize(field: &str) -> String {
    field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub(crate) fn set_personal_field(info: &mut PersonalInfo, field: &str, value: FieldValue) -> FieldWrite {
    let slot = match normalize(field).as_str() {
        "fullname" | "name" => &mut info.full_name,
        "title" => &mut info.title,
        "email" => &mut info.email,
        "phone" => &mut info.phone,
        "location" => &mut info.location,
        "linkedin" => &mut info.linkedin,
        "website" | "portfolio" => &mut info.website,
        "photo" => {
            let text = value.into_text();
            info.photo = if text.is_empty() { None } else { Some(text) };
            return FieldWrite::Applied;
        }
        _ => return FieldWrite::UnknownField,
    };
    *slot = value.into_text();
    FieldWrite::Applied
}

impl SectionEntry for ExperienceEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite {
        let slot = match normalize(field).as_str() {
            "title" => &mut self.title,
            "company" => &mut self.company,
            "location" => &mut self.location,
            "startdate" | "start" => &mut self.start_date,
            "enddate" | "end" => {
                if self.current {
                    return FieldWrite::Locked;
                }
                &mut self.end_date
            }
            "description" => &mut self.description,
            "current" => {
                let current = value.as_flag();
                if current {
                    self.end_date = PRESENT.to_string();
                } else if self.current {
                    self.end_date.clear();
                }
                self.current = current;
                return FieldWrite::Applied;
            }
            _ => return FieldWrite::UnknownField,
        };
        *slot = value.into_text();
        FieldWrite::Applied
    }
}

impl SectionEntry for EducationEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite {
        let slot = match normalize(field).as_str() {
            "degree" => &mut self.degree,
            "institution" | "school" => &mut self.institution,
            "location" => &mut self.location,
            "graduationdate" | "graduation" | "date" => &mut self.graduation_date,
            "gpa" => &mut self.gpa,
            "courses" | "coursework" => &mut self.courses,
            _ => return FieldWrite::UnknownField,
        };
        *slot = value.into_text();
        FieldWrite::Applied
    }
}

impl SectionEntry for SkillGroup {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite {
        let slot = match normalize(field).as_str() {
            "category" => &mut self.category,
            "items" | "skills" => &mut self.items,
            _ => return FieldWrite::UnknownField,
        };
        *slot = value.into_text();
        FieldWrite::Applied
    }
}

impl SectionEntry for ProjectEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite {
        let slot = match normalize(field).as_str() {
            "name" => &mut self.name,
            "description" => &mut self.description,
            "technologies" | "tech" => &mut self.technologies,
            "url" | "link" => &mut self.url,
            _ => return FieldWrite::UnknownField,
        };
        *slot = value.into_text();
        FieldWrite::Applied
    }
}

impl SectionEntry for CertificationEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite {
        let slot = match normalize(field).as_str() {
            "name" => &mut self.name,
            "issuer" => &mut self.issuer,
            "date" => &mut self.date,
            "credentialid" | "credential" => &mut self.credential_id,
            "url" | "link" => &mut self.url,
            _ => return FieldWrite::UnknownField,
        };
        *slot = value.into_text();
        FieldWrite::Applied
    }
}

impl SectionEntry for LanguageEntry {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> FieldWrite {
        let slot = match normalize(field).as_str() {
            "name" | "language" => &mut self.name,
            "proficiency" | "level" => &mut self.proficiency,
            _ => return FieldWrite::UnknownField,
        };
        *slot = value.into_text();
        FieldWrite::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_both_casings() {
        assert_eq!(normalize("startDate"), "startdate");
        assert_eq!(normalize("start_date"), "startdate");
    }

    #[test]
    fn test_current_forces_present_end_date() {
        let mut exp = ExperienceEntry::default();
        exp.set_field("endDate", FieldValue::text("2020-01"));
        assert_eq!(exp.set_field("current", FieldValue::Flag(true)), FieldWrite::Applied);
        assert!(exp.current);
        assert_eq!(exp.end_date, PRESENT);
    }

    #[test]
    fn test_end_date_locked_while_current() {
        let mut exp = ExperienceEntry::default();
        exp.set_field("current", FieldValue::Flag(true));
        assert_eq!(
            exp.set_field("end_date", FieldValue::text("2024-02")),
            FieldWrite::Locked
        );
        assert_eq!(exp.end_date, PRESENT);
    }

    #[test]
    fn test_clearing_current_clears_end_date() {
        let mut exp = ExperienceEntry::default();
        exp.set_field("current", FieldValue::Flag(true));
        exp.set_field("current", FieldValue::text("false"));
        assert!(!exp.current);
        assert!(exp.end_date.is_empty());
        assert_eq!(
            exp.set_field("endDate", FieldValue::text("2024-02")),
            FieldWrite::Applied
        );
        assert_eq!(exp.end_date, "2024-02");
    }

    #[test]
    fn test_unchecking_a_non_current_job_keeps_end_date() {
        let mut exp = ExperienceEntry::default();
        exp.set_field("endDate", FieldValue::text("2023-01"));
        assert_eq!(exp.set_field("current", FieldValue::Flag(false)), FieldWrite::Applied);
        assert!(!exp.current);
        assert_eq!(exp.end_date, "2023-01");
    }

    #[test]
    fn test_unknown_field_is_reported_not_applied() {
        let mut skill = SkillGroup::default();
        assert_eq!(
            skill.set_field("salary", FieldValue::text("lots")),
            FieldWrite::UnknownField
        );
        assert_eq!(skill, SkillGroup { id: skill.id, ..SkillGroup::default() });
    }

    #[test]
    fn test_personal_photo_empty_clears() {
        let mut info = PersonalInfo::default();
        set_personal_field(&mut info, "photo", FieldValue::text("data:image/png;base64,AAAA"));
        assert!(info.photo.is_some());
        set_personal_field(&mut info, "photo", FieldValue::text(""));
        assert!(info.photo.is_none());
    }

    #[test]
    fn test_certification_credential_id_field() {
        let mut cert = CertificationEntry::default();
        cert.set_field("credentialId", FieldValue::text("XYZ"));
        assert_eq!(cert.credential_id, "XYZ");
    }
}
