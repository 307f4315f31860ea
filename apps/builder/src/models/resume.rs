use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel end date for an experience entry that is still ongoing.
pub const PRESENT: &str = "Present";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    /// Inline `data:` URL of the uploaded photo.
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    /// `YYYY-MM`, as produced by a month picker.
    pub start_date: String,
    /// `YYYY-MM`, or [`PRESENT`] while `current` is set.
    pub end_date: String,
    pub current: bool,
    /// Free text; one line per bullet.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub graduation_date: String,
    pub gpa: String,
    pub courses: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGroup {
    pub id: Uuid,
    pub category: String,
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub id: Uuid,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub credential_id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub id: Uuid,
    pub name: String,
    pub proficiency: String,
}

/// Aggregate root edited by the form and read by the preview and export paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub languages: Vec<LanguageEntry>,
}

// Defaults carry a fresh id so that imported JSON without ids still satisfies
// per-list identity, and so `add_entry` can start from `Default::default()`.

impl Default for ExperienceEntry {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            current: false,
            description: String::new(),
        }
    }
}

impl Default for EducationEntry {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            degree: String::new(),
            institution: String::new(),
            location: String::new(),
            graduation_date: String::new(),
            gpa: String::new(),
            courses: String::new(),
        }
    }
}

impl Default for SkillGroup {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            category: String::new(),
            items: String::new(),
        }
    }
}

impl Default for ProjectEntry {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            technologies: String::new(),
            url: String::new(),
        }
    }
}

impl Default for CertificationEntry {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            issuer: String::new(),
            date: String::new(),
            credential_id: String::new(),
            url: String::new(),
        }
    }
}

impl Default for LanguageEntry {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            proficiency: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_empty_document() {
        let doc: ResumeDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.personal_info, PersonalInfo::default());
        assert!(doc.experience.is_empty());
        assert!(doc.summary.is_empty());
    }

    #[test]
    fn test_camel_case_fields_deserialize() {
        let json = r#"{
            "personalInfo": { "fullName": "Jane Doe", "email": "jane@example.com" },
            "experience": [{ "title": "Engineer", "startDate": "2021-06", "current": true, "endDate": "Present" }],
            "certifications": [{ "name": "CKA", "credentialId": "ABC-123" }]
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.personal_info.full_name, "Jane Doe");
        assert_eq!(doc.experience[0].start_date, "2021-06");
        assert!(doc.experience[0].current);
        assert_eq!(doc.certifications[0].credential_id, "ABC-123");
    }

    #[test]
    fn test_missing_ids_are_filled_fresh() {
        let json = r#"{ "skills": [{ "items": "Rust" }, { "items": "Go" }] }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_ne!(doc.skills[0].id, doc.skills[1].id);
    }

    #[test]
    fn test_serializes_camel_case() {
        let doc = ResumeDocument::default();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"personalInfo\""));
        assert!(json.contains("\"fullName\""));
    }
}
