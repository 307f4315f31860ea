use serde::{Deserialize, Serialize};

use crate::models::ResumeDocument;
use crate::store::Section;

/// Entry count for one list section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionCount {
    pub section: Section,
    pub entry_count: usize,
}

/// What is filled in and what is missing, for warnings before export.
///
/// Required fields are marked on the form but never enforced: export always
/// proceeds and only logs the gaps.
#[derive(Debug, Clone, Serialize)]
pub struct CompletenessReport {
    pub missing_required: Vec<&'static str>,
    pub sections: Vec<SectionCount>,
    pub empty_sections: Vec<Section>,
    pub has_summary: bool,
    pub has_photo: bool,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

const REQUIRED_FIELDS: &[&str] = &["fullName", "email"];

pub fn compute_completeness_report(doc: &ResumeDocument) -> CompletenessReport {
    let info = &doc.personal_info;
    let missing_required = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| match *field {
            "fullName" => info.full_name.trim().is_empty(),
            "email" => info.email.trim().is_empty(),
            _ => false,
        })
        .collect();

    let sections: Vec<SectionCount> = Section::LISTS
        .iter()
        .map(|&section| SectionCount {
            section,
            entry_count: match section {
                Section::Experience => doc.experience.len(),
                Section::Education => doc.education.len(),
                Section::Projects => doc.projects.len(),
                Section::Skills => doc.skills.len(),
                Section::Certifications => doc.certifications.len(),
                Section::Languages => doc.languages.len(),
                Section::Personal | Section::Summary => 0,
            },
        })
        .collect();

    let empty_sections = sections
        .iter()
        .filter(|s| s.entry_count == 0)
        .map(|s| s.section)
        .collect();

    CompletenessReport {
        missing_required,
        sections,
        empty_sections,
        has_summary: !doc.summary.trim().is_empty(),
        has_photo: info.photo.is_some(),
    }
}
