//! Form State Store: the single mutable `ResumeDocument` of a session.
//!
//! Every operation is synchronous and total. Unknown ids and fields are logged and
//! reported to the caller as "not applied"; nothing here returns an error.

pub mod completeness;
pub mod entries;
pub mod photo;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ResumeDocument, PRESENT};

pub use entries::{FieldValue, FieldWrite, SectionEntry};

/// One top-level resume category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
}

impl Section {
    /// The repeatable sections, in export order.
    pub const LISTS: [Section; 6] = [
        Section::Experience,
        Section::Education,
        Section::Projects,
        Section::Skills,
        Section::Certifications,
        Section::Languages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Personal => "personal",
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Languages => "languages",
        }
    }

    pub fn is_list(&self) -> bool {
        !matches!(self, Section::Personal | Section::Summary)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal" | "personalinfo" | "personal_info" => Ok(Section::Personal),
            "summary" => Ok(Section::Summary),
            "experience" | "work" => Ok(Section::Experience),
            "education" => Ok(Section::Education),
            "skills" | "skill" => Ok(Section::Skills),
            "projects" | "project" => Ok(Section::Projects),
            "certifications" | "certification" | "certs" => Ok(Section::Certifications),
            "languages" | "language" => Ok(Section::Languages),
            other => Err(AppError::UnknownSection(other.to_string())),
        }
    }
}

/// Owns the session's document. Exactly one writer, no sharing.
#[derive(Debug, Default)]
pub struct FormStore {
    document: ResumeDocument,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts an imported document, re-assigning any duplicate entry ids so that
    /// every id is unique within its list.
    pub fn from_document(mut document: ResumeDocument) -> Self {
        let reassigned = dedup_ids(&mut document.experience)
            + dedup_ids(&mut document.education)
            + dedup_ids(&mut document.skills)
            + dedup_ids(&mut document.projects)
            + dedup_ids(&mut document.certifications)
            + dedup_ids(&mut document.languages);
        if reassigned > 0 {
            warn!(reassigned, "Imported document had duplicate entry ids");
        }

        let mut realigned = 0;
        for exp in document.experience.iter_mut().filter(|e| e.current) {
            if exp.end_date != PRESENT {
                exp.end_date = PRESENT.to_string();
                realigned += 1;
            }
        }
        if realigned > 0 {
            warn!(realigned, "Imported current positions had an end date; set to Present");
        }

        Self { document }
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    /// Writes one field. `id` is ignored for `Personal` and `Summary` and required
    /// for list sections.
    pub fn update_field(
        &mut self,
        section: Section,
        id: Option<Uuid>,
        field: &str,
        value: FieldValue,
    ) -> FieldWrite {
        let outcome = match section {
            Section::Personal => {
                entries::set_personal_field(&mut self.document.personal_info, field, value)
            }
            Section::Summary if entries::normalize(field) == "summary" => {
                self.document.summary = match value {
                    FieldValue::Text(s) => s,
                    FieldValue::Flag(b) => b.to_string(),
                };
                FieldWrite::Applied
            }
            Section::Summary => FieldWrite::UnknownField,
            _ => {
                let Some(id) = id else {
                    warn!(%section, field, "Field update on a list section without an entry id");
                    return FieldWrite::UnknownField;
                };
                match section {
                    Section::Experience => update_in(&mut self.document.experience, id, field, value),
                    Section::Education => update_in(&mut self.document.education, id, field, value),
                    Section::Skills => update_in(&mut self.document.skills, id, field, value),
                    Section::Projects => update_in(&mut self.document.projects, id, field, value),
                    Section::Certifications => {
                        update_in(&mut self.document.certifications, id, field, value)
                    }
                    Section::Languages => update_in(&mut self.document.languages, id, field, value),
                    Section::Personal | Section::Summary => FieldWrite::UnknownField,
                }
            }
        };

        match outcome {
            FieldWrite::Applied => debug!(%section, field, "Field updated"),
            FieldWrite::Locked => debug!(%section, field, "Field is locked"),
            FieldWrite::UnknownField => warn!(%section, field, ?id, "Unknown field or entry"),
        }
        outcome
    }

    /// Appends an entry with empty defaults and a fresh id. Returns `None` for
    /// sections that are not lists.
    pub fn add_entry(&mut self, section: Section) -> Option<Uuid> {
        let id = match section {
            Section::Experience => add_to(&mut self.document.experience),
            Section::Education => add_to(&mut self.document.education),
            Section::Skills => add_to(&mut self.document.skills),
            Section::Projects => add_to(&mut self.document.projects),
            Section::Certifications => add_to(&mut self.document.certifications),
            Section::Languages => add_to(&mut self.document.languages),
            Section::Personal | Section::Summary => return None,
        };
        debug!(%section, %id, "Entry added");
        Some(id)
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    pub fn remove_entry(&mut self, section: Section, id: Uuid) -> bool {
        let removed = match section {
            Section::Experience => remove_from(&mut self.document.experience, id),
            Section::Education => remove_from(&mut self.document.education, id),
            Section::Skills => remove_from(&mut self.document.skills, id),
            Section::Projects => remove_from(&mut self.document.projects, id),
            Section::Certifications => remove_from(&mut self.document.certifications, id),
            Section::Languages => remove_from(&mut self.document.languages, id),
            Section::Personal | Section::Summary => false,
        };
        if removed {
            debug!(%section, %id, "Entry removed");
        } else {
            warn!(%section, %id, "No entry to remove");
        }
        removed
    }

    /// Ids of the entries in a list section, in display order.
    pub fn entry_ids(&self, section: Section) -> Vec<Uuid> {
        fn ids<E: SectionEntry>(list: &[E]) -> Vec<Uuid> {
            list.iter().map(SectionEntry::id).collect()
        }
        let doc = &self.document;
        match section {
            Section::Experience => ids(&doc.experience),
            Section::Education => ids(&doc.education),
            Section::Skills => ids(&doc.skills),
            Section::Projects => ids(&doc.projects),
            Section::Certifications => ids(&doc.certifications),
            Section::Languages => ids(&doc.languages),
            Section::Personal | Section::Summary => Vec::new(),
        }
    }
}

fn fresh_id<E: SectionEntry>(list: &[E]) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if list.iter().all(|e| e.id() != id) {
            return id;
        }
    }
}

fn add_to<E: SectionEntry>(list: &mut Vec<E>) -> Uuid {
    let id = fresh_id(list);
    let mut entry = E::default();
    entry.set_id(id);
    list.push(entry);
    id
}

fn remove_from<E: SectionEntry>(list: &mut Vec<E>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|e| e.id() != id);
    list.len() != before
}

fn update_in<E: SectionEntry>(list: &mut [E], id: Uuid, field: &str, value: FieldValue) -> FieldWrite {
    match list.iter_mut().find(|e| e.id() == id) {
        Some(entry) => entry.set_field(field, value),
        None => FieldWrite::UnknownField,
    }
}

fn dedup_ids<E: SectionEntry>(list: &mut [E]) -> usize {
    let mut seen = HashSet::new();
    let mut reassigned = 0;
    for i in 0..list.len() {
        if !seen.insert(list[i].id()) {
            let id = loop {
                let candidate = Uuid::new_v4();
                if !seen.contains(&candidate) && list.iter().all(|e| e.id() != candidate) {
                    break candidate;
                }
            };
            list[i].set_id(id);
            seen.insert(id);
            reassigned += 1;
        }
    }
    reassigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SkillGroup, PRESENT};

    #[test]
    fn test_add_entry_ids_unique_within_section() {
        let mut store = FormStore::new();
        let ids: Vec<Uuid> = (0..50)
            .map(|_| store.add_entry(Section::Experience).unwrap())
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(store.entry_ids(Section::Experience), ids);
    }

    #[test]
    fn test_add_entry_on_non_list_section_is_noop() {
        let mut store = FormStore::new();
        assert!(store.add_entry(Section::Personal).is_none());
        assert!(store.add_entry(Section::Summary).is_none());
    }

    #[test]
    fn test_add_entry_uses_empty_defaults() {
        let mut store = FormStore::new();
        let id = store.add_entry(Section::Experience).unwrap();
        let exp = &store.document().experience[0];
        assert_eq!(exp.id, id);
        assert!(exp.title.is_empty());
        assert!(!exp.current);
        assert!(exp.end_date.is_empty());
    }

    #[test]
    fn test_update_field_targets_one_entry() {
        let mut store = FormStore::new();
        let a = store.add_entry(Section::Skills).unwrap();
        let b = store.add_entry(Section::Skills).unwrap();
        let outcome = store.update_field(Section::Skills, Some(b), "items", FieldValue::text("Rust, Go"));
        assert_eq!(outcome, FieldWrite::Applied);
        let skills = &store.document().skills;
        assert_eq!(skills.iter().find(|s| s.id == a).unwrap().items, "");
        assert_eq!(skills.iter().find(|s| s.id == b).unwrap().items, "Rust, Go");
    }

    #[test]
    fn test_update_field_unknown_id_is_noop() {
        let mut store = FormStore::new();
        store.add_entry(Section::Languages);
        let before = store.document().clone();
        let outcome = store.update_field(
            Section::Languages,
            Some(Uuid::new_v4()),
            "name",
            FieldValue::text("French"),
        );
        assert_eq!(outcome, FieldWrite::UnknownField);
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_update_list_field_without_id_is_noop() {
        let mut store = FormStore::new();
        store.add_entry(Section::Projects);
        let outcome = store.update_field(Section::Projects, None, "name", FieldValue::text("X"));
        assert_eq!(outcome, FieldWrite::UnknownField);
    }

    #[test]
    fn test_personal_and_summary_updates() {
        let mut store = FormStore::new();
        store.update_field(Section::Personal, None, "fullName", FieldValue::text("Jane Doe"));
        store.update_field(Section::Summary, None, "summary", FieldValue::text("Builder."));
        assert_eq!(store.document().personal_info.full_name, "Jane Doe");
        assert_eq!(store.document().summary, "Builder.");
    }

    #[test]
    fn test_current_flag_keeps_end_date_consistent() {
        let mut store = FormStore::new();
        let id = store.add_entry(Section::Experience).unwrap();
        store.update_field(Section::Experience, Some(id), "current", FieldValue::Flag(true));
        let outcome =
            store.update_field(Section::Experience, Some(id), "endDate", FieldValue::text("2022-01"));
        assert_eq!(outcome, FieldWrite::Locked);
        let exp = &store.document().experience[0];
        assert!(exp.current);
        assert_eq!(exp.end_date, PRESENT);
    }

    #[test]
    fn test_remove_entry() {
        let mut store = FormStore::new();
        let a = store.add_entry(Section::Certifications).unwrap();
        let b = store.add_entry(Section::Certifications).unwrap();
        assert!(store.remove_entry(Section::Certifications, a));
        assert!(!store.remove_entry(Section::Certifications, a));
        assert_eq!(store.entry_ids(Section::Certifications), vec![b]);
    }

    #[test]
    fn test_from_document_reassigns_duplicate_ids() {
        let dup = Uuid::new_v4();
        let mut doc = ResumeDocument::default();
        doc.skills = vec![
            SkillGroup { id: dup, ..SkillGroup::default() },
            SkillGroup { id: dup, ..SkillGroup::default() },
            SkillGroup { id: dup, ..SkillGroup::default() },
        ];
        let store = FormStore::from_document(doc);
        let ids = store.entry_ids(Section::Skills);
        assert_eq!(ids[0], dup);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_from_document_aligns_current_end_date() {
        let doc: ResumeDocument = serde_json::from_str(
            r#"{"experience":[{"current":true,"endDate":"2022-01"},{"endDate":"2021-03"}]}"#,
        )
        .unwrap();
        let store = FormStore::from_document(doc);
        let experience = &store.document().experience;
        assert!(experience[0].current);
        assert_eq!(experience[0].end_date, PRESENT);
        assert_eq!(experience[1].end_date, "2021-03");
    }

    #[test]
    fn test_summary_rejects_other_field_names() {
        let mut store = FormStore::new();
        store.update_field(Section::Summary, None, "summary", FieldValue::text("Builder."));
        assert_eq!(
            store.update_field(Section::Summary, None, "fullName", FieldValue::text("Oops")),
            FieldWrite::UnknownField
        );
        assert_eq!(store.document().summary, "Builder.");
    }

    #[test]
    fn test_section_parsing() {
        assert_eq!("Experience".parse::<Section>().unwrap(), Section::Experience);
        assert_eq!("certs".parse::<Section>().unwrap(), Section::Certifications);
        assert!("hobbies".parse::<Section>().is_err());
    }
}
