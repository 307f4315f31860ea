//! Live preview: the document as plain text, in export order.

use std::fmt::Write as _;

use crate::layout::engine::languages_line;
use crate::layout::text::{
    experience_date_range, format_date_for_display, join_nonempty, normalize_description,
    or_placeholder, with_suffix,
};
use crate::models::ResumeDocument;

/// Renders the preview. Mirrors the exporter's section order, placeholders and
/// date formatting; empty sections are omitted.
pub fn render_preview(doc: &ResumeDocument) -> String {
    let mut out = String::new();
    let info = &doc.personal_info;

    line(&mut out, or_placeholder(info.full_name.trim(), "Your Name"));
    if !info.title.trim().is_empty() {
        line(&mut out, info.title.trim());
    }
    let contact = join_nonempty(&[&info.email, &info.phone, &info.location], " | ");
    if !contact.is_empty() {
        line(&mut out, &contact);
    }
    if !info.linkedin.trim().is_empty() {
        line(&mut out, &format!("LinkedIn: {}", info.linkedin.trim()));
    }
    if !info.website.trim().is_empty() {
        line(&mut out, &format!("Portfolio: {}", info.website.trim()));
    }
    if info.photo.as_deref().is_some_and(|p| !p.is_empty()) {
        line(&mut out, "[photo]");
    }

    if !doc.summary.trim().is_empty() {
        header(&mut out, "PROFESSIONAL SUMMARY");
        line(&mut out, doc.summary.trim());
    }

    if !doc.experience.is_empty() {
        header(&mut out, "WORK EXPERIENCE");
        for exp in &doc.experience {
            line(
                &mut out,
                &format!("{} ({})", or_placeholder(&exp.title, "Job Title"), experience_date_range(exp)),
            );
            line(&mut out, &with_suffix(or_placeholder(&exp.company, "Company"), &exp.location));
            for bullet in normalize_description(&exp.description) {
                line(&mut out, &format!("  {}", bullet.display()));
            }
        }
    }

    if !doc.education.is_empty() {
        header(&mut out, "EDUCATION");
        for edu in &doc.education {
            let degree = or_placeholder(&edu.degree, "Degree");
            if edu.graduation_date.trim().is_empty() {
                line(&mut out, degree);
            } else {
                line(
                    &mut out,
                    &format!("{degree} ({})", format_date_for_display(&edu.graduation_date)),
                );
            }
            line(&mut out, &with_suffix(or_placeholder(&edu.institution, "Institution"), &edu.location));
            if !edu.gpa.trim().is_empty() {
                line(&mut out, &format!("GPA: {}", edu.gpa.trim()));
            }
            if !edu.courses.trim().is_empty() {
                line(&mut out, &format!("Relevant Coursework: {}", edu.courses.trim()));
            }
        }
    }

    if !doc.projects.is_empty() {
        header(&mut out, "PROJECTS");
        for proj in &doc.projects {
            line(&mut out, or_placeholder(&proj.name, "Project Name"));
            if !proj.description.trim().is_empty() {
                line(&mut out, proj.description.trim());
            }
            if !proj.technologies.trim().is_empty() {
                line(&mut out, &format!("Technologies: {}", proj.technologies.trim()));
            }
            if !proj.url.trim().is_empty() {
                line(&mut out, &format!("View Project: {}", proj.url.trim()));
            }
        }
    }

    if !doc.skills.is_empty() {
        header(&mut out, "SKILLS");
        for group in &doc.skills {
            match group.category.trim() {
                "" => line(&mut out, group.items.trim()),
                category => line(&mut out, &format!("{category}: {}", group.items.trim())),
            }
        }
    }

    if !doc.certifications.is_empty() {
        header(&mut out, "CERTIFICATIONS");
        for cert in &doc.certifications {
            let name = or_placeholder(&cert.name, "Certification");
            if cert.date.trim().is_empty() {
                line(&mut out, name);
            } else {
                line(&mut out, &format!("{name} ({})", format_date_for_display(&cert.date)));
            }
            if !cert.issuer.trim().is_empty() {
                line(&mut out, cert.issuer.trim());
            }
            if !cert.credential_id.trim().is_empty() {
                line(&mut out, &format!("Credential ID: {}", cert.credential_id.trim()));
            }
            if !cert.url.trim().is_empty() {
                line(&mut out, &format!("View Certificate: {}", cert.url.trim()));
            }
        }
    }

    if !doc.languages.is_empty() {
        header(&mut out, "LANGUAGES");
        line(&mut out, &languages_line(&doc.languages));
    }

    out
}

fn line(out: &mut String, text: &str) {
    if !text.is_empty() {
        let _ = writeln!(out, "{text}");
    }
}

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "-".repeat(title.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EducationEntry, ExperienceEntry, LanguageEntry, SkillGroup};

    #[test]
    fn test_empty_document_shows_only_placeholder_name() {
        assert_eq!(render_preview(&ResumeDocument::default()), "Your Name\n");
    }

    #[test]
    fn test_header_block() {
        let mut doc = ResumeDocument::default();
        doc.personal_info.full_name = "Jane Doe".into();
        doc.personal_info.email = "jane@example.com".into();
        doc.personal_info.location = "Berlin".into();
        doc.personal_info.linkedin = "https://linkedin.com/in/jane".into();
        let preview = render_preview(&doc);
        assert_eq!(
            preview,
            "Jane Doe\njane@example.com | Berlin\nLinkedIn: https://linkedin.com/in/jane\n"
        );
    }

    #[test]
    fn test_experience_uses_export_formatting() {
        let mut doc = ResumeDocument::default();
        doc.experience = vec![ExperienceEntry {
            title: "Engineer".into(),
            company: "Acme".into(),
            start_date: "2021-06".into(),
            current: true,
            end_date: "Present".into(),
            description: "- Shipped v2\n• Led team".into(),
            ..ExperienceEntry::default()
        }];
        let preview = render_preview(&doc);
        assert!(preview.contains("WORK EXPERIENCE\n---------------\n"));
        assert!(preview.contains("Engineer (Jun 2021 - Present)\nAcme\n  • Shipped v2\n  • Led team\n"));
    }

    #[test]
    fn test_sections_in_export_order() {
        let mut doc = ResumeDocument::default();
        doc.languages = vec![LanguageEntry {
            name: "English".into(),
            proficiency: "Native".into(),
            ..LanguageEntry::default()
        }];
        doc.skills = vec![SkillGroup {
            category: "Languages".into(),
            items: "Rust, Go".into(),
            ..SkillGroup::default()
        }];
        doc.education = vec![EducationEntry::default()];
        doc.summary = "Engineer.".into();

        let preview = render_preview(&doc);
        let pos = |needle: &str| preview.find(needle).unwrap();
        assert!(pos("PROFESSIONAL SUMMARY") < pos("EDUCATION"));
        assert!(pos("EDUCATION") < pos("SKILLS"));
        assert!(pos("SKILLS") < pos("\nLANGUAGES\n"));
        assert!(preview.contains("Degree\nInstitution\n"));
        assert!(preview.contains("Languages: Rust, Go\n"));
        assert!(preview.ends_with("English (Native)\n"));
        assert!(!preview.contains("PROJECTS"));
    }
}
