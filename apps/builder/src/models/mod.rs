pub mod resume;
pub mod style;

pub use resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, LanguageEntry, PersonalInfo,
    ProjectEntry, ResumeDocument, SkillGroup, PRESENT,
};
pub use style::{AccentColor, FontFamily, Rgb, StyleConfig, COLOR_PRESETS};
