//! Structured-field extraction from resume text
//!
//! `extract_all` turns noisy extracted text into a [`FieldMap`], the full
//! structured record for a resume. Every sub-extractor degrades to
//! `None`/empty on its own; nothing in this module returns an error.
//! Pattern tables and lexicons live in [`lexicon`] so accuracy work does
//! not touch logic.

pub mod certifications;
pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;
pub mod lexicon;
pub mod sections;
pub mod skills;

use serde::{Deserialize, Serialize};

/// Structured output of field extraction. "Missing" is an explicit
/// `None`/empty value, never an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub languages: Vec<LanguageEntry>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    Doctorate,
    Master,
    Bachelor,
    Associate,
    Other,
}

impl DegreeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeLevel::Doctorate => "doctorate",
            DegreeLevel::Master => "master",
            DegreeLevel::Bachelor => "bachelor",
            DegreeLevel::Associate => "associate",
            DegreeLevel::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "doctorate" => DegreeLevel::Doctorate,
            "master" => DegreeLevel::Master,
            "bachelor" => DegreeLevel::Bachelor,
            "associate" => DegreeLevel::Associate,
            _ => DegreeLevel::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree_level: Option<DegreeLevel>,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// Preserves the original scale, e.g. "3.8" or "8.5/10".
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperienceEntry {
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_date: String,
    /// None iff `is_current`.
    pub end_date: Option<String>,
    pub is_current: bool,
    pub duration_months: Option<u32>,
    pub responsibilities: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Native,
    Fluent,
    Professional,
    Working,
    Intermediate,
    Basic,
    Elementary,
    Beginner,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub proficiency: Proficiency,
}

/// Extract the full field map from normalized resume text.
///
/// Deterministic: the same input always yields the same output. Inputs
/// under 50 characters of content return the zero-valued map.
pub fn extract_all(text: &str) -> FieldMap {
    if text.trim().len() < 50 {
        return FieldMap::default();
    }

    let lines: Vec<&str> = text.lines().collect();

    FieldMap {
        name: contact::extract_name(&lines),
        email: contact::extract_email(text),
        phone: contact::extract_phone(text),
        linkedin_url: contact::extract_linkedin(text),
        github_url: contact::extract_github(text),
        portfolio_url: contact::extract_portfolio(text),
        location: contact::extract_location(&lines),
        summary: sections::extract_summary(&lines),
        skills: skills::extract_skills(text),
        education: education::extract_education(&lines),
        work_experience: experience::extract_experience(&lines),
        certifications: certifications::extract_certifications(text, &lines),
        projects: sections::extract_projects(&lines),
        languages: sections::extract_languages(&lines),
        achievements: sections::extract_achievements(&lines),
    }
}
