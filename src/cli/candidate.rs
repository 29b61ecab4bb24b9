//! Candidate inspection commands: show, search, find

use anyhow::Result;

use crate::api::Dossier;
use crate::config::Config;

pub fn show(config: &Config, candidate_id: &str) -> Result<()> {
    let dossier = Dossier::open(config)?;
    let Some(record) = dossier.get_candidate(candidate_id)? else {
        println!("No candidate with id {candidate_id}");
        return Ok(());
    };

    let c = &record.candidate;
    println!("{} ({})", c.full_name.as_deref().unwrap_or("(no name)"), c.id);
    if let Some(email) = &c.email {
        println!("  email:    {email}");
    }
    if let Some(phone) = &c.phone {
        println!("  phone:    {phone}");
    }
    if let Some(location) = &c.location {
        println!("  location: {location}");
    }
    for (label, url) in [
        ("linkedin", &c.linkedin_url),
        ("github", &c.github_url),
        ("portfolio", &c.portfolio_url),
    ] {
        if let Some(url) = url {
            println!("  {label}: {url}");
        }
    }
    if let Some(summary) = &c.summary {
        println!("\n  {summary}");
    }

    if !record.skills.is_empty() {
        println!("\nSkills: {}", record.skills.join(", "));
    }

    if !record.work_experience.is_empty() {
        println!("\nExperience:");
        for entry in &record.work_experience {
            let title = entry.title.as_deref().unwrap_or("(unknown role)");
            let company = entry.company.as_deref().unwrap_or("(unknown company)");
            let end = if entry.is_current {
                "present".to_string()
            } else {
                entry.end_date.clone().unwrap_or_else(|| "?".to_string())
            };
            println!("  {title} at {company} ({} - {end})", entry.start_date);
            for bullet in &entry.responsibilities {
                println!("    - {bullet}");
            }
        }
    }

    if !record.education.is_empty() {
        println!("\nEducation:");
        for entry in &record.education {
            let institution = entry.institution.as_deref().unwrap_or("(unknown)");
            let years = match (entry.start_year, entry.end_year) {
                (Some(s), Some(e)) => format!(" ({s}-{e})"),
                (None, Some(e)) => format!(" ({e})"),
                _ => String::new(),
            };
            println!("  {} - {institution}{years}", entry.degree);
        }
    }

    if !record.certifications.is_empty() {
        println!("\nCertifications:");
        for entry in &record.certifications {
            println!("  {}", entry.name);
        }
    }

    if !record.languages.is_empty() {
        let names: Vec<&str> = record.languages.iter().map(|l| l.name.as_str()).collect();
        println!("\nLanguages: {}", names.join(", "));
    }

    Ok(())
}

pub fn search(config: &Config, query: &str, page: u32, per_page: u32) -> Result<()> {
    let dossier = Dossier::open(config)?;
    let (hits, total) = dossier.search(query, page, per_page)?;

    if hits.is_empty() {
        println!("No candidates match '{query}'");
        return Ok(());
    }

    println!("{total} candidate(s) match '{query}' (page {page}):\n");
    for hit in hits {
        let years = hit.total_experience_months as f64 / 12.0;
        println!(
            "  {}  {}  {}  [{} skills, {:.1}y experience]",
            &hit.id[..8.min(hit.id.len())],
            hit.full_name.as_deref().unwrap_or("(no name)"),
            hit.email.as_deref().unwrap_or("-"),
            hit.skill_count,
            years,
        );
    }
    Ok(())
}

/// Duplicate check against the existing candidate pool, no upload needed.
pub fn find(
    config: &Config,
    email: Option<&str>,
    phone: Option<&str>,
    name: Option<&str>,
) -> Result<()> {
    let dossier = Dossier::open(config)?;
    let decision = dossier.find_candidate(email, phone, name)?;

    println!("{}", decision.recommendation);
    for m in &decision.matches {
        let target = m
            .candidate_id
            .as_deref()
            .or(m.resume_id.as_deref())
            .unwrap_or("-");
        println!(
            "  {} match ({:.0}% confidence): {target}",
            m.match_type.as_str(),
            m.confidence * 100.0
        );
    }
    Ok(())
}
