//! Stats command implementation

use anyhow::Result;

use crate::api::Dossier;
use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    let dossier = Dossier::open(config)?;
    let stats = dossier.stats()?;

    println!("Resumes:");
    println!("  pending:    {}", stats.resumes_pending);
    println!("  processing: {}", stats.resumes_processing);
    println!("  completed:  {}", stats.resumes_completed);
    println!("  duplicate:  {}", stats.resumes_duplicate);
    println!("  failed:     {}", stats.resumes_failed);
    println!("Candidates:   {}", stats.candidates);
    println!("Duplicate matches recorded: {}", stats.duplicate_matches);
    Ok(())
}
