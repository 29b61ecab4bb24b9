//! Status and retry command implementations

use anyhow::Result;

use crate::api::Dossier;
use crate::config::Config;
use crate::pipeline::queue::InlineQueue;
use crate::pipeline::IngestionJob;

pub fn run(config: &Config, resume_id: &str) -> Result<()> {
    let dossier = Dossier::open(config)?;
    let report = dossier.status(resume_id)?;

    println!("Resume {}", report.resume_id);
    println!("  file:     {}", report.original_file_name);
    println!("  status:   {}", report.status);
    if let Some(candidate_id) = &report.candidate_id {
        println!("  candidate: {candidate_id}");
    }
    if let Some(score) = report.authenticity_score {
        println!("  authenticity: {score:.1}/100");
    }
    if let Some(error) = &report.processing_error {
        println!("  error:    {error}");
    }
    if let Some(uploaded) = &report.uploaded_at {
        println!("  uploaded: {uploaded}");
    }
    if let Some(processed) = &report.processed_at {
        println!("  processed: {processed}");
    }
    Ok(())
}

/// Reset a failed resume and process it again on the spot.
pub fn retry(config: &Config, resume_id: &str) -> Result<()> {
    let dossier = Dossier::open(config)?;
    let job = IngestionJob::from_config(config)?;

    if dossier.retry(resume_id, &InlineQueue::new(&job))? {
        let report = dossier.status(resume_id)?;
        println!("Reprocessed {resume_id}: {}", report.status);
        if let Some(error) = &report.processing_error {
            println!("  error: {error}");
        }
    } else {
        println!("Resume {resume_id} is not in the failed state; nothing to retry");
    }
    Ok(())
}
