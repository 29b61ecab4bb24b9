//! Ingest command implementation

use std::path::Path;

use anyhow::Result;

use crate::api::Dossier;
use crate::config::Config;
use crate::pipeline::queue::{DeferredQueue, InlineQueue};
use crate::pipeline::IngestionJob;

pub fn run(config: &Config, file: &str, owner: &str, queue_only: bool) -> Result<()> {
    let content = std::fs::read(file)?;
    let file_name = Path::new(file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file);

    let dossier = Dossier::open(config)?;
    let receipt = if queue_only {
        dossier.ingest(&content, file_name, owner, &DeferredQueue)?
    } else {
        let job = IngestionJob::from_config(config)?;
        dossier.ingest(&content, file_name, owner, &InlineQueue::new(&job))?
    };

    if receipt.status == "duplicate" {
        println!("Duplicate upload: identical content already ingested");
        println!("  existing resume: {}", receipt.resume_id);
        return Ok(());
    }

    println!("Accepted {file_name} as resume {}", receipt.resume_id);

    if queue_only {
        println!("Queued for processing; run `dossier worker` to process");
        return Ok(());
    }

    // Processed inline above; show where it landed
    let report = dossier.status(&receipt.resume_id)?;
    println!("  status: {}", report.status);
    if let Some(score) = report.authenticity_score {
        println!("  authenticity: {score:.1}/100");
    }
    if let Some(candidate_id) = &report.candidate_id {
        println!("  candidate: {candidate_id}");
    }
    if let Some(error) = &report.processing_error {
        println!("  error: {error}");
    }
    Ok(())
}
