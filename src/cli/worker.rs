//! Worker command implementation

use anyhow::Result;

use crate::config::Config;
use crate::pipeline::queue::{JobQueue, WorkerPool};
use crate::store::CandidateStore;

/// Drain the pending backlog with a worker pool, then exit.
pub fn run(config: &Config) -> Result<()> {
    let store = CandidateStore::open(&config.database_path())?;
    let pending = store.pending_resumes()?;
    drop(store);

    if pending.is_empty() {
        println!("No pending resumes");
        return Ok(());
    }

    println!(
        "Processing {} pending resume(s) with {} worker(s)...",
        pending.len(),
        config.jobs.workers.max(1)
    );

    let pool = WorkerPool::start(config)?;
    let handle = pool.handle();
    for resume_id in &pending {
        handle.enqueue(resume_id)?;
    }
    pool.join();

    let store = CandidateStore::open(&config.database_path())?;
    let stats = store.stats()?;
    println!(
        "Done: {} completed, {} duplicate, {} failed",
        stats.resumes_completed, stats.resumes_duplicate, stats.resumes_failed
    );
    Ok(())
}
