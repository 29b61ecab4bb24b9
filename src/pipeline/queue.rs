//! Job delivery between the upload boundary and the workers.
//!
//! Delivery is at-least-once: a resume id may reach a worker more than
//! once (explicit retries, a caller enqueueing an id that is already
//! queued). `IngestionJob::run` absorbs redelivery, so the queue makes
//! no dedup effort of its own.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::config::Config;
use crate::error::{IngestError, Result};
use crate::pipeline::IngestionJob;

pub trait JobQueue {
    fn enqueue(&self, resume_id: &str) -> Result<()>;
}

/// Runs the job on the caller's thread at enqueue time. Used by the CLI
/// when no worker pool is running.
pub struct InlineQueue<'a> {
    job: &'a IngestionJob,
}

impl<'a> InlineQueue<'a> {
    pub fn new(job: &'a IngestionJob) -> Self {
        Self { job }
    }
}

impl JobQueue for InlineQueue<'_> {
    fn enqueue(&self, resume_id: &str) -> Result<()> {
        self.job.run(resume_id).map(|_| ())
    }
}

/// Leaves enqueued resumes pending; a later worker run drains them from
/// the store's backlog.
pub struct DeferredQueue;

impl JobQueue for DeferredQueue {
    fn enqueue(&self, _resume_id: &str) -> Result<()> {
        Ok(())
    }
}

enum Message {
    Run(String),
    Shutdown,
}

/// Cloneable sender side of a running [`WorkerPool`].
#[derive(Clone)]
pub struct QueueHandle {
    sender: Sender<Message>,
}

impl JobQueue for QueueHandle {
    fn enqueue(&self, resume_id: &str) -> Result<()> {
        self.sender
            .send(Message::Run(resume_id.to_string()))
            .map_err(|_| IngestError::Persistence("worker pool has shut down".to_string()))
    }
}

/// In-process worker pool: one mpsc channel fanned out to OS threads,
/// each with its own store connection.
pub struct WorkerPool {
    sender: Sender<Message>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start(config: &Config) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Message>();
        let receiver = Arc::new(Mutex::new(receiver));

        let worker_count = config.jobs.workers.max(1);
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let job = IngestionJob::from_config(config)?;
            let receiver = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(format!("ingest-{worker}"))
                .spawn(move || worker_loop(worker, &job, &receiver))?;
            handles.push(handle);
        }

        info!(workers = worker_count, "worker pool started");
        Ok(Self { sender, handles })
    }

    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            sender: self.sender.clone(),
        }
    }

    /// Drain queued jobs and wait for the workers to exit.
    ///
    /// Shutdown is one explicit sentinel per worker rather than channel
    /// disconnect: `handle()` clones may outlive the pool, and a live
    /// clone must not keep the workers waiting forever.
    pub fn join(self) {
        for _ in &self.handles {
            let _ = self.sender.send(Message::Shutdown);
        }
        drop(self.sender);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn worker_loop(worker: usize, job: &IngestionJob, receiver: &Arc<Mutex<Receiver<Message>>>) {
    loop {
        let next = {
            let Ok(guard) = receiver.lock() else { return };
            guard.recv()
        };
        let resume_id = match next {
            Ok(Message::Run(resume_id)) => resume_id,
            // Our shutdown sentinel, or every sender is gone
            Ok(Message::Shutdown) | Err(_) => return,
        };
        match job.run(&resume_id) {
            Ok(status) => info!(worker, resume_id, status = status.as_str(), "job finished"),
            Err(e) => error!(worker, resume_id, error = %e, "job failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::{content_hash, FileStore};
    use crate::store::{CandidateStore, NewResume, ResumeStatus};

    fn setup() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("test.db").to_string_lossy().into_owned();
        config.storage.upload_root = dir.path().join("uploads").to_string_lossy().into_owned();
        config.jobs.workers = 2;
        (dir, config)
    }

    fn upload(config: &Config, content: &[u8], resume_id: &str) {
        let files = FileStore::new(config.upload_root());
        let stored_path = files.save(content, "owner", resume_id, "txt").unwrap();
        let store = CandidateStore::open(&config.database_path()).unwrap();
        store
            .create_resume(&NewResume {
                id: resume_id,
                original_file_name: "resume.txt",
                file_size: content.len() as u64,
                mime_type: "text/plain",
                content_hash: &content_hash(content),
                stored_path: &stored_path,
            })
            .unwrap();
    }

    fn resume_text(name: &str, email: &str, body: &str) -> Vec<u8> {
        format!(
            "{name}\n{email}\nSUMMARY\n{body}\nSKILLS\nRust, SQL\n\
EXPERIENCE\nEngineer, Acme, Jan 2020 - Present\n- Shipped the thing."
        )
        .into_bytes()
    }

    #[test]
    fn pool_drains_enqueued_resumes() {
        let (_dir, config) = setup();
        upload(
            &config,
            &resume_text("Pat Morgan", "a@x.com", "Builds storage engines and query planners all day."),
            "r1",
        );
        upload(
            &config,
            &resume_text("Lee Castillo", "b@y.com", "Runs large fleets of stateless web frontends."),
            "r2",
        );

        let pool = WorkerPool::start(&config).unwrap();
        let handle = pool.handle();
        handle.enqueue("r1").unwrap();
        handle.enqueue("r2").unwrap();
        pool.join();

        let store = CandidateStore::open(&config.database_path()).unwrap();
        for id in ["r1", "r2"] {
            let row = store.get_resume(id).unwrap().unwrap();
            assert_eq!(row.status, ResumeStatus::Completed);
        }
        assert_eq!(store.stats().unwrap().candidates, 2);
    }

    #[test]
    fn concurrent_same_email_yields_one_candidate() {
        let (_dir, config) = setup();
        upload(
            &config,
            &resume_text("Pat Morgan", "same@x.com", "First upload, all about embedded firmware work."),
            "r1",
        );
        upload(
            &config,
            &resume_text("Pat Morgan", "same@x.com", "Second upload, a web services and API focus instead."),
            "r2",
        );

        let pool = WorkerPool::start(&config).unwrap();
        let handle = pool.handle();
        handle.enqueue("r1").unwrap();
        handle.enqueue("r2").unwrap();
        pool.join();

        let store = CandidateStore::open(&config.database_path()).unwrap();
        assert_eq!(store.stats().unwrap().candidates, 1);

        let first = store.get_resume("r1").unwrap().unwrap();
        let second = store.get_resume("r2").unwrap().unwrap();
        assert!(first.status.is_terminal());
        assert!(second.status.is_terminal());
        assert_eq!(first.candidate_id, second.candidate_id);
    }

    #[test]
    fn enqueue_after_shutdown_errors() {
        let (_dir, config) = setup();
        let pool = WorkerPool::start(&config).unwrap();
        let handle = pool.handle();
        pool.join();
        assert!(handle.enqueue("r1").is_err());
    }

    #[test]
    fn inline_queue_processes_synchronously() {
        let (_dir, config) = setup();
        upload(
            &config,
            &resume_text("Sam Rivera", "inline@x.com", "Synchronous path for the single-shot CLI."),
            "r1",
        );

        let job = IngestionJob::from_config(&config).unwrap();
        InlineQueue::new(&job).enqueue("r1").unwrap();
        assert_eq!(
            job.store().get_resume("r1").unwrap().unwrap().status,
            ResumeStatus::Completed
        );
    }
}
