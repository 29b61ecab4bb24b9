use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dossier::cli::{candidate, ingest, stats, status, worker};
use dossier::Config;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "Resume ingestion pipeline: extraction, field parsing, duplicate detection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "dossier.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a resume file
    Ingest {
        /// Path to the resume (pdf, docx, txt)
        file: String,

        /// Owner the upload is filed under
        #[arg(short, long, default_value = "local")]
        owner: String,

        /// Queue only; process later with `worker`
        #[arg(long)]
        queue_only: bool,
    },

    /// Show processing status for a resume
    Status {
        /// Resume ID
        resume_id: String,
    },

    /// Reprocess a failed resume
    Retry {
        /// Resume ID
        resume_id: String,
    },

    /// Process the pending backlog with a worker pool
    Worker,

    /// Candidate records
    Candidate {
        #[command(subcommand)]
        command: CandidateCommands,
    },

    /// Check contact details against existing candidates
    Find {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Show statistics
    Stats,
}

#[derive(Subcommand)]
enum CandidateCommands {
    /// Show one candidate with all extracted detail
    Show {
        /// Candidate ID
        id: String,
    },
    /// Search candidates by name, email, or phone
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    match cli.command {
        Commands::Ingest {
            file,
            owner,
            queue_only,
        } => {
            ingest::run(&config, &file, &owner, queue_only)?;
        }
        Commands::Status { resume_id } => {
            status::run(&config, &resume_id)?;
        }
        Commands::Retry { resume_id } => {
            status::retry(&config, &resume_id)?;
        }
        Commands::Worker => {
            worker::run(&config)?;
        }
        Commands::Candidate { command } => match command {
            CandidateCommands::Show { id } => {
                candidate::show(&config, &id)?;
            }
            CandidateCommands::Search {
                query,
                page,
                per_page,
            } => {
                candidate::search(&config, &query, page, per_page)?;
            }
        },
        Commands::Find { email, phone, name } => {
            candidate::find(&config, email.as_deref(), phone.as_deref(), name.as_deref())?;
        }
        Commands::Stats => {
            stats::run(&config)?;
        }
    }

    Ok(())
}
