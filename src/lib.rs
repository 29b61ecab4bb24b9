pub mod api;
pub mod authenticity;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod fields;
pub mod files;
pub mod pipeline;
pub mod store;

pub use api::{Dossier, IngestReceipt, StatusReport};
pub use config::Config;
pub use error::{IngestError, Result};
pub use pipeline::IngestionJob;
pub use store::CandidateStore;
