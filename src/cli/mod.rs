//! CLI command implementations

pub mod candidate;
pub mod ingest;
pub mod stats;
pub mod status;
pub mod worker;
