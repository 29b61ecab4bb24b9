//! Upload handling: validation and on-disk storage

mod store;
mod validator;

pub use store::FileStore;
pub use validator::{content_hash, extension_of, mime_type, sanitize_filename, FileValidator};
