//! Error types for the boundary of the engine.
//!
//! The point calculation itself cannot fail; these errors only come
//! from reading formula revisions and input documents.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PensionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid formula: {0}")]
    InvalidFormula(String),
    #[error("unknown formula revision: {0}")]
    UnknownRevision(String),
}
