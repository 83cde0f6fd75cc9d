use thiserror::Error;

mod entry;
mod flags;
pub mod vocab;

pub use entry::Entry;
pub use flags::{FlagSet, FUZZY};

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Failures that stop an operation before any file is written.
#[derive(Debug, Error)]
pub enum KolocError {
    #[error("PO file not found: {0}")]
    PoFileNotFound(std::path::PathBuf),
    #[error("apply requires at least one JSON file")]
    NoInputFiles,
    #[error("no translations found in input files")]
    NoTranslations,
    #[error("invalid batch {batch}; valid range is 1-{total}")]
    InvalidBatch { batch: usize, total: usize },
    #[error("batch size must be greater than zero")]
    ZeroBatchSize,
    #[error("cannot read import document {path}: {reason}")]
    ImportDocument {
        path: std::path::PathBuf,
        reason: String,
    },
    #[error("validation failed for: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),
}
