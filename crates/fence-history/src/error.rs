// error.rs — Error types for the action history.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// Failed to open or create the history file.
    #[error("failed to open history at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write history entry: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// A line could not be serialized or parsed.
    #[error("malformed history entry: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The hash chain is broken: an entry was edited, removed or inserted.
    #[error("history chain broken at line {line}: expected {expected}, got {actual}")]
    IntegrityViolation {
        line: usize,
        expected: String,
        actual: String,
    },
}
