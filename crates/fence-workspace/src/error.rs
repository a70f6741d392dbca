// error.rs — Error types for the workspace subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No workspace root has been opened yet (or it was closed).
    #[error("no workspace selected")]
    NoWorkspace,

    /// The caller asked for an empty path.
    #[error("path is required")]
    EmptyPath,

    /// A path traversal attempt was detected (security violation).
    #[error("access denied: '{path}' resolves outside the workspace root")]
    PathTraversal { path: String },

    /// The requested file or directory does not exist.
    #[error("not found: '{path}'")]
    NotFound { path: String },

    /// The workspace root must be a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The caller's cancellation token fired or its deadline passed.
    #[error("operation cancelled")]
    Cancelled,
}

impl WorkspaceError {
    /// Map an I/O error to `NotFound` when the OS says so, `IoError` otherwise.
    pub(crate) fn from_io(path: PathBuf, relative: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            WorkspaceError::NotFound {
                path: relative.to_string(),
            }
        } else {
            WorkspaceError::IoError { path, source }
        }
    }
}
