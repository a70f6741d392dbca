// manager.rs — The process-wide "currently open workspace" slot.
//
// Library code should pass `Workspace` handles around. The manager exists
// for surfaces that keep one open workspace between requests: `open` is a
// single-writer operation under the write lock, and every other operation
// fails with `NoWorkspace` until a root has been opened.

use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::WorkspaceError;
use crate::workspace::{OpenedWorkspace, Workspace};

#[derive(Debug, Default)]
pub struct WorkspaceManager {
    current: RwLock<Option<Arc<Workspace>>>,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path`, replacing any previously open workspace.
    ///
    /// Concurrent opens are serialized; the last one to take the lock wins.
    /// On failure the previous workspace stays open.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<OpenedWorkspace, WorkspaceError> {
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        let workspace = Workspace::open(path)?;
        let opened = workspace.describe();
        *slot = Some(Arc::new(workspace));
        Ok(opened)
    }

    /// Close the current workspace. Returns whether one was open.
    pub fn close(&self) -> bool {
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        let was_open = slot.take().is_some();
        if was_open {
            tracing::info!("workspace closed");
        }
        was_open
    }

    /// The open workspace, or `NoWorkspace`.
    pub fn current(&self) -> Result<Arc<Workspace>, WorkspaceError> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(WorkspaceError::NoWorkspace)
    }
}
