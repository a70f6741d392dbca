// session.rs — Everything a subcommand needs: the open workspace, its
// config, and the cancellation deadline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use fence_history::{ActionKind, ActionLog};
use fence_workspace::{CancelToken, OpenedWorkspace, Workspace, WorkspaceManager};

use crate::config::FenceConfig;

pub struct Session {
    pub workspace: Arc<Workspace>,
    pub opened: OpenedWorkspace,
    pub config: FenceConfig,
    timeout: Option<Duration>,
}

impl Session {
    pub fn open(
        manager: &WorkspaceManager,
        root: &Path,
        timeout_secs: Option<u64>,
    ) -> anyhow::Result<Self> {
        let opened = manager
            .open(root)
            .with_context(|| format!("cannot open workspace {}", root.display()))?;
        let workspace = manager.current()?;
        let config = FenceConfig::for_workspace(workspace.root())?;

        Ok(Self {
            workspace,
            opened,
            config,
            timeout: timeout_secs.map(Duration::from_secs),
        })
    }

    /// A fresh token carrying the session deadline, if any.
    pub fn cancel_token(&self) -> CancelToken {
        match self.timeout {
            Some(timeout) => CancelToken::new().with_deadline(timeout),
            None => CancelToken::none(),
        }
    }

    /// Append a history entry. Failures are logged, never returned.
    pub fn record(&self, action: ActionKind, request: &str, result: &str) {
        if !self.config.history.enabled {
            return;
        }
        let outcome = ActionLog::open(self.workspace.root())
            .and_then(|mut log| log.record(action, request, result));
        if let Err(e) = outcome {
            tracing::warn!(%action, "failed to record history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn record_writes_history_when_enabled() {
        let dir = tempdir().unwrap();
        let session = Session::open(&WorkspaceManager::new(), dir.path(), None).unwrap();
        session.record(ActionKind::Write, "a.txt", "wrote 1 bytes");

        let entries = ActionLog::read_all(ActionLog::path_for(session.workspace.root())).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].request, "a.txt");
    }

    #[test]
    fn record_is_skipped_when_disabled() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".fence.toml"), "[history]\nenabled = false\n").unwrap();
        let session = Session::open(&WorkspaceManager::new(), dir.path(), None).unwrap();
        session.record(ActionKind::Delete, "a.txt", "deleted");

        assert!(!ActionLog::path_for(session.workspace.root()).exists());
    }

    #[test]
    fn missing_root_fails_to_open() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(Session::open(&WorkspaceManager::new(), &missing, None).is_err());
    }

    #[test]
    fn timeout_sets_a_deadline() {
        let dir = tempdir().unwrap();
        let session = Session::open(&WorkspaceManager::new(), dir.path(), Some(0)).unwrap();
        assert!(session.cancel_token().is_cancelled());

        let session = Session::open(&WorkspaceManager::new(), dir.path(), None).unwrap();
        assert!(!session.cancel_token().is_cancelled());
    }
}
