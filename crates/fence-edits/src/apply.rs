// apply.rs — Write candidate edits into a workspace, one at a time.
//
// Not transactional. Each edit is resolved and written on its own, in input
// order, and a failure is recorded against that edit before moving on. The
// result list always has one entry per input edit, in the same order.

use serde::{Deserialize, Serialize};

use fence_workspace::{CancelToken, Workspace};

use crate::candidate::CandidateEdit;

/// Outcome for one edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    /// The path as given in the edit.
    pub path: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyResult {
    fn ok(path: &str) -> Self {
        Self {
            path: path.to_string(),
            success: true,
            error: None,
        }
    }

    fn failed(path: &str, error: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Apply `edits` to `workspace`, replacing file contents.
///
/// Once `cancel` fires, the remaining edits are reported as failed with
/// `"cancelled"` without being attempted.
pub fn apply_edits(
    workspace: &Workspace,
    edits: &[CandidateEdit],
    cancel: &CancelToken,
) -> Vec<ApplyResult> {
    tracing::info!(count = edits.len(), "applying edits");

    edits
        .iter()
        .map(|edit| {
            if cancel.is_cancelled() {
                return ApplyResult::failed(&edit.path, "cancelled");
            }
            match workspace.write_file(&edit.path, &edit.content) {
                Ok(_) => {
                    tracing::info!(path = %edit.path, "edit applied");
                    ApplyResult::ok(&edit.path)
                }
                Err(e) => {
                    tracing::warn!(path = %edit.path, "edit not applied: {}", e);
                    ApplyResult::failed(&edit.path, e.to_string())
                }
            }
        })
        .collect()
}
