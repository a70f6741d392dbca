// entry.rs — One recorded action against a workspace.
//
// Entries are observations only: they describe what a caller did to the
// workspace (an edit batch, a single write) and carry the link to the
// previous entry so the log can be checked for tampering.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest request text kept verbatim; longer requests are cut and marked.
pub const MAX_REQUEST_CHARS: usize = 200;

/// What kind of action an entry records.
///
/// `Chat`, `Generate`, `Debug`, `Edit` and `Optimize` name generator
/// requests. They are recorded by whatever sits between the user and the
/// model; nothing in this workspace calls the model, so the `fence` CLI
/// only records the file-level kinds below them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Chat,
    Generate,
    Debug,
    Edit,
    Optimize,
    /// A batch of extracted edits was applied.
    Apply,
    Write,
    Delete,
    Create,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Chat => "chat",
            ActionKind::Generate => "generate",
            ActionKind::Debug => "debug",
            ActionKind::Edit => "edit",
            ActionKind::Optimize => "optimize",
            ActionKind::Apply => "apply",
            ActionKind::Write => "write",
            ActionKind::Delete => "delete",
            ActionKind::Create => "create",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line in `.fence-history.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub entry_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: ActionKind,
    /// The triggering request, truncated to [`MAX_REQUEST_CHARS`].
    pub request: String,
    /// Short human-readable summary of the outcome.
    pub result: String,
    /// Hash of the previous line in the log; `None` for the first entry.
    pub previous_hash: Option<String>,
}

impl HistoryEntry {
    pub fn new(action: ActionKind, request: &str, result: impl Into<String>) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action,
            request: truncate_request(request),
            result: result.into(),
            previous_hash: None,
        }
    }
}

fn truncate_request(request: &str) -> String {
    match request.char_indices().nth(MAX_REQUEST_CHARS) {
        Some((cut, _)) => format!("{}...", &request[..cut]),
        None => request.to_string(),
    }
}
