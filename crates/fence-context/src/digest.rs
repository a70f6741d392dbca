// digest.rs — Build and render the context digest.
//
// Selection is decided entirely from the scan (depth-first order, filters,
// then the file cap) before any file is read, so the chosen set and its order
// don't depend on how reads go. Reads go through the workspace resolver,
// addressed by the listed path as-is.
// A file that can't be read is recorded and left out; it never fails the
// digest.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use fence_workspace::{CancelToken, SkippedEntry, Workspace, WorkspaceError};

use crate::limits::ContextLimits;

/// One file included in the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub content: String,
    /// Whether `content` was cut to the per-file character cap.
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDigest {
    pub files: Vec<ContextFile>,
    /// Eligible files found by the scan, before the file cap.
    pub total_files: usize,
    /// Selected files that couldn't be read.
    pub skipped: Vec<SkippedEntry>,
}

impl ContextDigest {
    /// Render as the markdown block that goes into the prompt.
    pub fn render(&self) -> String {
        let mut out = String::from("## Project Structure\n");
        let _ = write!(out, "Total files: {}\n\n", self.total_files);
        for file in &self.files {
            let _ = write!(
                out,
                "### {}\n```{}\n{}\n```\n\n",
                file.path,
                file.extension.as_deref().unwrap_or_default(),
                file.content
            );
        }
        out
    }
}

/// Build a digest of `workspace` within `limits`.
///
/// Fails only when the workspace root can't be scanned or the token fires.
pub fn build_context(
    workspace: &Workspace,
    limits: &ContextLimits,
    cancel: &CancelToken,
) -> Result<ContextDigest, WorkspaceError> {
    let report = workspace.list_files(cancel)?;

    let eligible: Vec<_> = report
        .files()
        .into_iter()
        .filter(|entry| limits.accepts(entry))
        .collect();
    let total_files = eligible.len();

    let mut digest = ContextDigest {
        files: Vec::with_capacity(total_files.min(limits.max_files)),
        total_files,
        skipped: Vec::new(),
    };

    for entry in eligible.into_iter().take(limits.max_files) {
        cancel.check()?;
        match workspace.read_listed(&entry.path) {
            Ok(content) => {
                let (content, truncated) = truncate_chars(content, limits.max_chars_per_file);
                digest.files.push(ContextFile {
                    path: entry.path.clone(),
                    extension: entry.extension.clone(),
                    content,
                    truncated,
                });
            }
            Err(e) => {
                tracing::debug!(path = %entry.path, "could not read for context: {}", e);
                digest.skipped.push(SkippedEntry {
                    path: entry.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        included = digest.files.len(),
        total = digest.total_files,
        skipped = digest.skipped.len(),
        "built context digest"
    );
    Ok(digest)
}

/// Keep at most `max_chars` characters, cutting on a char boundary.
fn truncate_chars(content: String, max_chars: usize) -> (String, bool) {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut content = content;
            content.truncate(byte_idx);
            (content, true)
        }
        None => (content, false),
    }
}
