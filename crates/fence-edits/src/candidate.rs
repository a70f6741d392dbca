// candidate.rs — An unvalidated (path, content) pair recovered from text.

use serde::{Deserialize, Serialize};

use fence_workspace::lexical_clean;

/// A file edit as the model wrote it. `path` has not been through the
/// workspace resolver yet and may be anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEdit {
    pub path: String,
    pub content: String,
}

impl CandidateEdit {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Key used for de-duplication; see [`normalize_path`].
    pub fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }
}

/// The path `Workspace::resolve` would address, so two spellings of the
/// same target share a key. Paths the resolver would reject keep a
/// separator-normalized form of the raw text.
pub fn normalize_path(path: &str) -> String {
    if let Some(cleaned) = lexical_clean(path) {
        return cleaned;
    }
    let mut normalized = path.trim().replace('\\', "/");
    loop {
        if let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.to_string();
        } else if let Some(rest) = normalized.strip_prefix('/') {
            normalized = rest.to_string();
        } else {
            break;
        }
    }
    normalized
}
