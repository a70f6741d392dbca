// limits.rs — Selection and truncation bounds for a context digest.

use serde::{Deserialize, Serialize};

use fence_workspace::TreeEntry;

/// Source and text extensions eligible for the chat digest.
const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "java", "cpp", "c", "h", "rs", "go", "html", "css", "json",
    "toml", "md", "yml", "yaml",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLimits {
    /// At most this many files are read, earliest-discovered first.
    pub max_files: usize,
    /// Files must be strictly smaller than this many bytes.
    pub max_file_bytes: u64,
    /// Each file's content is cut to this many characters.
    pub max_chars_per_file: usize,
    /// Allowed extensions, without the dot. Case-sensitive.
    pub extensions: Vec<String>,
}

impl ContextLimits {
    /// Bounds for the context attached to every chat request.
    pub fn chat() -> Self {
        Self {
            max_files: 20,
            max_file_bytes: 30_000,
            max_chars_per_file: 3_000,
            extensions: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Wider bounds for whole-codebase requests. Also takes plain `.txt`.
    pub fn codebase() -> Self {
        let mut extensions: Vec<String> = SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        extensions.push("txt".to_string());
        Self {
            max_files: 50,
            max_file_bytes: 50_000,
            max_chars_per_file: 12_000,
            extensions,
        }
    }

    /// Whether a scanned file passes the extension and size filters.
    pub fn accepts(&self, entry: &TreeEntry) -> bool {
        if !entry.is_file() {
            return false;
        }
        let extension_ok = entry
            .extension
            .as_deref()
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext));
        let size_ok = entry.size.is_some_and(|size| size < self.max_file_bytes);
        extension_ok && size_ok
    }

    pub fn with_overrides(mut self, overrides: &LimitOverrides) -> Self {
        if let Some(max_files) = overrides.max_files {
            self.max_files = max_files;
        }
        if let Some(max_file_bytes) = overrides.max_file_bytes {
            self.max_file_bytes = max_file_bytes;
        }
        if let Some(max_chars) = overrides.max_chars_per_file {
            self.max_chars_per_file = max_chars;
        }
        if let Some(extensions) = &overrides.extensions {
            self.extensions = extensions.clone();
        }
        self
    }
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self::chat()
    }
}

/// Partial limits read from config; unset fields keep the preset's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitOverrides {
    pub max_files: Option<usize>,
    pub max_file_bytes: Option<u64>,
    pub max_chars_per_file: Option<usize>,
    pub extensions: Option<Vec<String>>,
}
