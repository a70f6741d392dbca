// ignore.rs — Names the tree scanner never lists or descends into.
//
// The built-in deny-list covers build outputs, dependency caches, VCS
// metadata, editor settings and environment files. Anything starting with a
// dot is hidden and skipped as well. A `.fenceignore` file at the workspace
// root can add patterns; it can never remove the built-in ones.

use std::fs;
use std::path::Path;

/// Built-in deny-list, matched against a single path component.
const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    ".vscode",
    ".idea",
    "__pycache__",
    ".DS_Store",
    "dist",
    "build",
    ".next",
    ".env",
    ".env.local",
];

/// File at the workspace root holding extra ignore patterns.
pub const IGNORE_FILE: &str = ".fenceignore";

#[derive(Debug, Clone)]
pub struct IgnoreList {
    patterns: Vec<String>,
}

impl IgnoreList {
    /// Defaults plus any patterns from `<root>/.fenceignore`.
    ///
    /// An unreadable ignore file is treated as absent.
    pub fn load(root: &Path) -> Self {
        let mut list = Self::defaults();
        let path = root.join(IGNORE_FILE);
        if let Ok(content) = fs::read_to_string(&path) {
            list.extend_from_str(&content);
            tracing::debug!(
                patterns = list.patterns.len(),
                "loaded {}",
                path.display()
            );
        }
        list
    }

    pub fn defaults() -> Self {
        Self {
            patterns: DEFAULT_IGNORES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add patterns in `.fenceignore` format.
    ///
    /// One pattern per line, `#` comments, blank lines ignored.
    /// - `dirname/`: an entry with this exact name (directory style)
    /// - `*.ext`: any entry whose name ends with `.ext`
    /// - `name`: exact name match
    pub fn extend_from_str(&mut self, content: &str) {
        self.patterns.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    /// Whether an entry with this base name is skipped entirely.
    pub fn is_ignored(&self, name: &str) -> bool {
        if name.starts_with('.') {
            return true;
        }
        self.patterns.iter().any(|pattern| {
            if let Some(dir_name) = pattern.strip_suffix('/') {
                name == dir_name
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_deny_list() {
        let list = IgnoreList::defaults();
        for name in ["node_modules", "dist", "build", "__pycache__"] {
            assert!(list.is_ignored(name), "{name} should be ignored");
        }
        assert!(!list.is_ignored("src"));
        assert!(!list.is_ignored("main.rs"));
        // Exact component match only.
        assert!(!list.is_ignored("builder.rs"));
    }

    #[test]
    fn hidden_entries_are_ignored() {
        let list = IgnoreList::defaults();
        assert!(list.is_ignored(".gitignore"));
        assert!(list.is_ignored(".env.production"));
        assert!(list.is_ignored(".fence-history.jsonl"));
    }

    #[test]
    fn ignore_file_extends_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(IGNORE_FILE),
            "# generated\ncoverage/\n*.log\n\nsecrets.json\n",
        )
        .unwrap();

        let list = IgnoreList::load(dir.path());
        assert!(list.is_ignored("coverage"));
        assert!(list.is_ignored("server.log"));
        assert!(list.is_ignored("secrets.json"));
        assert!(list.is_ignored("node_modules"));
        assert!(!list.is_ignored("server.rs"));
    }

    #[test]
    fn missing_ignore_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let list = IgnoreList::load(dir.path());
        assert!(list.is_ignored("node_modules"));
        assert!(!list.is_ignored("coverage"));
    }
}
