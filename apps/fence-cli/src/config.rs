// config.rs — Optional `.fence.toml` at the workspace root.
//
// Every section and field has a default, so a missing file and an empty file
// behave the same. A file that exists but does not parse is an error.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use fence_context::{ContextLimits, LimitOverrides};
use fence_edits::DuplicatePolicy;

pub const CONFIG_FILE: &str = ".fence.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FenceConfig {
    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Per-preset overrides for the context digest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub chat: LimitOverrides,

    #[serde(default)]
    pub codebase: LimitOverrides,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Record mutations in `.fence-history.jsonl`. Default: true.
    #[serde(default = "default_history_enabled")]
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_history_enabled(),
        }
    }
}

fn default_history_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Which block wins when a response names the same path twice.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

impl FenceConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Load `<root>/.fence.toml`, or defaults if there is none.
    pub fn for_workspace(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn chat_limits(&self) -> ContextLimits {
        ContextLimits::chat().with_overrides(&self.context.chat)
    }

    pub fn codebase_limits(&self) -> ContextLimits {
        ContextLimits::codebase().with_overrides(&self.context.codebase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = FenceConfig::for_workspace(dir.path()).unwrap();
        assert!(config.history.enabled);
        assert_eq!(config.extract.duplicates, DuplicatePolicy::FirstWins);
        assert_eq!(config.chat_limits(), ContextLimits::chat());
        assert_eq!(config.codebase_limits(), ContextLimits::codebase());
    }

    #[test]
    fn overrides_apply_per_preset() {
        let config: FenceConfig = toml::from_str(
            r#"
            [context.chat]
            max_files = 5

            [context.codebase]
            max_chars_per_file = 100
            extensions = ["rs"]

            [history]
            enabled = false

            [extract]
            duplicates = "last_wins"
            "#,
        )
        .unwrap();

        assert_eq!(config.chat_limits().max_files, 5);
        assert_eq!(config.chat_limits().max_chars_per_file, 3_000);
        assert_eq!(config.codebase_limits().max_chars_per_file, 100);
        assert_eq!(config.codebase_limits().extensions, vec!["rs".to_string()]);
        assert!(!config.history.enabled);
        assert_eq!(config.extract.duplicates, DuplicatePolicy::LastWins);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[history\nenabled = ").unwrap();
        assert!(FenceConfig::for_workspace(dir.path()).is_err());
    }
}
