// log.rs — Append-only JSONL action history stored at the workspace root.
//
// One JSON object per line. Each entry's `previous_hash` is the SHA-256 of
// the raw previous line, so editing, dropping or inserting a line breaks the
// chain and `verify_chain` reports where.
//
// The file name starts with a dot, so the tree scanner never lists it and it
// never ends up in a context digest.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;

use crate::entry::{ActionKind, HistoryEntry};
use crate::error::HistoryError;
use crate::hasher;

/// File name of the history log, relative to the workspace root.
pub const HISTORY_FILE: &str = ".fence-history.jsonl";

pub struct ActionLog {
    writer: BufWriter<File>,
    path: PathBuf,
    last_hash: Option<String>,
}

impl ActionLog {
    /// Path of the history file for a workspace root.
    pub fn path_for(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(HISTORY_FILE)
    }

    /// Open (or create) the history log of the workspace at `root`,
    /// recovering the chain head from existing content.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = Self::path_for(root);

        let last_hash = if path.exists() {
            Self::read_last_hash(&path)?
        } else {
            None
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| HistoryError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            last_hash,
        })
    }

    /// Link `entry` to the chain and append it. Flushes after writing.
    pub fn append(&mut self, entry: &mut HistoryEntry) -> Result<(), HistoryError> {
        entry.previous_hash = self.last_hash.clone();

        let json = serde_json::to_string(entry)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;

        self.last_hash = Some(hasher::hash_str(&json));
        tracing::debug!(action = %entry.action, path = %self.path.display(), "history entry recorded");
        Ok(())
    }

    /// Build and append an entry in one step.
    pub fn record(
        &mut self,
        action: ActionKind,
        request: &str,
        result: impl Into<String>,
    ) -> Result<HistoryEntry, HistoryError> {
        let mut entry = HistoryEntry::new(action, request, result);
        self.append(&mut entry)?;
        Ok(entry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry, oldest first. A missing file is an empty history.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<HistoryEntry>, HistoryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(open_for_read(path)?);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }

        Ok(entries)
    }

    /// Check every link of the chain. Returns the number of verified entries.
    pub fn verify_chain(path: impl AsRef<Path>) -> Result<usize, HistoryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(0);
        }
        let reader = BufReader::new(open_for_read(path)?);
        let mut previous_hash: Option<String> = None;
        let mut verified = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: HistoryEntry = serde_json::from_str(&line)?;
            if entry.previous_hash != previous_hash {
                return Err(HistoryError::IntegrityViolation {
                    line: line_num + 1,
                    expected: previous_hash.unwrap_or_else(|| "None".to_string()),
                    actual: entry.previous_hash.unwrap_or_else(|| "None".to_string()),
                });
            }

            // Hash the raw line; re-serializing could reorder fields.
            previous_hash = Some(hasher::hash_str(&line));
            verified += 1;
        }

        Ok(verified)
    }

    fn read_last_hash(path: &Path) -> Result<Option<String>, HistoryError> {
        let reader = BufReader::new(open_for_read(path)?);
        let mut last_line: Option<String> = None;

        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last_line = Some(line);
            }
        }

        Ok(last_line.map(|line| hasher::hash_str(&line)))
    }
}

fn open_for_read(path: &Path) -> Result<File, HistoryError> {
    File::open(path).map_err(|source| HistoryError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Render entries as the human-readable `# Project History` document.
pub fn render_markdown(entries: &[HistoryEntry]) -> String {
    let mut out = String::from(
        "# Project History\n\nThis file tracks all AI-assisted changes made to this project.\n\n---\n",
    );
    for entry in entries {
        out.push_str(&format!(
            "\n## {}\n**Action**: {}\n**Request**: {}\n**Result**: {}\n---\n",
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.action,
            entry.request,
            entry.result,
        ));
    }
    out
}
