// tree.rs — Recursive workspace listing.
//
// Produces a fresh tree on every call; nothing is cached. Ignored names are
// filtered before recursion so ignored directories are never opened.
// Only the scan root is required to be readable. Anything below it that
// can't be listed or stat'ed is recorded in `ScanReport::skipped` and the
// scan carries on.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::WorkspaceError;
use crate::ignore::IgnoreList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One node of the workspace tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    /// Root-relative, always `/`-separated.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Extension without the dot, for files that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Non-ignored immediate descendants, for directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeEntry>>,
}

impl TreeEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// A sub-entry the scanner could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub path: String,
    pub reason: String,
}

/// Result of a scan: the tree plus whatever had to be left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub entries: Vec<TreeEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl ScanReport {
    /// All files in depth-first discovery order.
    pub fn files(&self) -> Vec<&TreeEntry> {
        let mut out = Vec::new();
        collect_files(&self.entries, &mut out);
        out
    }
}

fn collect_files<'a>(entries: &'a [TreeEntry], out: &mut Vec<&'a TreeEntry>) {
    for entry in entries {
        match &entry.children {
            Some(children) => collect_files(children, out),
            None if entry.is_file() => out.push(entry),
            None => {}
        }
    }
}

/// Scan `dir`, labelling entries relative to `relative_prefix`.
///
/// Fails only if `dir` itself can't be listed.
pub fn scan(
    dir: &Path,
    relative_prefix: &str,
    ignore: &IgnoreList,
    cancel: &CancelToken,
) -> Result<ScanReport, WorkspaceError> {
    let listing = fs::read_dir(dir).map_err(|source| WorkspaceError::IoError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut skipped = Vec::new();
    let entries = scan_listing(listing, dir, relative_prefix, ignore, cancel, &mut skipped)?;
    Ok(ScanReport { entries, skipped })
}

fn scan_listing(
    listing: fs::ReadDir,
    dir: &Path,
    prefix: &str,
    ignore: &IgnoreList,
    cancel: &CancelToken,
    skipped: &mut Vec<SkippedEntry>,
) -> Result<Vec<TreeEntry>, WorkspaceError> {
    cancel.check()?;

    let mut entries = Vec::new();
    for item in listing {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                skipped.push(SkippedEntry {
                    path: display_prefix(prefix),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let name = item.file_name().to_string_lossy().to_string();
        if ignore.is_ignored(&name) {
            continue;
        }
        let rel_path = join_relative(prefix, &name);
        let full_path = dir.join(&name);

        let file_type = match item.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                skipped.push(SkippedEntry {
                    path: rel_path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if file_type.is_dir() {
            match fs::read_dir(&full_path) {
                Ok(sub) => {
                    let children =
                        scan_listing(sub, &full_path, &rel_path, ignore, cancel, skipped)?;
                    entries.push(TreeEntry {
                        name,
                        path: rel_path,
                        kind: EntryKind::Directory,
                        size: None,
                        extension: None,
                        children: Some(children),
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %rel_path, "skipping unreadable directory: {}", e);
                    skipped.push(SkippedEntry {
                        path: rel_path,
                        reason: e.to_string(),
                    });
                }
            }
            continue;
        }

        // Symlinks are listed as files with their target's metadata and
        // never descended into.
        let metadata = if file_type.is_symlink() {
            fs::metadata(&full_path)
        } else {
            item.metadata()
        };
        match metadata {
            Ok(meta) => {
                let extension = Path::new(&name)
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_string());
                entries.push(TreeEntry {
                    name,
                    path: rel_path,
                    kind: EntryKind::File,
                    size: Some(meta.len()),
                    extension,
                    children: None,
                });
            }
            Err(e) => {
                skipped.push(SkippedEntry {
                    path: rel_path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(entries)
}

fn join_relative(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), name)
    }
}

fn display_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        ".".to_string()
    } else {
        prefix.to_string()
    }
}
