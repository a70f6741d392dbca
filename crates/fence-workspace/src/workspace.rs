// workspace.rs — The sandboxed workspace handle.
//
// A Workspace owns one canonical root directory. Every read, write, delete
// and mkdir goes through `resolve()`, which is the only place a
// caller-supplied path is turned into a real filesystem path. Nothing here
// consults global state; callers hold a handle (see `WorkspaceManager` for
// the process-wide "open workspace" slot).

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::WorkspaceError;
use crate::ignore::IgnoreList;
use crate::tree::{self, ScanReport};

/// Leading directory markers the generator is known to invent. One matching
/// leading segment is dropped before resolution.
const SYNTHETIC_PREFIXES: &[&str] = &["memory"];

/// What `create_item` should create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Directory,
}

/// Returned when a workspace is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedWorkspace {
    pub root: PathBuf,
    /// True when the root holds no visible (non-hidden) entries.
    pub is_empty: bool,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    /// Canonical absolute root.
    root: PathBuf,
    ignore: IgnoreList,
}

impl Workspace {
    /// Open `path` as a workspace root.
    ///
    /// The path is canonicalized once here; all later containment checks
    /// compare against this canonical form.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let path = path.as_ref();
        let root = fs::canonicalize(path).map_err(|source| {
            WorkspaceError::from_io(path.to_path_buf(), &path.to_string_lossy(), source)
        })?;
        if !root.is_dir() {
            return Err(WorkspaceError::NotADirectory { path: root });
        }
        let ignore = IgnoreList::load(&root);
        tracing::info!("workspace set to {}", root.display());
        Ok(Self { root, ignore })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    /// Whether the root has no visible entries. An unlistable root counts
    /// as empty.
    pub fn is_empty(&self) -> bool {
        match fs::read_dir(&self.root) {
            Ok(entries) => !entries
                .filter_map(Result::ok)
                .any(|e| !e.file_name().to_string_lossy().starts_with('.')),
            Err(_) => true,
        }
    }

    pub fn describe(&self) -> OpenedWorkspace {
        OpenedWorkspace {
            root: self.root.clone(),
            is_empty: self.is_empty(),
        }
    }

    /// Resolve a caller-supplied path to an absolute path strictly inside
    /// the root.
    ///
    /// Leading separators are stripped, so `/etc/passwd` means
    /// `<root>/etc/passwd`. `..` is applied lexically and may not climb
    /// above the root. The deepest existing ancestor is canonicalized, so a
    /// symlink pointing out of the root is caught. The root itself is not a
    /// valid target.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, WorkspaceError> {
        if requested.trim().is_empty() {
            return Err(WorkspaceError::EmptyPath);
        }
        let cleaned = strip_synthetic_prefix(requested.trim_start_matches(['/', '\\']));
        self.resolve_segments(fold_segments(cleaned), requested)
    }

    /// Resolve a root-relative path produced by [`Workspace::list_files`].
    ///
    /// Same containment checks as [`Workspace::resolve`], but no synthetic
    /// prefix is dropped: a real top-level `memory/` directory is addressed
    /// as itself.
    pub fn resolve_listed(&self, relative_path: &str) -> Result<PathBuf, WorkspaceError> {
        if relative_path.trim().is_empty() {
            return Err(WorkspaceError::EmptyPath);
        }
        let cleaned = relative_path.trim_start_matches(['/', '\\']);
        self.resolve_segments(fold_segments(cleaned), relative_path)
    }

    fn resolve_segments(
        &self,
        segments: Option<Vec<&str>>,
        requested: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let traversal = || WorkspaceError::PathTraversal {
            path: requested.to_string(),
        };
        let segments = segments.ok_or_else(traversal)?;

        let mut candidate = self.root.clone();
        for segment in &segments {
            candidate.push(segment);
        }
        // Catches platform prefixes (e.g. `C:`) that replace the base on join.
        if !candidate.starts_with(&self.root) {
            return Err(traversal());
        }

        let resolved = self.canonicalize_existing(&candidate, requested)?;
        if resolved == self.root || !resolved.starts_with(&self.root) {
            tracing::warn!(requested, resolved = %resolved.display(), "path escapes workspace");
            return Err(traversal());
        }

        tracing::debug!(requested, resolved = %resolved.display(), "resolved path");
        Ok(resolved)
    }

    /// Canonicalize the deepest existing ancestor of `candidate` and
    /// re-append the components that don't exist yet.
    fn canonicalize_existing(
        &self,
        candidate: &Path,
        requested: &str,
    ) -> Result<PathBuf, WorkspaceError> {
        let mut existing = candidate.to_path_buf();
        let mut missing: Vec<OsString> = Vec::new();

        loop {
            match fs::symlink_metadata(&existing) {
                Ok(meta) => {
                    let mut base = match fs::canonicalize(&existing) {
                        Ok(base) => base,
                        // A link whose target doesn't exist: writing through
                        // it would land wherever it points.
                        Err(_) if meta.file_type().is_symlink() => {
                            return Err(WorkspaceError::PathTraversal {
                                path: requested.to_string(),
                            })
                        }
                        Err(source) => {
                            return Err(WorkspaceError::IoError {
                                path: existing,
                                source,
                            })
                        }
                    };
                    for part in missing.iter().rev() {
                        base.push(part);
                    }
                    return Ok(base);
                }
                Err(e) if e.kind() == ErrorKind::NotFound && existing != self.root => {
                    match existing.file_name() {
                        Some(name) => missing.push(name.to_os_string()),
                        None => break,
                    }
                    existing.pop();
                }
                Err(source) => {
                    return Err(WorkspaceError::IoError {
                        path: existing,
                        source,
                    })
                }
            }
        }

        Err(WorkspaceError::PathTraversal {
            path: requested.to_string(),
        })
    }

    /// Read a UTF-8 text file.
    pub fn read_file(&self, relative_path: &str) -> Result<String, WorkspaceError> {
        let full_path = self.resolve(relative_path)?;
        fs::read_to_string(&full_path)
            .map_err(|source| WorkspaceError::from_io(full_path, relative_path, source))
    }

    /// Read a file by the path a scan listed it under.
    pub fn read_listed(&self, relative_path: &str) -> Result<String, WorkspaceError> {
        let full_path = self.resolve_listed(relative_path)?;
        fs::read_to_string(&full_path)
            .map_err(|source| WorkspaceError::from_io(full_path, relative_path, source))
    }

    /// Write `content` to a file, creating parent directories and replacing
    /// any existing file. Returns the resolved path.
    pub fn write_file(&self, relative_path: &str, content: &str) -> Result<PathBuf, WorkspaceError> {
        let full_path = self.resolve(relative_path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::IoError {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&full_path, content).map_err(|source| WorkspaceError::IoError {
            path: full_path.clone(),
            source,
        })?;

        tracing::info!(path = relative_path, bytes = content.len(), "wrote file");
        Ok(full_path)
    }

    /// Delete a file, or a directory and everything under it.
    pub fn delete(&self, relative_path: &str) -> Result<(), WorkspaceError> {
        let full_path = self.resolve(relative_path)?;

        let meta = fs::symlink_metadata(&full_path)
            .map_err(|source| WorkspaceError::from_io(full_path.clone(), relative_path, source))?;

        let result = if meta.is_dir() {
            fs::remove_dir_all(&full_path)
        } else {
            fs::remove_file(&full_path)
        };
        result.map_err(|source| WorkspaceError::from_io(full_path, relative_path, source))?;

        tracing::info!(path = relative_path, "deleted");
        Ok(())
    }

    /// Create a file (with optional content) or a directory.
    pub fn create_item(
        &self,
        relative_path: &str,
        kind: ItemKind,
        content: Option<&str>,
    ) -> Result<PathBuf, WorkspaceError> {
        match kind {
            ItemKind::Directory => {
                let full_path = self.resolve(relative_path)?;
                fs::create_dir_all(&full_path).map_err(|source| WorkspaceError::IoError {
                    path: full_path.clone(),
                    source,
                })?;
                tracing::info!(path = relative_path, "created directory");
                Ok(full_path)
            }
            ItemKind::File => self.write_file(relative_path, content.unwrap_or_default()),
        }
    }

    /// Scan the whole workspace.
    pub fn list_files(&self, cancel: &CancelToken) -> Result<ScanReport, WorkspaceError> {
        let report = tree::scan(&self.root, "", &self.ignore, cancel)?;
        if !report.skipped.is_empty() {
            tracing::warn!(skipped = report.skipped.len(), "scan skipped unreadable entries");
        }
        Ok(report)
    }
}

/// The root-relative, `/`-joined form `resolve` would address, computed
/// without touching the filesystem.
///
/// Leading separators and one synthetic prefix are dropped and `.`/`..`
/// are folded. `None` when the path is empty, climbs above the root, or
/// names the root itself.
pub fn lexical_clean(requested: &str) -> Option<String> {
    let cleaned = strip_synthetic_prefix(requested.trim().trim_start_matches(['/', '\\']));
    fold_segments(cleaned).map(|segments| segments.join("/"))
}

/// Split on either separator and fold `.`/`..`. `None` on an escape above
/// the start or an empty result.
fn fold_segments(path: &str) -> Option<Vec<&str>> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

fn strip_synthetic_prefix(path: &str) -> &str {
    for prefix in SYNTHETIC_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            if let Some(rest) = rest.strip_prefix(['/', '\\']) {
                return rest;
            }
        }
    }
    path
}
