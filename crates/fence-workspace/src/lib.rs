//! # fence-workspace
//!
//! The sandbox every file operation on behalf of a language model goes
//! through.
//!
//! ## Key components
//!
//! - [`Workspace`]: a handle on one canonical root directory.
//!   [`Workspace::resolve`] turns any caller-supplied path into an absolute
//!   path strictly inside that root or fails with
//!   [`WorkspaceError::PathTraversal`]. Reads, writes, deletes and directory
//!   creation all resolve first.
//! - [`WorkspaceManager`]: the single "open workspace" slot for surfaces
//!   that keep state between requests.
//! - [`tree::scan`]: recursive listing into [`TreeEntry`] values, skipping
//!   the [`IgnoreList`] and recording unreadable entries instead of failing.
//! - [`CancelToken`]: caller-supplied cancellation and deadlines.

pub mod cancel;
pub mod error;
pub mod ignore;
pub mod manager;
pub mod tree;
pub mod workspace;

pub use cancel::CancelToken;
pub use error::WorkspaceError;
pub use ignore::IgnoreList;
pub use manager::WorkspaceManager;
pub use tree::{EntryKind, ScanReport, SkippedEntry, TreeEntry};
pub use workspace::{lexical_clean, ItemKind, OpenedWorkspace, Workspace};
