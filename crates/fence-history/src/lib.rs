//! # fence-history
//!
//! Append-only record of what was done to a workspace.
//!
//! Each mutation (a write, a delete, an applied edit batch) can be recorded
//! as a [`HistoryEntry`] in `<root>/.fence-history.jsonl`. Entries are
//! hash-chained, so [`ActionLog::verify_chain`] detects tampering, and
//! [`render_markdown`] turns the log into a readable `# Project History`
//! document.
//!
//! Recording is an observer: callers log a warning and carry on when it
//! fails.
//!
//! ```rust,no_run
//! use fence_history::{ActionKind, ActionLog};
//!
//! let mut log = ActionLog::open("/path/to/project").unwrap();
//! log.record(ActionKind::Write, "src/main.rs", "wrote 120 bytes").unwrap();
//! ```

pub mod entry;
pub mod error;
pub mod hasher;
pub mod log;

pub use entry::{ActionKind, HistoryEntry, MAX_REQUEST_CHARS};
pub use error::HistoryError;
pub use log::{render_markdown, ActionLog, HISTORY_FILE};
