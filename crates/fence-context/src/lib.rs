//! # fence-context
//!
//! Builds the bounded snapshot of a workspace that is pasted into a
//! generation prompt.
//!
//! [`build_context`] scans the workspace, keeps files whose extension is on
//! the allow-list and whose size is under the byte ceiling, takes the first
//! [`ContextLimits::max_files`] of them in discovery order, and cuts each
//! one to [`ContextLimits::max_chars_per_file`] characters. There is no
//! importance ranking: earlier-discovered files win.
//!
//! ```rust,no_run
//! use fence_context::{build_context, ContextLimits};
//! use fence_workspace::{CancelToken, Workspace};
//!
//! let ws = Workspace::open("/path/to/project").unwrap();
//! let digest = build_context(&ws, &ContextLimits::chat(), &CancelToken::none()).unwrap();
//! println!("{}", digest.render());
//! ```

pub mod digest;
pub mod limits;

pub use digest::{build_context, ContextDigest, ContextFile};
pub use limits::{ContextLimits, LimitOverrides};
