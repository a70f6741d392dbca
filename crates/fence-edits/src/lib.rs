//! # fence-edits
//!
//! Turns a model's free-form response into file writes.
//!
//! 1. [`extract_edits`] / [`EditExtractor`] scan the response for fenced
//!    code blocks and recover [`CandidateEdit`]s through an ordered chain
//!    of [`Recognizer`]s. This is a pure function of the text and never
//!    fails.
//! 2. [`apply_edits`] writes each candidate through
//!    [`fence_workspace::Workspace::write_file`], so every path is resolved
//!    inside the sandbox, and reports one [`ApplyResult`] per candidate.
//!
//! ```rust,no_run
//! use fence_edits::{apply_edits, extract_edits};
//! use fence_workspace::{CancelToken, Workspace};
//!
//! let ws = Workspace::open("/path/to/project").unwrap();
//! let response = "```python\n# filepath: app.py\nprint('hi')\n```";
//! let results = apply_edits(&ws, &extract_edits(response), &CancelToken::none());
//! assert!(results.iter().all(|r| r.success));
//! ```

pub mod apply;
pub mod candidate;
pub mod extract;
pub mod fence;

pub use apply::{apply_edits, ApplyResult};
pub use candidate::CandidateEdit;
pub use extract::{
    extract_edits, DuplicatePolicy, EditExtractor, MarkerRecognizer, Recognizer,
    UnnamedBlockRecognizer,
};
pub use fence::{code_blocks, CodeBlock};
