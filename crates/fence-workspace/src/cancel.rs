// cancel.rs — Caller-supplied cancellation for scan, context and apply.
//
// A token is a shared flag plus an optional deadline. Clones share the flag,
// so a request handler can hand one clone to the worker and cancel through
// the other.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::WorkspaceError;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that only fires when `cancel()` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that never fires unless cancelled explicitly. Same as `new()`,
    /// spelled out for call sites that don't care about cancellation.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fire automatically once `timeout` has elapsed from now.
    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::SeqCst) {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }

    /// `Err(Cancelled)` if the token has fired, for use with `?`.
    pub fn check(&self) -> Result<(), WorkspaceError> {
        if self.is_cancelled() {
            Err(WorkspaceError::Cancelled)
        } else {
            Ok(())
        }
    }
}
