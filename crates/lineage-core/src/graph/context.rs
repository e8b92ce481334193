//! Cooperative cancellation for traversals.
//!
//! Builders call [`QueryContext::check`] before expanding each node. A
//! cancelled or expired context aborts the traversal with
//! [`QueryError::Cancelled`]; no partial tree is ever returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{CancelReason, QueryError};

/// Shared flag a caller flips to abort running queries.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every query holding this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Per-query cancellation context.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancelToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// A context that never cancels.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach a caller-owned cancel token.
    #[must_use]
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    /// Abort once `deadline` has passed.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    #[must_use]
    pub const fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Return an error if the query should stop now.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Cancelled`] when the token was cancelled or the
    /// deadline has passed.
    pub fn check(&self) -> Result<(), QueryError> {
        if self.token.is_cancelled() {
            return Err(QueryError::Cancelled(CancelReason::Requested));
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(QueryError::Cancelled(CancelReason::DeadlineExceeded));
        }
        Ok(())
    }
}
