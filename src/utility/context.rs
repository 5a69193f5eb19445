// Standard library
use std::time::Duration;

// 3rd party crates
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Reason a wait ended before it could proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The wait was refused up front because it could not finish in time.
    #[error("rate: wait would exceed context deadline")]
    WouldExceedDeadline,
}

/// Cancellation and deadline carried by every outbound API call.
///
/// Cloning a context shares its cancellation; `child` derives a context that
/// is cancelled together with its parent but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline that is only done once cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derives a context cancelled with `self`, optionally with a tighter timeout.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let deadline = match (self.deadline, timeout) {
            (Some(parent), Some(timeout)) => Some(parent.min(Instant::now() + timeout)),
            (None, Some(timeout)) => Some(Instant::now() + timeout),
            (parent, None) => parent,
        };

        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<WaitError> {
        if self.token.is_cancelled() {
            return Some(WaitError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(WaitError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> WaitError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => WaitError::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => WaitError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                WaitError::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_context_is_live() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.err(), None);
        assert!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn cancel_is_visible_through_clones() {
        let ctx = RequestContext::new();
        let clone = ctx.clone();
        ctx.cancel();
        assert_eq!(clone.err(), Some(WaitError::Cancelled));
        assert_eq!(clone.done().await, WaitError::Cancelled);
    }

    #[tokio::test]
    async fn expired_deadline_reports_deadline_exceeded() {
        let ctx = RequestContext::with_timeout(Duration::from_nanos(1));
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(ctx.err(), Some(WaitError::DeadlineExceeded));
        assert_eq!(ctx.done().await, WaitError::DeadlineExceeded);
    }

    #[tokio::test]
    async fn child_follows_parent_cancellation_only() {
        let parent = RequestContext::new();
        let child = parent.child(None);
        child.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());

        let child = parent.child(Some(Duration::from_secs(60)));
        assert!(child.deadline().is_some());
        parent.cancel();
        assert_eq!(child.err(), Some(WaitError::Cancelled));
    }

    #[tokio::test]
    async fn child_keeps_the_tighter_deadline() {
        let parent = RequestContext::with_timeout(Duration::from_millis(50));
        let child = parent.child(Some(Duration::from_secs(60)));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[test]
    fn error_messages() {
        assert_eq!(WaitError::Cancelled.to_string(), "context canceled");
        assert_eq!(
            WaitError::DeadlineExceeded.to_string(),
            "context deadline exceeded"
        );
    }
}
