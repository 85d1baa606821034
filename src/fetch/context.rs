// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cancellation and deadline context carried by every fetch.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Why a fetch was abandoned before the API server answered
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Caller-supplied context bounding a fetch in time
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the context to `timeout` from now; a timeout past the clock's range sets no deadline
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Bound the context to `deadline`; an earlier existing deadline is kept
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Tie the context to a token owned by the caller
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` until it completes, the context is cancelled, or the deadline passes.
    /// Cancellation wins over an expired deadline, which wins over a ready result.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        let deadline = async {
            match self.deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_bounds_completes() {
        let ctx = FetchContext::new();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_run_after_cancel_is_cancelled() {
        let ctx = FetchContext::new();
        ctx.cancel();

        assert!(ctx.is_cancelled());
        assert_eq!(ctx.run(async { 7 }).await, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_external_token_cancels_pending_future() {
        let token = CancellationToken::new();
        let ctx = FetchContext::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = ctx.run(std::future::pending::<()>()).await;
        canceller.await.unwrap();

        assert_eq!(result, Err(Interrupted::Cancelled));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = FetchContext::new().with_timeout(Duration::from_millis(20));
        let result = ctx.run(std::future::pending::<()>()).await;

        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_expired_deadline_wins_over_ready_future() {
        let ctx = FetchContext::new().with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(ctx.run(async { 7 }).await, Err(Interrupted::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_sets_no_deadline() {
        let ctx = FetchContext::new().with_timeout(Duration::from_secs(u64::MAX));

        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[test]
    fn test_unrepresentable_timeout_keeps_existing_deadline() {
        let deadline = Instant::now() + Duration::from_secs(5);
        let ctx = FetchContext::new()
            .with_deadline(deadline)
            .with_timeout(Duration::from_secs(u64::MAX));

        assert_eq!(ctx.deadline(), Some(deadline));
    }

    #[test]
    fn test_earliest_deadline_is_kept() {
        let now = Instant::now();
        let early = now + Duration::from_secs(1);
        let late = now + Duration::from_secs(10);

        let ctx = FetchContext::new().with_deadline(early).with_deadline(late);
        assert_eq!(ctx.deadline(), Some(early));

        let ctx = FetchContext::new().with_deadline(late).with_deadline(early);
        assert_eq!(ctx.deadline(), Some(early));
    }
}
