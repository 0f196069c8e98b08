// ABOUTME: Cancellable bounded waits used by transition sequences.
// ABOUTME: Every pause races a watch-channel generation counter bumped by cancel requests.

use std::future::Future;
use std::time::Duration;

use snafu::OptionExt;
use tokio::sync::watch;
use tokio::time::Instant;

use super::error::{CancelledSnafu, LifecycleError, Step, TimeoutSnafu};

pub(crate) struct Waiter {
    interval: Duration,
    cancel: watch::Receiver<u64>,
}

impl Waiter {
    /// `cancel` must be subscribed before the transition is admitted so no
    /// cancel request can slip between admission and the first wait.
    pub fn new(interval: Duration, cancel: watch::Receiver<u64>) -> Self {
        Self { interval, cancel }
    }

    /// Sleep for `duration` unless the transition is cancelled first.
    pub async fn pause(&mut self, step: Step, duration: Duration) -> Result<(), LifecycleError> {
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = cancelled(&mut self.cancel) => CancelledSnafu { step }.fail(),
        }
    }

    /// Run `check` every poll interval until it yields a value or `limit` elapses.
    pub async fn poll_until<T, F, Fut>(
        &mut self,
        step: Step,
        limit: Duration,
        mut check: F,
    ) -> Result<T, LifecycleError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(value) = check().await {
                return Ok(value);
            }

            let remaining = deadline
                .checked_duration_since(Instant::now())
                .filter(|d| !d.is_zero())
                .context(TimeoutSnafu { step, limit })?;
            tracing::debug!("Still {}, next check in {:?}", step, self.interval);
            self.pause(step, self.interval.min(remaining)).await?;
        }
    }
}

/// Resolves when the generation counter moves. A dropped sender never fires.
async fn cancelled(rx: &mut watch::Receiver<u64>) {
    if rx.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}
