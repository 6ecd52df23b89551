//! Waiting for a submitted transaction to be sealed.
//!
//! [`SealPoller`] queries the transaction result at a fixed interval until
//! it is sealed, bounded by an attempt limit, a deadline and an optional
//! cancellation token. `Expired` and sealed-with-error results end the wait
//! with an error instead of being polled forever.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::AccessApi;
use crate::error::Error;
use crate::types::{Identifier, TransactionResult, TransactionStatus};

/// Polling bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between queries.
    pub interval: Duration,
    /// Maximum number of status queries, `None` for no limit.
    pub max_attempts: Option<u32>,
    /// Overall deadline measured from the first query, `None` for no limit.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: Some(300),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Progress notifications emitted while waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollEvent {
    /// Polling is about to start.
    Waiting { id: Identifier },
    /// A query returned a non-terminal status.
    Tick {
        attempt: u32,
        status: TransactionStatus,
    },
    /// The transaction was sealed.
    Sealed { id: Identifier },
}

/// Polls the Access API until a transaction is sealed.
pub struct SealPoller<'a, A: AccessApi> {
    api: &'a A,
    config: PollConfig,
    cancel: CancellationToken,
}

impl<'a, A: AccessApi> SealPoller<'a, A> {
    /// Create a poller with the given bounds and no external cancellation.
    pub fn new(api: &'a A, config: PollConfig) -> Self {
        Self {
            api,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop waiting when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Get the polling bounds.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Wait for `id` to be sealed.
    pub async fn wait_for_seal(&self, id: Identifier) -> Result<TransactionResult, Error> {
        self.wait_for_seal_with(id, |_| {}).await
    }

    /// Wait for `id` to be sealed, reporting progress to `observer`.
    pub async fn wait_for_seal_with<F>(
        &self,
        id: Identifier,
        mut observer: F,
    ) -> Result<TransactionResult, Error>
    where
        F: FnMut(PollEvent),
    {
        let started = Instant::now();
        let deadline = self.config.timeout.map(|t| started + t);
        let mut attempts: u32 = 0;

        observer(PollEvent::Waiting { id });

        loop {
            // A query still in flight at the deadline is abandoned
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::Cancelled(id)),
                result = self.api.transaction_result(&id) => result?,
                _ = sleep_until(deadline) => {
                    return Err(Error::SealTimeout {
                        id,
                        attempts,
                        elapsed: started.elapsed(),
                    });
                }
            };
            attempts += 1;

            tracing::debug!(
                transaction_id = %id,
                attempt = attempts,
                status = %result.status,
                "Polled transaction status"
            );

            match result.status {
                status if !status.is_terminal() => observer(PollEvent::Tick {
                    attempt: attempts,
                    status,
                }),
                TransactionStatus::Expired => return Err(Error::TransactionExpired(id)),
                _ => {
                    observer(PollEvent::Sealed { id });
                    if result.is_failed() {
                        return Err(Error::TransactionFailed {
                            id,
                            message: result.error_message,
                        });
                    }
                    tracing::info!(transaction_id = %id, attempts, "Transaction sealed");
                    return Ok(result);
                }
            }

            let timed_out = self.config.max_attempts.is_some_and(|max| attempts >= max)
                || deadline.is_some_and(|d| Instant::now() + self.config.interval > d);
            if timed_out {
                return Err(Error::SealTimeout {
                    id,
                    attempts,
                    elapsed: started.elapsed(),
                });
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::Cancelled(id)),
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}

/// Sleep until `deadline`, or forever without one.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
