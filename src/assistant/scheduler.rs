//! Delayed assistant replies
//!
//! Each reply is a tokio task that sleeps for the simulated round-trip and
//! then hands the classification back to the owner over a channel. The
//! owner keeps a [`PendingReply`] per scheduled task; cancelling or dropping
//! it stops the task, and the ticket lets the owner discard a reply that was
//! already in flight.

use super::intent::Classification;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

/// A classification whose simulated delay has elapsed
#[derive(Debug, Clone)]
pub struct ScheduledReply {
    pub ticket: u64,
    pub classification: Classification,
}

/// Handle to a reply that has not been delivered yet
#[derive(Debug)]
pub struct PendingReply {
    ticket: u64,
    _guard: DropGuard,
}

impl PendingReply {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Stop the reply task. Equivalent to dropping the handle.
    pub fn cancel(self) {
        tracing::debug!(ticket = self.ticket, "Cancelling pending assistant reply");
    }
}

/// Spawns delayed reply tasks and receives their results
#[derive(Debug)]
pub struct ReplyScheduler {
    delay: Duration,
    next_ticket: u64,
    tx: mpsc::UnboundedSender<ScheduledReply>,
    rx: mpsc::UnboundedReceiver<ScheduledReply>,
}

impl ReplyScheduler {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            next_ticket: 1,
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule delivery of `classification` after the configured delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, classification: Classification) -> PendingReply {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    tracing::debug!(ticket, "Assistant reply task cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    // The receiver lives as long as the scheduler
                    let _ = tx.send(ScheduledReply { ticket, classification });
                }
            }
        });

        PendingReply {
            ticket,
            _guard: token.drop_guard(),
        }
    }

    /// Next reply whose delay elapsed, in completion order
    pub async fn recv(&mut self) -> Option<ScheduledReply> {
        self.rx.recv().await
    }
}
