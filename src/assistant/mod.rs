//! Mock travel assistant
//!
//! Keyword intent classification, the conversation log and delayed reply
//! delivery. The assistant never changes feed state itself: a delivered
//! reply carries the category the caller should activate.

pub mod conversation;
pub mod intent;
pub mod scheduler;

pub use conversation::{ChatMessage, ConversationLog, Intent, IntentAction, Sender};
pub use intent::{
    classify, Classification, IntentClassifier, IntentRule, CLARIFICATION_PROMPT, DEFAULT_RULES,
};
pub use scheduler::{PendingReply, ReplyScheduler, ScheduledReply};

use crate::error::{Error, Result};
use std::time::Duration;

/// A reply appended to the log, with the category it commands
#[derive(Debug, Clone)]
pub struct Delivered {
    pub message: ChatMessage,
    pub category: Option<String>,
}

/// Conversation state for one session: one exchange in flight at most
#[derive(Debug)]
pub struct Assistant {
    classifier: IntentClassifier,
    log: ConversationLog,
    scheduler: ReplyScheduler,
    pending: Option<PendingReply>,
}

impl Assistant {
    pub fn new(reply_delay: Duration) -> Self {
        Self::with_classifier(IntentClassifier::default(), reply_delay)
    }

    pub fn with_classifier(classifier: IntentClassifier, reply_delay: Duration) -> Self {
        Self {
            classifier,
            log: ConversationLog::new(),
            scheduler: ReplyScheduler::new(reply_delay),
            pending: None,
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a user message and schedule the assistant's reply.
    ///
    /// Rejected while the previous reply is still pending, so every user
    /// message is followed directly by its own reply.
    pub fn submit(&mut self, text: &str) -> Result<&ChatMessage> {
        if text.trim().is_empty() {
            return Err(Error::Assistant("Message is empty".to_string()));
        }
        if self.pending.is_some() {
            return Err(Error::Assistant(
                "Still waiting for the previous reply".to_string(),
            ));
        }

        let classification = self.classifier.classify(text);
        let pending = self.scheduler.schedule(classification);
        tracing::debug!(ticket = pending.ticket(), "Scheduled assistant reply");
        self.pending = Some(pending);

        Ok(self.log.push_user(text))
    }

    /// Drop the pending reply, if any. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.cancel();
                true
            }
            None => false,
        }
    }

    /// Wait for the pending reply. Returns `None` at once when nothing is
    /// pending; stale replies from cancelled exchanges are skipped.
    pub async fn next_reply(&mut self) -> Option<ScheduledReply> {
        loop {
            let ticket = self.pending.as_ref()?.ticket();
            let reply = self.scheduler.recv().await?;
            if reply.ticket == ticket {
                return Some(reply);
            }
            tracing::debug!(ticket = reply.ticket, "Discarding stale assistant reply");
        }
    }

    /// Append a scheduled reply to the log if it belongs to the pending
    /// exchange
    pub fn deliver(&mut self, reply: ScheduledReply) -> Option<Delivered> {
        match &self.pending {
            Some(pending) if pending.ticket() == reply.ticket => {}
            _ => {
                tracing::debug!(ticket = reply.ticket, "Ignoring reply for a closed exchange");
                return None;
            }
        }
        self.pending = None;

        let Classification {
            response,
            intent,
            category,
        } = reply.classification;
        let message = self.log.push_assistant(response, intent).clone();
        Some(Delivered { message, category })
    }

    /// Wait for the pending reply and deliver it
    pub async fn wait_for_reply(&mut self) -> Option<Delivered> {
        let reply = self.next_reply().await?;
        self.deliver(reply)
    }
}
