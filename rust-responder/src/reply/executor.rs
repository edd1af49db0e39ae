//! Run reply plans against the messaging client.
//!
//! Chains run one after the other, and every step waits for the previous
//! outbound call to be acknowledged. A failed call aborts the rest of its
//! own chain only; nothing is retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::ClientError;
use crate::event::InboundEvent;
use crate::messaging::{EventType, Message, MessagingClient};

use super::clock::Clock;
use super::router::{plan_reply, Action, ReplyPlan};

/// Outcome of running one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    pub chain: &'static str,
    /// Steps that finished, out of `total`
    pub completed: usize,
    pub total: usize,
    pub error: Option<String>,
}

impl ChainReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of handling one inbound event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub chains: Vec<ChainReport>,
}

impl ExecutionReport {
    pub fn failures(&self) -> usize {
        self.chains.iter().filter(|c| !c.succeeded()).count()
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chains.is_empty() {
            return f.write_str("ok: no reply");
        }

        let summary = self
            .chains
            .iter()
            .map(|c| match &c.error {
                None => format!("{} {}/{}", c.chain, c.completed, c.total),
                Some(e) => format!("{} {}/{} failed: {}", c.chain, c.completed, c.total, e),
            })
            .collect::<Vec<_>>()
            .join("; ");

        let status = if self.failures() == 0 { "ok" } else { "partial" };
        write!(f, "{}: {}", status, summary)
    }
}

/// Turns inbound events into outbound calls.
#[derive(Clone)]
pub struct Executor {
    client: Arc<dyn MessagingClient>,
    clock: Arc<dyn Clock>,
    handoff_delay: Duration,
}

impl Executor {
    pub fn new(client: Arc<dyn MessagingClient>, clock: Arc<dyn Clock>, handoff_delay: Duration) -> Self {
        Self {
            client,
            clock,
            handoff_delay,
        }
    }

    /// Plan and run the reply to `event`.
    pub async fn handle(&self, event: &InboundEvent) -> ExecutionReport {
        let plan = plan_reply(event, self.handoff_delay);
        self.execute(&event.conversation_id, &plan).await
    }

    /// Run the command chain, then the handoff chain. The two are never
    /// interleaved.
    pub async fn execute(&self, conversation_id: &str, plan: &ReplyPlan) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for (name, chain) in [("command", &plan.command_chain), ("handoff", &plan.handoff_chain)] {
            if chain.is_empty() {
                continue;
            }
            report
                .chains
                .push(self.run_chain(conversation_id, name, chain).await);
        }

        report
    }

    async fn run_chain(&self, conversation_id: &str, name: &'static str, chain: &[Action]) -> ChainReport {
        let mut completed = 0;

        for action in chain {
            if let Err(e) = self.run_action(conversation_id, action).await {
                error!(
                    conversation_id = %conversation_id,
                    chain = name,
                    step = completed,
                    error = %e,
                    "reply_chain_aborted"
                );
                return ChainReport {
                    chain: name,
                    completed,
                    total: chain.len(),
                    error: Some(e.to_string()),
                };
            }
            completed += 1;
        }

        info!(
            conversation_id = %conversation_id,
            chain = name,
            steps = completed,
            "reply_chain_complete"
        );

        ChainReport {
            chain: name,
            completed,
            total: chain.len(),
            error: None,
        }
    }

    async fn run_action(&self, conversation_id: &str, action: &Action) -> Result<(), ClientError> {
        match action {
            Action::Reply(message) => self.send_reply(conversation_id, message).await,
            Action::Event(event_type, representative) => {
                self.client
                    .send_event(conversation_id, *event_type, representative)
                    .await
            }
            Action::Survey => self.client.send_survey(conversation_id).await,
            Action::Wait(duration) => {
                self.clock.sleep(*duration).await;
                Ok(())
            }
        }
    }

    /// Typing indicators around the message are best effort; only the
    /// message itself can fail the step.
    async fn send_reply(&self, conversation_id: &str, message: &Message) -> Result<(), ClientError> {
        self.send_typing(conversation_id, EventType::TypingStarted, message)
            .await;
        self.client.send_message(conversation_id, message).await?;
        self.send_typing(conversation_id, EventType::TypingStopped, message)
            .await;
        Ok(())
    }

    async fn send_typing(&self, conversation_id: &str, event_type: EventType, message: &Message) {
        if let Err(e) = self
            .client
            .send_event(conversation_id, event_type, &message.representative)
            .await
        {
            warn!(
                conversation_id = %conversation_id,
                event_type = event_type.as_str(),
                error = %e,
                "typing_indicator_failed"
            );
        }
    }
}
