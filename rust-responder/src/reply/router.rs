//! Decide how to answer an inbound event.
//!
//! Routing is pure: it turns an event into a [`ReplyPlan`] of ordered
//! actions and performs no I/O. Running the plan is the executor's job.
//!
//! ```text
//! message.text ─┐
//!               ├─ normalize ─ keyword table ─ one reply action
//! postbackData ─┘
//!
//! userStatus.requestedLiveAgent ─ handoff chain (joined, wait, message, wait, left)
//! ```

use std::time::Duration;

use tracing::{debug, info};

use crate::event::InboundEvent;
use crate::messaging::catalog;
use crate::messaging::{EventType, Message, Representative};

use super::command::{normalize, Command};

/// One step of a reply chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send a message, bracketed by typing indicators for its representative
    Reply(Message),
    /// Send a bare conversation event
    Event(EventType, Representative),
    /// Ask the platform to send its satisfaction survey
    Survey,
    /// Pause before the next step
    Wait(Duration),
}

/// Everything to send in response to one inbound event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyPlan {
    /// Normalized text or postback data, if the event carried any
    pub input: Option<String>,
    /// Keyword matched by `input`
    pub command: Option<Command>,
    /// Reply to the user's text or tapped suggestion
    pub command_chain: Vec<Action>,
    /// Live agent handoff
    pub handoff_chain: Vec<Action>,
}

impl ReplyPlan {
    pub fn is_empty(&self) -> bool {
        self.command_chain.is_empty() && self.handoff_chain.is_empty()
    }
}

/// The text driving command dispatch. A message wins over a suggestion
/// response when both are present.
pub fn command_input(event: &InboundEvent) -> Option<String> {
    if let Some(message) = &event.message {
        debug!(conversation_id = %event.conversation_id, "inbound_message");
        return Some(normalize(&message.text));
    }

    if let Some(suggestion) = &event.suggestion_response {
        debug!(conversation_id = %event.conversation_id, "inbound_suggestion");
        return Some(normalize(&suggestion.postback_data));
    }

    None
}

/// Map normalized input to exactly one action. Unknown input is echoed back
/// with the keyword hint.
pub fn dispatch(value: &str) -> (Option<Command>, Action) {
    let command = Command::parse(value);

    let action = match command {
        Some(Command::RichText) => Action::Reply(catalog::rich_text()),
        Some(Command::Image) => Action::Reply(catalog::image()),
        Some(Command::RichCard) => Action::Reply(catalog::rich_card()),
        Some(Command::Carousel) => Action::Reply(catalog::carousel()),
        Some(Command::LiveAgent) => Action::Reply(catalog::live_agent_prompt()),
        Some(Command::Survey) => Action::Survey,
        None => Action::Reply(catalog::text_only(catalog::echo_text(value))),
    };

    (command, action)
}

/// Representative joins, says it is catching up, then leaves.
pub fn handoff_chain(delay: Duration) -> Vec<Action> {
    vec![
        Action::Event(EventType::RepresentativeJoined, Representative::human()),
        Action::Wait(delay),
        Action::Reply(catalog::human_catching_up()),
        Action::Wait(delay),
        Action::Event(EventType::RepresentativeLeft, Representative::human()),
    ]
}

/// Build the reply plan for an event.
pub fn plan_reply(event: &InboundEvent, handoff_delay: Duration) -> ReplyPlan {
    let mut plan = ReplyPlan::default();
    let conversation_id = event.conversation_id.as_str();

    if let Some(value) = command_input(event) {
        let (command, action) = dispatch(&value);

        info!(
            conversation_id = %conversation_id,
            value = %value,
            command = command.map(Command::keyword).unwrap_or("echo"),
            "reply_command_routed"
        );

        plan.command = command;
        plan.input = Some(value);
        plan.command_chain.push(action);
    }

    log_informational(event);

    if event.requested_live_agent() {
        info!(conversation_id = %conversation_id, "reply_live_agent_requested");
        plan.handoff_chain = handoff_chain(handoff_delay);
    }

    plan
}

fn log_informational(event: &InboundEvent) {
    let conversation_id = event.conversation_id.as_str();

    if event.receipts.is_some() {
        info!(conversation_id = %conversation_id, "inbound_receipts");
    }
    if event.survey_response.is_some() {
        info!(conversation_id = %conversation_id, "inbound_survey_response");
    }
    if event.authentication_response.is_some() {
        info!(conversation_id = %conversation_id, "inbound_authentication_response");
    }
    if event.feedback_response.is_some() {
        info!(conversation_id = %conversation_id, "inbound_feedback_response");
    }
    if let Some(is_typing) = event.user_status.as_ref().and_then(|s| s.is_typing) {
        debug!(conversation_id = %conversation_id, is_typing, "inbound_user_typing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{SuggestionResponse, UserMessage, UserStatus};
    use crate::messaging::types::RichCard;
    use crate::messaging::RepresentativeType;

    const DELAY: Duration = Duration::from_millis(2000);

    fn text_event(text: &str) -> InboundEvent {
        InboundEvent {
            conversation_id: "conv".to_string(),
            message: Some(UserMessage {
                message_id: None,
                text: text.to_string(),
            }),
            ..Default::default()
        }
    }

    fn postback_event(data: &str) -> InboundEvent {
        InboundEvent {
            conversation_id: "conv".to_string(),
            suggestion_response: Some(SuggestionResponse {
                postback_data: data.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn reply_text(action: &Action) -> String {
        match action {
            Action::Reply(message) => message.text.clone().unwrap_or_default(),
            other => panic!("Expected reply, got {:?}", other),
        }
    }

    #[test]
    fn test_command_case_and_whitespace_insensitive() {
        for input in ["Rich Card", "rich card", "  rich card  "] {
            let plan = plan_reply(&text_event(input), DELAY);
            assert_eq!(plan.command, Some(Command::RichCard));
            assert_eq!(plan.command_chain.len(), 1);
            assert!(matches!(
                &plan.command_chain[0],
                Action::Reply(Message { rich_card: Some(RichCard::StandaloneCard(_)), .. })
            ));
        }
    }

    #[test]
    fn test_postback_routes_like_text() {
        let plan = plan_reply(&postback_event("carousel"), DELAY);
        assert_eq!(plan.command, Some(Command::Carousel));
        assert!(matches!(
            &plan.command_chain[0],
            Action::Reply(Message { rich_card: Some(RichCard::CarouselCard(_)), .. })
        ));
    }

    #[test]
    fn test_message_wins_over_suggestion() {
        let mut event = text_event("image");
        event.suggestion_response = Some(SuggestionResponse {
            postback_data: "survey".to_string(),
            ..Default::default()
        });

        let plan = plan_reply(&event, DELAY);
        assert_eq!(plan.input.as_deref(), Some("image"));
        assert_eq!(plan.command, Some(Command::Image));
    }

    #[test]
    fn test_unrecognized_echoes_input() {
        let plan = plan_reply(&text_event("  Banana "), DELAY);
        assert_eq!(plan.command, None);
        assert_eq!(plan.command_chain.len(), 1);

        let text = reply_text(&plan.command_chain[0]);
        assert!(text.contains("You said: banana"));
        assert!(text.contains("rich text, image, rich card, carousel"));
    }

    #[test]
    fn test_every_keyword_dispatches_one_action() {
        for command in Command::ALL {
            let (matched, action) = dispatch(command.keyword());
            assert_eq!(matched, Some(command));
            match command {
                Command::Survey => assert_eq!(action, Action::Survey),
                _ => assert!(matches!(action, Action::Reply(_))),
            }
        }
    }

    #[test]
    fn test_live_agent_keyword_sends_prompt() {
        let plan = plan_reply(&text_event("Live Agent"), DELAY);
        assert_eq!(reply_text(&plan.command_chain[0]), "Would you like to chat with a live agent?");
        assert!(plan.handoff_chain.is_empty());
    }

    #[test]
    fn test_handoff_chain_order() {
        let event = InboundEvent {
            conversation_id: "conv".to_string(),
            user_status: Some(UserStatus {
                is_typing: None,
                requested_live_agent: true,
            }),
            ..Default::default()
        };

        let plan = plan_reply(&event, DELAY);
        assert!(plan.command_chain.is_empty());
        assert_eq!(plan.handoff_chain.len(), 5);

        match &plan.handoff_chain[..] {
            [Action::Event(EventType::RepresentativeJoined, joined), Action::Wait(first), Action::Reply(message), Action::Wait(second), Action::Event(EventType::RepresentativeLeft, left)] =>
            {
                assert_eq!(joined.representative_type, RepresentativeType::Human);
                assert_eq!(left.representative_type, RepresentativeType::Human);
                assert_eq!(message.representative.representative_type, RepresentativeType::Human);
                assert_eq!(*first, DELAY);
                assert_eq!(*second, DELAY);
            }
            other => panic!("Unexpected handoff chain: {:?}", other),
        }
    }

    #[test]
    fn test_command_and_handoff_both_planned() {
        let mut event = text_event("image");
        event.user_status = Some(UserStatus {
            is_typing: Some(false),
            requested_live_agent: true,
        });

        let plan = plan_reply(&event, DELAY);
        assert_eq!(plan.command_chain.len(), 1);
        assert_eq!(plan.handoff_chain.len(), 5);
    }

    #[test]
    fn test_informational_fields_plan_nothing() {
        let event = InboundEvent {
            conversation_id: "conv".to_string(),
            receipts: Some(serde_json::json!({"receipts": []})),
            survey_response: Some(serde_json::json!({})),
            authentication_response: Some(serde_json::json!({})),
            feedback_response: Some(serde_json::json!({})),
            user_status: Some(UserStatus {
                is_typing: Some(true),
                requested_live_agent: false,
            }),
            ..Default::default()
        };

        let plan = plan_reply(&event, DELAY);
        assert!(plan.is_empty());
        assert!(plan.input.is_none());
    }
}
