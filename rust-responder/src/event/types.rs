//! Inbound event types posted by the Business Messages platform.
//!
//! Field names follow the platform's camelCase JSON. Every part of the event
//! is optional except the conversation id; several parts can be present at
//! once.

use serde::Deserialize;
use serde_json::Value;

/// A single webhook delivery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    /// Conversation the event belongs to
    #[serde(default)]
    pub conversation_id: String,
    /// Free text typed by the user
    pub message: Option<UserMessage>,
    /// Tapped suggestion
    pub suggestion_response: Option<SuggestionResponse>,
    /// Typing and live agent signals
    pub user_status: Option<UserStatus>,
    /// Delivery / read receipts
    pub receipts: Option<Value>,
    pub survey_response: Option<Value>,
    pub authentication_response: Option<Value>,
    pub feedback_response: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub postback_data: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub is_typing: Option<bool>,
    #[serde(default)]
    pub requested_live_agent: bool,
}

impl InboundEvent {
    /// Whether the user asked to be handed to a live agent.
    pub fn requested_live_agent(&self) -> bool {
        self.user_status
            .as_ref()
            .map(|status| status.requested_live_agent)
            .unwrap_or(false)
    }
}
