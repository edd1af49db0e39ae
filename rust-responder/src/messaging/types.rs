//! Outbound resource types for the Business Messages API.
//!
//! Only the subset of the resource model this responder produces is
//! represented. Optional members are omitted from the JSON when unset.

use serde::Serialize;

// =============================================================================
// Representatives
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepresentativeType {
    Bot,
    Human,
}

/// Identity a message or event is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub representative_type: RepresentativeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
}

impl Representative {
    pub fn bot() -> Self {
        Self {
            representative_type: RepresentativeType::Bot,
            display_name: Some("Echo Bot".to_string()),
            avatar_image: None,
        }
    }

    pub fn human() -> Self {
        Self {
            representative_type: RepresentativeType::Human,
            display_name: Some("Live Agent".to_string()),
            avatar_image: None,
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// Conversation event types an agent can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    TypingStarted,
    TypingStopped,
    RepresentativeJoined,
    RepresentativeLeft,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::TypingStarted => "TYPING_STARTED",
            EventType::TypingStopped => "TYPING_STOPPED",
            EventType::RepresentativeJoined => "REPRESENTATIVE_JOINED",
            EventType::RepresentativeLeft => "REPRESENTATIVE_LEFT",
        }
    }
}

/// Body of `conversations.events.create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEvent<'a> {
    pub event_type: EventType,
    pub representative: &'a Representative,
}

// =============================================================================
// Messages
// =============================================================================

/// Body of `conversations.messages.create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub representative: Representative,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub contains_rich_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_card: Option<RichCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Message {
    /// An empty message with a fresh id.
    pub fn new(representative: Representative) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            representative,
            text: None,
            contains_rich_text: false,
            image: None,
            rich_card: None,
            fallback: None,
            suggestions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub content_info: ContentInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    pub file_url: String,
    pub force_refresh: bool,
}

// =============================================================================
// Rich cards
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RichCard {
    StandaloneCard(StandaloneCard),
    CarouselCard(CarouselCard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneCard {
    pub card_content: CardContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselCard {
    pub card_width: CardWidth,
    pub card_contents: Vec<CardContent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardWidth {
    Small,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    pub title: String,
    pub description: String,
    pub media: Media,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub height: MediaHeight,
    pub content_info: ContentInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaHeight {
    Short,
    Medium,
    Tall,
}

// =============================================================================
// Suggestions
// =============================================================================

/// A chip shown under a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Suggestion {
    Reply(SuggestedReply),
    Action(SuggestedAction),
    LiveAgentRequest(LiveAgentRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedReply {
    pub text: String,
    pub postback_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAction {
    pub text: String,
    pub postback_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dial_action: Option<DialAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url_action: Option<OpenUrlAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialAction {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenUrlAction {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveAgentRequest {}
