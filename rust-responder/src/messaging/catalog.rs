//! Canned replies sent by the responder.

use crate::reply::Command;

use super::types::{
    CardContent, CardWidth, CarouselCard, ContentInfo, DialAction, Image, LiveAgentRequest, Media,
    MediaHeight, Message, OpenUrlAction, Representative, RichCard, StandaloneCard,
    SuggestedAction, SuggestedReply, Suggestion,
};

/// Images used by the image, rich card and carousel replies.
///
/// Placeholder sample URLs, not platform-hosted assets. Replace them with
/// images the agent actually serves before going live.
pub const SAMPLE_IMAGES: &[&str] = &[
    "https://storage.googleapis.com/bm-sample-assets/sample-image-1.jpg",
    "https://storage.googleapis.com/bm-sample-assets/sample-image-2.jpg",
    "https://storage.googleapis.com/bm-sample-assets/sample-image-3.jpg",
];

/// Rich cards accept at most this many suggestions.
const MAX_CARD_SUGGESTIONS: usize = 4;

const CAROUSEL_CARD_SUGGESTIONS: usize = 2;

const POSTBACK_CALL: &str = "call";
const POSTBACK_URL: &str = "url";
const POSTBACK_YOUTUBE: &str = "youtube";

/// Text of the default reply for input that matched no keyword.
pub fn echo_text(value: &str) -> String {
    let keywords = [
        Command::RichText,
        Command::Image,
        Command::RichCard,
        Command::Carousel,
    ]
    .map(Command::keyword)
    .join(", ");

    [
        format!("You said: {}", value),
        "Try these keywords:".to_string(),
        keywords,
    ]
    .join("\n\n")
}

/// Plain text from the bot with the full suggestion list.
pub fn text_only(text: impl Into<String>) -> Message {
    let mut message = Message::new(Representative::bot());
    message.text = Some(text.into());
    message.suggestions = suggestions(true);
    message
}

pub fn rich_text() -> Message {
    let mut message = Message::new(Representative::bot());
    message.contains_rich_text = true;
    message.text = Some(
        "Hello, here is some **bold text**, *italicized text*, and a \
         [link](https://www.google.com)."
            .to_string(),
    );
    message.fallback = Some(
        "Hello, here is some bold text, italicized text, and a link https://www.google.com."
            .to_string(),
    );
    message.suggestions = suggestions(true);
    message
}

pub fn image() -> Message {
    let mut message = Message::new(Representative::bot());
    message.image = Some(Image {
        content_info: ContentInfo {
            alt_text: Some("Alternative text".to_string()),
            file_url: SAMPLE_IMAGES[0].to_string(),
            force_refresh: true,
        },
    });
    message.fallback = Some("Hello, world!\nAn image has been sent with Business Messages.".to_string());
    message.suggestions = suggestions(true);
    message
}

pub fn rich_card() -> Message {
    let title = "This is a Title";
    let description = "This is a description for the rich card";
    let file_url = SAMPLE_IMAGES[0];

    let mut card_suggestions = suggestions(false);
    card_suggestions.truncate(MAX_CARD_SUGGESTIONS);

    let mut message = Message::new(Representative::bot());
    message.rich_card = Some(RichCard::StandaloneCard(StandaloneCard {
        card_content: CardContent {
            title: title.to_string(),
            description: description.to_string(),
            media: Media {
                height: MediaHeight::Medium,
                content_info: ContentInfo {
                    alt_text: None,
                    file_url: file_url.to_string(),
                    force_refresh: false,
                },
            },
            suggestions: card_suggestions,
        },
    }));
    message.fallback = Some(format!("{}\n\n{}\n\n{}", title, description, file_url));
    message
}

pub fn carousel() -> Message {
    let carousel = sample_carousel();

    // Devices without carousel support get every card as text.
    let fallback = carousel
        .card_contents
        .iter()
        .flat_map(|card| {
            [
                card.title.clone(),
                card.description.clone(),
                card.media.content_info.file_url.clone(),
                "-------------------------------".to_string(),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut message = Message::new(Representative::bot());
    message.rich_card = Some(RichCard::CarouselCard(carousel));
    message.fallback = Some(fallback);
    message
}

fn sample_carousel() -> CarouselCard {
    let mut card_suggestions = suggestions(false);
    card_suggestions.truncate(CAROUSEL_CARD_SUGGESTIONS);

    let card_contents = SAMPLE_IMAGES
        .iter()
        .enumerate()
        .map(|(i, url)| CardContent {
            title: format!("Card #{}", i + 1),
            description: "This is a sample card".to_string(),
            media: Media {
                height: MediaHeight::Medium,
                content_info: ContentInfo {
                    alt_text: Some(format!("Alt text for image {}", i)),
                    file_url: url.to_string(),
                    force_refresh: false,
                },
            },
            suggestions: card_suggestions.clone(),
        })
        .collect();

    CarouselCard {
        card_width: CardWidth::Medium,
        card_contents,
    }
}

pub fn live_agent_prompt() -> Message {
    let prompt = "Would you like to chat with a live agent?";

    let mut message = Message::new(Representative::bot());
    message.text = Some(prompt.to_string());
    message.fallback = Some(prompt.to_string());
    message.suggestions = suggestions(true);
    message
}

/// First message of a handoff, attributed to the human representative.
pub fn human_catching_up() -> Message {
    let mut message = Message::new(Representative::human());
    message.text = Some(
        "Hi, I'm a human representative. \n\nGive me a moment to catch up on your chat messages."
            .to_string(),
    );
    message
}

/// Suggestion chips offered with most replies.
///
/// Rich cards do not support the live agent request chip, so callers
/// building cards pass `false`.
pub fn suggestions(include_live_agent_request: bool) -> Vec<Suggestion> {
    let reply = |text: &str, command: Command| {
        Suggestion::Reply(SuggestedReply {
            text: text.to_string(),
            postback_data: command.keyword().to_string(),
        })
    };

    let mut list = vec![
        reply("Image", Command::Image),
        reply("Rich text", Command::RichText),
        reply("Rich card", Command::RichCard),
        reply("Carousel", Command::Carousel),
        Suggestion::Action(SuggestedAction {
            text: "Call".to_string(),
            postback_data: POSTBACK_CALL.to_string(),
            dial_action: Some(DialAction {
                phone_number: "+12223334444".to_string(),
            }),
            open_url_action: None,
        }),
        Suggestion::Action(SuggestedAction {
            text: "Website".to_string(),
            postback_data: POSTBACK_URL.to_string(),
            dial_action: None,
            open_url_action: Some(OpenUrlAction {
                url: "https://www.google.com".to_string(),
            }),
        }),
        Suggestion::Action(SuggestedAction {
            text: "YouTube Video".to_string(),
            postback_data: POSTBACK_YOUTUBE.to_string(),
            dial_action: None,
            open_url_action: Some(OpenUrlAction {
                url: "https://www.youtube.com/embed/C_aBjZ9RfVE".to_string(),
            }),
        }),
    ];

    if include_live_agent_request {
        list.push(Suggestion::LiveAgentRequest(LiveAgentRequest::default()));
    }

    list
}
