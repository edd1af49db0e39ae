//! Inbound webhook payloads.

pub mod types;

pub use types::{InboundEvent, SuggestionResponse, UserMessage, UserStatus};
