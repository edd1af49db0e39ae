//! Outbound side: resource types, canned replies and the API client.

pub mod catalog;
pub mod client;
pub mod types;

pub use client::{BusinessMessagesClient, MessagingClient};
pub use types::{EventType, Message, Representative, RepresentativeType, Suggestion};
