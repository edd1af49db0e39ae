//! bizmsg - webhook responder for the Business Messages API.
//!
//! The library provides the modules behind the `bizmsg-web` binary:
//! - `web`: webhook endpoint and request signature verification
//! - `reply`: keyword routing, live agent handoff and the executor that
//!   sends the replies
//! - `messaging`: outbound resources, canned replies and the API client
//! - `auth`: access tokens for outbound calls
//!
//! ## Architecture
//!
//! ```text
//! Webhook → signature check → InboundEvent → ReplyPlan → Executor → Business Messages API
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod messaging;
pub mod reply;
pub mod web;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{ClientError, CredentialError};
pub use event::InboundEvent;
pub use messaging::{BusinessMessagesClient, MessagingClient};
pub use reply::{plan_reply, Executor, ReplyPlan};
pub use web::AppState;
