//! Reply routing and execution.
//!
//! ## Flow
//!
//! ```text
//! InboundEvent → plan_reply() → ReplyPlan → Executor → MessagingClient
//! ```

pub mod clock;
pub mod command;
pub mod executor;
pub mod router;

pub use clock::{Clock, TokioClock};
pub use command::{normalize, Command};
pub use executor::{ChainReport, ExecutionReport, Executor};
pub use router::{plan_reply, Action, ReplyPlan};
