//! # Dispatch
//!
//! Decides which agent handles an inbound turn and turns its reply into task
//! updates.
//!
//! - A plain query goes to the gatherer. When it leaves an unrendered
//!   confirmation request and the client speaks A2UI, the turn ends
//!   `input-required` with the confirmation surface.
//! - A confirm action consumes the pending request and sends an explicit
//!   instruction to the fetcher picked for the client's capabilities.
//! - A reject action completes immediately.

mod agent;
mod roster;
mod router;


pub use agent::{Agent, AgentReply, ReplyAgent};
pub use roster::AgentRoster;
pub use router::{DispatchRouter, InboundTurn};
