//! Chat-completion backends behind the gatherer and fetcher agents.
//!
//! Agents only see [`ModelProvider`]. [`DynamicModelProvider`] owns one
//! [`ModelClient`] per `[[providers]]` entry and forwards each request to the
//! backend named in it. Clients report a [`StopReason`] so a reply cut off by
//! the output limit can be told apart from a finished one.

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod provider;
pub mod traits;
pub mod types;

pub use factory::{BackendKind, ProviderFactory, resolve_api_key};
pub use provider::DynamicModelProvider;
pub use traits::{ModelClient, ModelProvider};
pub use types::{ModelError, ModelRequest, ModelResponse, StopReason};
