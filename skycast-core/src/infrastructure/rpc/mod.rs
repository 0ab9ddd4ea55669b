//! A2A over JSON-RPC 2.0.

pub mod server;
pub mod types;

pub use server::{extension_requested, handle_rpc};
pub use types::{RpcRequest, RpcResponse};
