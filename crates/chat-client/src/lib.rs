//! Scripted demonstration client for the chat service.
//!
//! The client joins a chat, sends a random number of messages, streams every
//! message in the chat back to stdout and leaves. Any failure ends the run.

/// The RPC seam and its hRPC implementation.
pub mod api;
/// Client configuration.
pub mod config;
/// Error types.
pub mod error;
/// Log output setup.
pub mod logging;
/// The scripted sequence.
pub mod session;

#[doc(inline)]
pub use api::{connect, ChatApi, MessageStream};
#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use error::{ChatError, ChatResult, RpcError};
#[doc(inline)]
pub use session::{run, Script, Transcript};
