use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

/// Convenience type for results of the scripted session.
pub type ChatResult<T> = Result<T, ChatError>;

/// A single remote call that did not succeed.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The call did not complete before its deadline.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    /// The transport or the endpoint returned an error.
    #[error("{0}")]
    Call(String),
    /// The server's response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// The message socket failed for a reason other than being closed.
    #[error("socket error: {0}")]
    Stream(String),
}

/// Everything that can stop the demo. Each variant is one step of the script.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to connect: {0}")]
    Connect(String),
    #[error("error joining to chat: {0}")]
    Join(#[source] RpcError),
    #[error("error sending message {seq}: {source}")]
    Send {
        seq: usize,
        #[source]
        source: RpcError,
    },
    #[error("error receiving messages: {0}")]
    GetMessages(#[source] RpcError),
    #[error("error receiving message: {0}")]
    ReceiveMessage(#[source] RpcError),
    #[error("error leaving from chat: {0}")]
    Leave(#[source] RpcError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
