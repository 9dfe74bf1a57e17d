//! The seam between the scripted session and the chat service.
//!
//! [`ChatApi`] is implemented for the generated [`ChatClient`] over any hRPC
//! transport, so the same session runs against the HTTP transport in the
//! binary and against a mock transport in tests.

use std::{error::Error as StdError, fmt::Display};

use async_trait::async_trait;
use chat_common::chat::{
    chat_client::ChatClient, GetMessagesRequest, GetMessagesResponse, JoinRequest, JoinResponse,
    LeaveRequest, LeaveResponse, SendRequest, SendResponse,
};
use hrpc::{
    client::{
        prelude::{BoxRequest, BoxResponse, Service, TransportError},
        socket::{Socket, SocketError},
        transport::http::Hyper,
        Client,
    },
    common::layer::modify::ModifyLayer,
    exports::http::{StatusCode, Uri},
    proto::Error as HrpcError,
};
use tracing::debug;

use crate::{
    config::RpcConfig,
    error::{ChatError, ChatResult, RpcError},
};

/// Identifier hRPC gives transport failures of a socket.
pub const SOCKET_ERROR: &str = "hrpcrs.socket-error";

/// Message of the transport failure a socket yields once the other side closed it.
pub const CLOSED_BY_OTHER_END: &str = "socket is closed by the other end";

/// Operations of the chat service used by the demo.
#[async_trait(?Send)]
pub trait ChatApi {
    /// Stream returned by [`ChatApi::get_messages`].
    type Messages: MessageStream;

    async fn join(&mut self, request: JoinRequest) -> Result<JoinResponse, RpcError>;

    async fn send(&mut self, request: SendRequest) -> Result<SendResponse, RpcError>;

    async fn get_messages(
        &mut self,
        request: GetMessagesRequest,
    ) -> Result<Self::Messages, RpcError>;

    async fn leave(&mut self, request: LeaveRequest) -> Result<LeaveResponse, RpcError>;
}

/// Messages streamed back by the server.
#[async_trait(?Send)]
pub trait MessageStream {
    /// Wait for the next message. `Ok(None)` means the server finished the stream.
    async fn next_message(&mut self) -> Result<Option<GetMessagesResponse>, RpcError>;
}

#[async_trait(?Send)]
impl<Inner, InnerErr> ChatApi for ChatClient<Inner>
where
    Inner: Service<BoxRequest, Response = BoxResponse, Error = TransportError<InnerErr>> + 'static,
    InnerErr: StdError + 'static,
{
    type Messages = SocketMessages;

    async fn join(&mut self, request: JoinRequest) -> Result<JoinResponse, RpcError> {
        let response = ChatClient::join(self, request).await.map_err(call_error)?;
        response.into_message().await.map_err(decode_error)
    }

    async fn send(&mut self, request: SendRequest) -> Result<SendResponse, RpcError> {
        let response = ChatClient::send(self, request).await.map_err(call_error)?;
        response.into_message().await.map_err(decode_error)
    }

    async fn get_messages(
        &mut self,
        request: GetMessagesRequest,
    ) -> Result<Self::Messages, RpcError> {
        let socket = ChatClient::get_messages(self, request)
            .await
            .map_err(call_error)?;
        Ok(SocketMessages { socket })
    }

    async fn leave(&mut self, request: LeaveRequest) -> Result<LeaveResponse, RpcError> {
        let response = ChatClient::leave(self, request).await.map_err(call_error)?;
        response.into_message().await.map_err(decode_error)
    }
}

/// [`MessageStream`] backed by the hRPC socket opened for `GetMessages`.
pub struct SocketMessages {
    socket: Socket<GetMessagesRequest, GetMessagesResponse>,
}

#[async_trait(?Send)]
impl MessageStream for SocketMessages {
    async fn next_message(&mut self) -> Result<Option<GetMessagesResponse>, RpcError> {
        match self.socket.receive_message().await {
            Ok(message) => Ok(Some(message)),
            Err(err) if is_end_of_stream(&err) => Ok(None),
            Err(err) => Err(RpcError::Stream(err.to_string())),
        }
    }
}

/// Whether a socket error only signals that the server closed the stream.
///
/// hRPC reports a close frame, and a transport that ran out of frames, as a
/// transport error wrapping an [`HrpcError`]. Errors the server sent over the
/// socket arrive as [`SocketError::Protocol`] and are never end of stream.
pub fn is_end_of_stream(err: &SocketError) -> bool {
    match err {
        SocketError::Transport(inner) => inner
            .downcast_ref::<HrpcError>()
            .map_or(false, |inner| {
                inner.identifier == SOCKET_ERROR && inner.human_message == CLOSED_BY_OTHER_END
            }),
        _ => false,
    }
}

fn call_error(err: impl Display) -> RpcError {
    RpcError::Call(err.to_string())
}

fn decode_error(err: impl Display) -> RpcError {
    RpcError::Decode(err.to_string())
}

/// Dial the chat service described by `rpc` over HTTP.
///
/// Nothing is sent until the first call; the connection is established lazily
/// by the transport.
pub fn connect(rpc: &RpcConfig) -> ChatResult<impl ChatApi> {
    let url = rpc.server_url();
    let uri: Uri = url
        .parse()
        .map_err(|err| ChatError::Connect(format!("invalid server url {}: {}", url, err)))?;
    let transport = Hyper::new(uri).map_err(|err| ChatError::Connect(err.to_string()))?;

    let log_response = ModifyLayer::new_response(|resp: &mut BoxResponse| {
        debug!(
            status = ?resp.extensions().get::<StatusCode>(),
            "received response"
        )
    });
    let generic_client = Client::new(transport).layer(log_response);
    debug!(%url, "created chat client");

    Ok(ChatClient::new_inner(generic_client))
}
