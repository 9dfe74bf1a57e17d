//! The scripted demo: join, send a few messages, read them back, leave.

use std::{future::Future, io::Write, ops::RangeInclusive, time::Duration};

use chat_common::{
    chat::{GetMessagesRequest, GetMessagesResponse, JoinRequest, LeaveRequest, SendRequest},
    endpoints,
};
use rand::Rng;
use tracing::{debug, info, info_span, Instrument};

use crate::{
    api::{ChatApi, MessageStream},
    error::{ChatError, ChatResult, RpcError},
};

/// Name the demo joins the chat with.
pub const USERNAME: &str = "John Doe";

/// How many messages a run may send.
pub const MESSAGE_COUNT: RangeInclusive<usize> = 1..=9;

/// Text of the `seq`th message, counting from 1.
pub fn message_text(seq: usize) -> String {
    format!("Hello! My name is John. This is my {} message", seq)
}

/// Pick how many messages to send.
pub fn random_message_count<R: Rng>(rng: &mut R) -> usize {
    rng.random_range(MESSAGE_COUNT)
}

/// Parameters of one run.
#[derive(Debug, Clone)]
pub struct Script {
    pub username: String,
    pub message_count: usize,
    /// Deadline for each unary call. Reading the message stream is unbounded.
    pub timeout: Duration,
}

impl Script {
    /// Script for [`USERNAME`] with a random message count.
    pub fn random<R: Rng>(rng: &mut R, timeout: Duration) -> Self {
        Self {
            username: USERNAME.to_string(),
            message_count: random_message_count(rng),
            timeout,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub chat_id: String,
    pub sent: Vec<String>,
    pub received: Vec<GetMessagesResponse>,
}

/// Run `script` against `api`, printing streamed messages to `out`.
///
/// Stops at the first failing step; nothing after it is attempted.
pub async fn run<A, W>(api: &mut A, script: &Script, out: &mut W) -> ChatResult<Transcript>
where
    A: ChatApi,
    W: Write,
{
    let chat_id = join(api, script).await?;
    let span = info_span!("chat", %chat_id);

    let (sent, received) = exchange(api, script, &chat_id, out)
        .instrument(span.clone())
        .await?;
    leave(api, script, &chat_id).instrument(span).await?;

    Ok(Transcript {
        chat_id,
        sent,
        received,
    })
}

async fn exchange<A: ChatApi, W: Write>(
    api: &mut A,
    script: &Script,
    chat_id: &str,
    out: &mut W,
) -> ChatResult<(Vec<String>, Vec<GetMessagesResponse>)> {
    let sent = send_all(api, script, chat_id).await?;
    let received = get_messages(api, chat_id, out).await?;
    Ok((sent, received))
}

async fn join<A: ChatApi>(api: &mut A, script: &Script) -> ChatResult<String> {
    let response = with_timeout(
        script.timeout,
        api.join(JoinRequest {
            username: script.username.clone(),
        }),
    )
    .await
    .map_err(ChatError::Join)?;

    info!(
        endpoint = endpoints::JOIN,
        chat_id = %response.chat_id,
        username = %script.username,
        "joined chat"
    );
    Ok(response.chat_id)
}

async fn send_all<A: ChatApi>(
    api: &mut A,
    script: &Script,
    chat_id: &str,
) -> ChatResult<Vec<String>> {
    let mut sent = Vec::with_capacity(script.message_count);

    for seq in 1..=script.message_count {
        let text = message_text(seq);
        let request = SendRequest {
            username: script.username.clone(),
            chat_id: chat_id.to_string(),
            text: text.clone(),
        };

        with_timeout(script.timeout, api.send(request))
            .await
            .map_err(|source| ChatError::Send { seq, source })?;
        debug!(endpoint = endpoints::SEND, seq, "sent message");
        sent.push(text);
    }

    info!(count = sent.len(), "sent messages");
    Ok(sent)
}

async fn get_messages<A: ChatApi, W: Write>(
    api: &mut A,
    chat_id: &str,
    out: &mut W,
) -> ChatResult<Vec<GetMessagesResponse>> {
    let mut messages = api
        .get_messages(GetMessagesRequest {
            chat_id: chat_id.to_string(),
        })
        .await
        .map_err(ChatError::GetMessages)?;
    debug!(endpoint = endpoints::GET_MESSAGES, "opened message stream");

    // Flush per line; log lines go to the same stdout.
    writeln!(out, "Messages:")?;
    out.flush()?;
    let mut received = Vec::new();
    while let Some(message) = messages
        .next_message()
        .await
        .map_err(ChatError::ReceiveMessage)?
    {
        writeln!(out, "'{}' '{}'", message.username, message.text)?;
        out.flush()?;
        received.push(message);
    }

    info!(count = received.len(), "message stream finished");
    Ok(received)
}

async fn leave<A: ChatApi>(api: &mut A, script: &Script, chat_id: &str) -> ChatResult<()> {
    with_timeout(
        script.timeout,
        api.leave(LeaveRequest {
            username: script.username.clone(),
            chat_id: chat_id.to_string(),
        }),
    )
    .await
    .map_err(ChatError::Leave)?;

    info!(endpoint = endpoints::LEAVE, "left chat");
    Ok(())
}

async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| RpcError::Timeout(timeout))?
}
