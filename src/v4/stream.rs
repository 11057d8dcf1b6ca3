//! Server-Sent Events plumbing for streamed responses.
//!
//! A spawned producer reads the HTTP body, splits it into events and forwards
//! parsed items through a bounded channel. The consumer pulls them one at a
//! time from a [`ReceiverStream`]. The stream ends after `data: [DONE]`, at
//! the end of the body, or after the first transport error.

use super::response::{ApiErrorEnvelope, ChatChunk, TranscriptionChunk, Usage};
use super::{FunctionCall, Message, MessageContent, Role, ToolCall};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tokio::sync::mpsc::{Sender, channel};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error};

/// Default channel capacity between the body reader and the consumer.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;
const DONE_MARKER: &str = "[DONE]";

pub type ChatStream = ReceiverStream<Result<ChatChunk>>;
pub type TranscriptionStream = ReceiverStream<Result<TranscriptionChunk>>;

/// Incremental `text/event-stream` decoder. Feed it raw body bytes, get back
/// the `data` payload of every event completed so far.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.feed_line(&String::from_utf8_lossy(&line), &mut events);
        }
        events
    }

    /// Flushes whatever is left once the body has ended.
    pub fn finish(&mut self) -> Option<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.feed_line(&String::from_utf8_lossy(&line), &mut events);
        }
        self.feed_line("", &mut events);
        events.pop()
    }

    fn feed_line(&mut self, line: &str, events: &mut Vec<String>) {
        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
        if line.is_empty() {
            if !self.data.is_empty() {
                events.push(self.data.join("\n"));
                self.data.clear();
            }
        } else if let Some(value) = line.strip_prefix("data:") {
            self.data
                .push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        // `event:`, `id:`, `retry:` and `:` comment lines carry nothing we use.
    }
}

/// Parses one event payload, turning an error envelope into [`Error::RemoteService`].
pub(crate) fn parse_event<T: DeserializeOwned>(event: &str, status: u16) -> Result<T> {
    if let Ok(ApiErrorEnvelope { error }) = serde_json::from_str::<ApiErrorEnvelope>(event) {
        let message = match error.code {
            Some(serde_json::Value::String(code)) => format!("[{code}] {}", error.message),
            Some(code) => format!("[{code}] {}", error.message),
            None => error.message,
        };
        return Err(Error::RemoteService { status, message });
    }
    Ok(serde_json::from_str(event)?)
}

pub(crate) fn spawn_sse<T>(response: reqwest::Response) -> ReceiverStream<Result<T>>
where
    T: DeserializeOwned + Send + 'static,
{
    let (tx, rx) = channel(DEFAULT_CHANNEL_CAPACITY);
    let status = response.status().as_u16();

    tokio::spawn(async move {
        let mut body = std::pin::pin!(response.bytes_stream());
        let mut decoder = SseDecoder::default();

        while let Some(bytes) = body.next().await {
            let bytes = match bytes {
                Ok(bytes) => bytes,
                Err(e) => {
                    let _ = tx.send(Err(Error::from(e))).await;
                    return;
                }
            };
            for event in decoder.push(&bytes) {
                if !forward(&tx, &event, status).await {
                    return;
                }
            }
        }

        if let Some(event) = decoder.finish() {
            forward(&tx, &event, status).await;
        }
        debug!("event stream ended without a done marker");
    });

    ReceiverStream::new(rx)
}

/// Returns `false` once the stream is complete or nobody is listening anymore.
async fn forward<T: DeserializeOwned>(
    tx: &Sender<Result<T>>,
    event: &str,
    status: u16,
) -> bool {
    if event.trim() == DONE_MARKER {
        debug!("event stream done");
        return false;
    }
    let item = parse_event(event, status);
    if let Err(e) = &item {
        error!("failed to decode stream event: {}", e);
    }
    tx.send(item).await.is_ok()
}

/// A streamed chat folded back into a complete answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamedChat {
    pub content: String,
    pub reasoning: String,
    /// Tool calls by their stream index, with arguments concatenated across chunks.
    pub tool_calls: BTreeMap<u32, ToolCall>,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl StreamedChat {
    pub fn push(&mut self, chunk: &ChatChunk) {
        if let Some(usage) = &chunk.usage {
            self.usage = Some(usage.clone());
        }

        let Some(choice) = chunk.choices.first() else {
            return;
        };
        let delta = &choice.delta;

        if let Some(reasoning) = &delta.reasoning_content {
            self.reasoning.push_str(reasoning);
        }
        if let Some(content) = &delta.content {
            self.content.push_str(content);
        }

        for call in &delta.tool_calls {
            let function = call.function.clone().unwrap_or_default();
            match self.tool_calls.entry(call.index) {
                Entry::Vacant(slot) => {
                    slot.insert(ToolCall::new(
                        call.id.clone().unwrap_or_default(),
                        FunctionCall::new(
                            function.name.unwrap_or_default(),
                            function.arguments.unwrap_or_default(),
                        ),
                    ));
                }
                Entry::Occupied(mut slot) => {
                    if let Some(arguments) = function.arguments {
                        slot.get_mut().function.arguments.push_str(&arguments);
                    }
                }
            }
        }

        if choice.finish_reason.is_some() {
            self.finish_reason = choice.finish_reason.clone();
        }
    }

    /// Drains a chat stream to the end. The first error aborts collection.
    pub async fn collect<S>(mut stream: S) -> Result<Self>
    where
        S: Stream<Item = Result<ChatChunk>> + Unpin,
    {
        let mut chat = Self::default();
        while let Some(chunk) = stream.next().await {
            chat.push(&chunk?);
        }
        Ok(chat)
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.tool_calls.values().cloned().collect()
    }

    /// The assistant turn to append to the conversation history.
    pub fn to_message(&self) -> Message {
        Message::new(Role::Assistant, MessageContent::Text(self.content.clone()))
            .with_tool_calls(self.tool_calls())
    }
}
