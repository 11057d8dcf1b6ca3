//! One entry point for every modality.
//!
//! A [`Task`] carries the parameters of a single call. [`Client::dispatch`]
//! waits for the complete result, [`Client::dispatch_stream`] hands back the
//! partial results as they arrive. Media references are resolved before any
//! request is built, so bad local inputs never reach the network.

use crate::config::models;
use crate::error::{Error, Result};
use crate::media;
use crate::v4::request::{ChatRequest, ImageRequest, TranscriptionRequest, VideoImageInput, VideoRequest};
use crate::v4::response::{ChatChunk, ChatResponse, ImageResponse, Transcription, TranscriptionChunk, VideoTask};
use crate::v4::rest::Client;
use crate::v4::stream::{ChatStream, TranscriptionStream};
use crate::v4::{ContentPart, Message, Thinking};
use derive_new::new;
use derive_setters::Setters;
use std::fmt::{Display, Formatter};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::Stream;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Chat,
    Vision,
    ImageGeneration,
    VideoGeneration,
    Transcription,
}

impl Modality {
    pub fn is_streamable(self) -> bool {
        matches!(
            self,
            Modality::Chat | Modality::Vision | Modality::Transcription
        )
    }
}

impl Display for Modality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Modality::Chat => "chat",
            Modality::Vision => "vision",
            Modality::ImageGeneration => "image generation",
            Modality::VideoGeneration => "video generation",
            Modality::Transcription => "transcription",
        };
        f.write_str(name)
    }
}

/// A question about one or more images and videos. Inputs may be URLs or, for
/// images only, local paths.
#[derive(Debug, Clone, new, Setters)]
#[setters(prefix = "with_", into, strip_option)]
pub struct VisionRequest {
    #[setters(skip)]
    #[new(into)]
    prompt: String,
    #[new(value = "models::VLM.to_string()")]
    model: String,
    #[setters(skip)]
    #[new(default)]
    images: Vec<String>,
    #[setters(skip)]
    #[new(default)]
    videos: Vec<String>,
    #[new(default)]
    system: Option<String>,
    #[new(value = "Some(Thinking::Enabled)")]
    thinking: Option<Thinking>,
    #[new(default)]
    temperature: Option<f32>,
    #[new(default)]
    max_tokens: Option<u32>,
}

impl VisionRequest {
    pub fn with_image(mut self, input: impl Into<String>) -> Self {
        self.images.push(input.into());
        self
    }

    pub fn with_video(mut self, input: impl Into<String>) -> Self {
        self.videos.push(input.into());
        self
    }

    /// Resolves every media input and builds the chat payload. Videos are
    /// checked first: a local video path fails before any file is read.
    pub fn into_chat_request(self) -> Result<ChatRequest> {
        if self.images.is_empty() && self.videos.is_empty() {
            return Err(Error::unsupported(
                "a vision request needs at least one image or video",
            ));
        }

        let mut parts = Vec::with_capacity(self.images.len() + self.videos.len() + 1);
        for video in &self.videos {
            parts.push(ContentPart::video_url(media::load_video(video)?));
        }
        for image in &self.images {
            parts.push(ContentPart::image_url(media::load_image(image)?));
        }
        parts.push(ContentPart::text(self.prompt));

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(parts));

        let mut request = ChatRequest::new(self.model, messages);
        request.thinking = self.thinking;
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        Ok(request)
    }
}

#[derive(Debug, Clone)]
pub enum Task {
    Chat(ChatRequest),
    Vision(VisionRequest),
    ImageGeneration(ImageRequest),
    VideoGeneration(VideoRequest),
    Transcription(TranscriptionRequest),
}

impl Task {
    pub fn modality(&self) -> Modality {
        match self {
            Task::Chat(_) => Modality::Chat,
            Task::Vision(_) => Modality::Vision,
            Task::ImageGeneration(_) => Modality::ImageGeneration,
            Task::VideoGeneration(_) => Modality::VideoGeneration,
            Task::Transcription(_) => Modality::Transcription,
        }
    }
}

impl From<ChatRequest> for Task {
    fn from(request: ChatRequest) -> Self {
        Task::Chat(request)
    }
}

impl From<VisionRequest> for Task {
    fn from(request: VisionRequest) -> Self {
        Task::Vision(request)
    }
}

impl From<ImageRequest> for Task {
    fn from(request: ImageRequest) -> Self {
        Task::ImageGeneration(request)
    }
}

impl From<VideoRequest> for Task {
    fn from(request: VideoRequest) -> Self {
        Task::VideoGeneration(request)
    }
}

impl From<TranscriptionRequest> for Task {
    fn from(request: TranscriptionRequest) -> Self {
        Task::Transcription(request)
    }
}

#[derive(Debug, Clone)]
pub enum Output {
    /// Chat and vision answers.
    Chat(ChatResponse),
    Image(ImageResponse),
    /// Video generation is asynchronous: this is the submitted job.
    Video(VideoTask),
    Transcription(Transcription),
}

impl Output {
    pub fn text(&self) -> Option<&str> {
        match self {
            Output::Chat(response) => response.content(),
            Output::Transcription(transcription) => Some(&transcription.text),
            Output::Image(_) | Output::Video(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Chunk {
    Chat(ChatChunk),
    Transcription(TranscriptionChunk),
}

impl Chunk {
    /// The new text this chunk adds.
    pub fn text(&self) -> Option<&str> {
        match self {
            Chunk::Chat(chunk) => chunk.content(),
            Chunk::Transcription(chunk) => chunk.delta.as_deref(),
        }
    }
}

/// Partial results of a streamed task, pulled one at a time.
#[derive(Debug)]
pub enum ChunkStream {
    Chat(ChatStream),
    Transcription(TranscriptionStream),
}

impl Stream for ChunkStream {
    type Item = Result<Chunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.get_mut() {
            ChunkStream::Chat(stream) => Pin::new(stream)
                .poll_next(cx)
                .map(|item| item.map(|chunk| chunk.map(Chunk::Chat))),
            ChunkStream::Transcription(stream) => Pin::new(stream)
                .poll_next(cx)
                .map(|item| item.map(|chunk| chunk.map(Chunk::Transcription))),
        }
    }
}

impl Client {
    /// Runs a task and waits for its complete result.
    #[tracing::instrument(skip(self, task), fields(modality = %task.modality()))]
    pub async fn dispatch(&self, task: Task) -> Result<Output> {
        match task {
            Task::Chat(request) => {
                require_messages(&request)?;
                Ok(Output::Chat(self.chat(request).await?))
            }
            Task::Vision(request) => Ok(Output::Chat(
                self.chat(request.into_chat_request()?).await?,
            )),
            Task::ImageGeneration(request) => {
                if request.prompt().trim().is_empty() {
                    return Err(Error::unsupported("image generation needs a prompt"));
                }
                Ok(Output::Image(self.generate_image(request).await?))
            }
            Task::VideoGeneration(request) => Ok(Output::Video(
                self.generate_video(resolve_video_frames(request)?).await?,
            )),
            Task::Transcription(request) => {
                Ok(Output::Transcription(self.transcribe(request).await?))
            }
        }
    }

    /// Runs a task in streaming mode. Only chat, vision and transcription
    /// stream; the other modalities fail before anything is sent.
    #[tracing::instrument(skip(self, task), fields(modality = %task.modality()))]
    pub async fn dispatch_stream(&self, task: Task) -> Result<ChunkStream> {
        let modality = task.modality();
        if !modality.is_streamable() {
            return Err(not_streamable(modality));
        }

        match task {
            Task::Chat(request) => {
                require_messages(&request)?;
                Ok(ChunkStream::Chat(self.stream_chat(request).await?))
            }
            Task::Vision(request) => Ok(ChunkStream::Chat(
                self.stream_chat(request.into_chat_request()?).await?,
            )),
            Task::Transcription(request) => Ok(ChunkStream::Transcription(
                self.stream_transcription(request).await?,
            )),
            Task::ImageGeneration(_) | Task::VideoGeneration(_) => Err(not_streamable(modality)),
        }
    }
}

fn not_streamable(modality: Modality) -> Error {
    Error::unsupported(format!("{modality} does not support streaming"))
}

fn require_messages(request: &ChatRequest) -> Result<()> {
    if request.messages().is_empty() {
        return Err(Error::unsupported("a chat request needs at least one message"));
    }
    Ok(())
}

/// Source and start/end frames may be local images; they are embedded before submission.
fn resolve_video_frames(mut request: VideoRequest) -> Result<VideoRequest> {
    request.image_url = match request.image_url.take() {
        Some(VideoImageInput::Single(image)) => {
            Some(VideoImageInput::Single(media::load_image(&image)?))
        }
        Some(VideoImageInput::Frames(frames)) => Some(VideoImageInput::Frames(
            frames
                .iter()
                .map(|frame| media::load_image(frame))
                .collect::<Result<_>>()?,
        )),
        None => None,
    };
    if request.prompt.trim().is_empty() && request.image_url.is_none() {
        return Err(Error::unsupported(
            "video generation needs a prompt or a source image",
        ));
    }
    debug!(frames = ?request.image_url.as_ref().map(frame_count), "video request resolved");
    Ok(request)
}

fn frame_count(input: &VideoImageInput) -> usize {
    match input {
        VideoImageInput::Single(_) => 1,
        VideoImageInput::Frames(frames) => frames.len(),
    }
}
