use derive_new::new;
use derive_setters::Setters;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

pub mod rest;
pub mod stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Message content: either plain text or a list of multimodal parts.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: MediaUrl },
    VideoUrl { video_url: MediaUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: MediaUrl::new(url),
        }
    }

    pub fn video_url(url: impl Into<String>) -> Self {
        ContentPart::VideoUrl {
            video_url: MediaUrl::new(url),
        }
    }
}

#[derive(Clone, PartialEq, Deserialize, Serialize, new)]
pub struct MediaUrl {
    #[new(into)]
    pub url: String,
}

impl std::fmt::Debug for MediaUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.url.split_once(";base64,") {
            Some((prefix, _)) if self.url.starts_with("data:") => f
                .debug_struct("MediaUrl")
                .field("url", &format!("{prefix};base64,[BASE64_DATA_REMOVED_FOR_LOGGING]"))
                .finish(),
            _ => f.debug_struct("MediaUrl").field("url", &self.url).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new, Setters)]
#[setters(prefix = "with_", into, strip_option)]
pub struct Message {
    #[setters(skip)]
    pub role: Role,
    #[setters(skip)]
    #[new(into)]
    pub content: MessageContent,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    #[new(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[new(default)]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// The result of a tool call, sent back to the model.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Tool, content).with_tool_call_id(tool_call_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Thinking {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    Function { function: FunctionDeclaration },
    WebSearch { web_search: WebSearchTool },
}

impl Tool {
    pub fn function(declaration: FunctionDeclaration) -> Self {
        Tool::Function {
            function: declaration,
        }
    }

    pub fn web_search(config: WebSearchTool) -> Self {
        Tool::WebSearch { web_search: config }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new, Setters)]
#[setters(prefix = "with_", into, strip_option)]
pub struct FunctionDeclaration {
    #[setters(skip)]
    #[new(into)]
    pub name: String,
    #[setters(skip)]
    #[new(into)]
    pub description: String,
    /// JSON schema of the arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[new(default)]
    pub parameters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new, Setters)]
#[setters(prefix = "with_", into, strip_option)]
pub struct WebSearchTool {
    #[new(value = "true")]
    pub enable: bool,
    #[new(value = "\"search-prime\".to_string()")]
    pub search_engine: String,
    /// Ask the service to return the search results alongside the answer.
    #[new(value = "true")]
    pub search_result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[new(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(ToolChoiceMode),
    Named(NamedToolChoice),
}

impl ToolChoice {
    pub fn auto() -> Self {
        ToolChoice::Mode(ToolChoiceMode::Auto)
    }

    /// Forces a call to the named function.
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Named(NamedToolChoice {
            kind: FUNCTION_KIND.to_string(),
            function: FunctionName { name: name.into() },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    Auto,
    None,
    Required,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NamedToolChoice {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionName,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionName {
    pub name: String,
}

const FUNCTION_KIND: &str = "function";

fn function_kind() -> String {
    FUNCTION_KIND.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct ToolCall {
    #[serde(default)]
    #[new(into)]
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    #[new(value = "function_kind()")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct FunctionCall {
    #[new(into)]
    pub name: String,
    /// JSON encoded arguments, as produced by the model.
    #[serde(default)]
    #[new(into)]
    pub arguments: String,
}

impl FunctionCall {
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

pub mod request {
    use super::{Message, ResponseFormat, Thinking, Tool, ToolChoice};
    use crate::config::models;
    use derive_new::new;
    use derive_setters::Setters;
    use serde::{Deserialize, Serialize};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Deserialize, Serialize, new, Setters)]
    #[setters(prefix = "with_", into, strip_option)]
    pub struct ChatRequest {
        #[setters(skip)]
        #[new(into)]
        pub(crate) model: String,
        #[setters(skip)]
        #[new(into)]
        pub(crate) messages: Vec<Message>,
        #[setters(skip)]
        #[new(default)]
        pub(crate) stream: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) temperature: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) top_p: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) max_tokens: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) do_sample: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) thinking: Option<Thinking>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        #[new(default)]
        pub(crate) tools: Vec<Tool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) tool_choice: Option<ToolChoice>,
        /// Stream tool call arguments as they are produced. Only sent on streaming requests with tools.
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) tool_stream: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) response_format: Option<ResponseFormat>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) stop: Option<Vec<String>>,
    }

    impl ChatRequest {
        pub fn model(&self) -> &str {
            &self.model
        }

        pub fn messages(&self) -> &[Message] {
            &self.messages
        }

        pub fn push_message(&mut self, message: Message) {
            self.messages.push(message);
        }
    }

    #[derive(Debug, Clone, Deserialize, Serialize, new, Setters)]
    #[setters(prefix = "with_", into, strip_option)]
    pub struct ImageRequest {
        #[setters(skip)]
        #[new(into)]
        pub(crate) prompt: String,
        #[new(value = "models::IMAGE_GEN.to_string()")]
        pub(crate) model: String,
        #[new(value = "\"1024x1024\".to_string()")]
        pub(crate) size: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) quality: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) user_id: Option<String>,
    }

    impl ImageRequest {
        pub fn prompt(&self) -> &str {
            &self.prompt
        }
    }

    /// One source image (image to video) or a start/end frame pair.
    #[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
    #[serde(untagged)]
    pub enum VideoImageInput {
        Single(String),
        Frames(Vec<String>),
    }

    #[derive(Debug, Clone, Deserialize, Serialize, new, Setters)]
    #[setters(prefix = "with_", into, strip_option)]
    pub struct VideoRequest {
        /// May be empty when animating an image without instructions.
        #[serde(skip_serializing_if = "String::is_empty")]
        #[setters(skip)]
        #[new(into)]
        pub(crate) prompt: String,
        #[new(value = "models::VIDEO_GEN.to_string()")]
        pub(crate) model: String,
        /// `quality` or `speed`.
        #[new(value = "\"quality\".to_string()")]
        pub(crate) quality: String,
        #[new(value = "\"1920x1080\".to_string()")]
        pub(crate) size: String,
        #[new(value = "30")]
        pub(crate) fps: u32,
        #[setters(skip)]
        #[new(value = "true")]
        pub(crate) with_audio: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[setters(skip)]
        #[new(default)]
        pub(crate) image_url: Option<VideoImageInput>,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) duration: Option<u32>,
    }

    impl VideoRequest {
        /// Animates a single source image.
        pub fn with_image(mut self, image: impl Into<String>) -> Self {
            self.image_url = Some(VideoImageInput::Single(image.into()));
            self
        }

        /// Generates a transition between a start and an end frame.
        pub fn with_frames(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
            self.image_url = Some(VideoImageInput::Frames(vec![start.into(), end.into()]));
            self
        }

        /// Whether the generated video gets a soundtrack.
        pub fn with_audio(mut self, enabled: bool) -> Self {
            self.with_audio = enabled;
            self
        }

        pub fn image_url(&self) -> Option<&VideoImageInput> {
            self.image_url.as_ref()
        }
    }

    #[derive(Debug, Clone, new, Setters)]
    #[setters(prefix = "with_", into, strip_option)]
    pub struct TranscriptionRequest {
        #[setters(skip)]
        #[new(into)]
        pub(crate) file: PathBuf,
        #[new(value = "models::AUDIO_ASR.to_string()")]
        pub(crate) model: String,
        #[new(default)]
        pub(crate) language: Option<String>,
    }

    impl TranscriptionRequest {
        pub fn file(&self) -> &std::path::Path {
            &self.file
        }
    }

    #[derive(Debug, Clone, Deserialize, Serialize, new, Setters)]
    #[setters(prefix = "with_", into, strip_option)]
    pub struct WebSearchRequest {
        #[setters(skip)]
        #[new(into)]
        pub(crate) search_query: String,
        #[new(value = "\"search-prime\".to_string()")]
        pub(crate) search_engine: String,
        /// Number of results, at most [`WebSearchRequest::MAX_COUNT`].
        #[new(value = "5")]
        pub(crate) count: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[new(default)]
        pub(crate) search_domain_filter: Option<String>,
        /// `oneDay`, `oneWeek`, `oneMonth`, `oneYear` or `noLimit`.
        #[new(value = "\"noLimit\".to_string()")]
        pub(crate) search_recency_filter: String,
    }

    impl WebSearchRequest {
        pub const MAX_COUNT: u32 = 15;
    }
}

pub mod response {
    use super::{Message, MessageContent, Role, ToolCall};
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ChatResponse {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub created: Option<u64>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub choices: Vec<Choice>,
        #[serde(default)]
        pub usage: Option<Usage>,
        /// Search results, when a web search tool was used.
        #[serde(default)]
        pub web_search: Vec<WebSearchResult>,
    }

    impl ChatResponse {
        pub fn message(&self) -> Option<&AssistantMessage> {
            self.choices.first().map(|choice| &choice.message)
        }

        pub fn content(&self) -> Option<&str> {
            self.message()?.content.as_deref()
        }

        pub fn reasoning(&self) -> Option<&str> {
            self.message()?.reasoning_content.as_deref()
        }

        pub fn tool_calls(&self) -> &[ToolCall] {
            self.message()
                .map(|message| message.tool_calls.as_slice())
                .unwrap_or_default()
        }
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Choice {
        #[serde(default)]
        pub index: u32,
        #[serde(default)]
        pub message: AssistantMessage,
        #[serde(default)]
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct AssistantMessage {
        #[serde(default)]
        pub role: Option<Role>,
        #[serde(default)]
        pub content: Option<String>,
        #[serde(default)]
        pub reasoning_content: Option<String>,
        #[serde(default)]
        pub tool_calls: Vec<ToolCall>,
    }

    impl AssistantMessage {
        /// The message as it should be replayed in the next turn of a conversation.
        pub fn to_message(&self) -> Message {
            Message::new(
                Role::Assistant,
                MessageContent::Text(self.content.clone().unwrap_or_default()),
            )
            .with_tool_calls(self.tool_calls.clone())
        }
    }

    #[derive(Debug, Clone, PartialEq, Deserialize, Default)]
    pub struct Usage {
        #[serde(default)]
        pub prompt_tokens: u32,
        #[serde(default)]
        pub completion_tokens: u32,
        #[serde(default)]
        pub total_tokens: u32,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ChatChunk {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub created: Option<u64>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub choices: Vec<ChunkChoice>,
        #[serde(default)]
        pub usage: Option<Usage>,
    }

    impl ChatChunk {
        pub fn delta(&self) -> Option<&Delta> {
            self.choices.first().map(|choice| &choice.delta)
        }

        pub fn content(&self) -> Option<&str> {
            self.delta()?.content.as_deref()
        }

        pub fn reasoning(&self) -> Option<&str> {
            self.delta()?.reasoning_content.as_deref()
        }
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ChunkChoice {
        #[serde(default)]
        pub index: u32,
        #[serde(default)]
        pub delta: Delta,
        #[serde(default)]
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Delta {
        #[serde(default)]
        pub role: Option<Role>,
        #[serde(default)]
        pub content: Option<String>,
        #[serde(default)]
        pub reasoning_content: Option<String>,
        #[serde(default)]
        pub tool_calls: Vec<ToolCallDelta>,
    }

    /// A fragment of a tool call. The first fragment for an index carries the
    /// id and name; later ones only carry more of the arguments.
    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ToolCallDelta {
        #[serde(default)]
        pub index: u32,
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub function: Option<FunctionCallDelta>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct FunctionCallDelta {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub arguments: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct ImageResponse {
        #[serde(default)]
        pub created: Option<u64>,
        #[serde(default)]
        pub data: Vec<ImageData>,
    }

    impl ImageResponse {
        pub fn urls(&self) -> impl Iterator<Item = &str> {
            self.data.iter().map(|image| image.url.as_str())
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ImageData {
        pub url: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TaskStatus {
        #[default]
        Processing,
        Success,
        Fail,
        #[serde(other)]
        Unknown,
    }

    impl TaskStatus {
        pub fn is_finished(self) -> bool {
            matches!(self, TaskStatus::Success | TaskStatus::Fail)
        }
    }

    /// A submitted video generation job.
    #[derive(Debug, Clone, Deserialize)]
    pub struct VideoTask {
        pub id: String,
        #[serde(default)]
        pub request_id: Option<String>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub task_status: TaskStatus,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct VideoResult {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub request_id: Option<String>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub task_status: TaskStatus,
        #[serde(default)]
        pub video_result: Vec<VideoOutput>,
    }

    impl VideoResult {
        pub fn video_url(&self) -> Option<&str> {
            self.video_result.first().map(|video| video.url.as_str())
        }

        pub fn cover_image_url(&self) -> Option<&str> {
            self.video_result
                .first()
                .and_then(|video| video.cover_image_url.as_deref())
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VideoOutput {
        pub url: String,
        #[serde(default)]
        pub cover_image_url: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Transcription {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub model: Option<String>,
        #[serde(default)]
        pub text: String,
        #[serde(default)]
        pub segments: Vec<Segment>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize, Default)]
    pub struct Segment {
        #[serde(default)]
        pub id: Option<u32>,
        #[serde(default)]
        pub start: f64,
        #[serde(default)]
        pub end: f64,
        #[serde(default)]
        pub text: String,
    }

    /// One event of a streamed transcription. `delta` carries new text,
    /// `text` the transcript so far (or the final transcript on the last event).
    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct TranscriptionChunk {
        #[serde(rename = "type", default)]
        pub kind: Option<String>,
        #[serde(default)]
        pub delta: Option<String>,
        #[serde(default)]
        pub text: Option<String>,
        #[serde(default)]
        pub segment: Option<Segment>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct WebSearchResponse {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub created: Option<u64>,
        #[serde(default)]
        pub search_result: Vec<WebSearchResult>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct WebSearchResult {
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub link: String,
        #[serde(default)]
        pub content: String,
        #[serde(default)]
        pub media: Option<String>,
        #[serde(default)]
        pub icon: Option<String>,
        #[serde(default)]
        pub refer: Option<String>,
        #[serde(default)]
        pub publish_date: Option<String>,
    }

    /// Error payload the service sends in place of a result, including inside a stream.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ApiErrorEnvelope {
        pub error: ApiErrorBody,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ApiErrorBody {
        #[serde(default)]
        pub code: Option<serde_json::Value>,
        #[serde(default)]
        pub message: String,
    }
}
