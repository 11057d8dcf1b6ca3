use super::request::{ChatRequest, ImageRequest, TranscriptionRequest, VideoRequest, WebSearchRequest};
use super::response::{
    ChatResponse, ImageResponse, Transcription, VideoResult, VideoTask, WebSearchResponse,
};
use super::stream::{self, ChatStream, StreamedChat, TranscriptionStream};
use super::ToolChoice;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::media;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

const CHAT_PATH: &str = "chat/completions";
const IMAGES_PATH: &str = "images/generations";
const VIDEOS_PATH: &str = "videos/generations";
const ASYNC_RESULT_PATH: &str = "async-result";
const TRANSCRIPTIONS_PATH: &str = "audio/transcriptions";
const WEB_SEARCH_PATH: &str = "web_search";

#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
    client: reqwest::Client,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(env!("CARGO_CRATE_NAME"));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            config,
            client: builder.build()?,
        })
    }

    /// Builds a client from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let request = self.prepare_chat(request, false);
        debug!(messages = request.messages.len(), "sending chat completion");

        let response = self.send(self.post(CHAT_PATH).json(&request)).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn stream_chat(&self, request: ChatRequest) -> Result<ChatStream> {
        let request = self.prepare_chat(request, true);
        debug!(messages = request.messages.len(), "sending streaming chat completion");

        let response = self.send(self.post(CHAT_PATH).json(&request)).await?;
        Ok(stream::spawn_sse(response))
    }

    /// Streams a chat to completion and folds the chunks, concatenating tool
    /// call arguments by index.
    pub async fn stream_chat_collect(&self, request: ChatRequest) -> Result<StreamedChat> {
        let stream = self.stream_chat(request).await?;
        StreamedChat::collect(stream).await
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn generate_image(&self, request: ImageRequest) -> Result<ImageResponse> {
        let response = self.send(self.post(IMAGES_PATH).json(&request)).await?;
        Ok(response.json().await?)
    }

    /// Submits a video generation job. The result is fetched with
    /// [`Client::retrieve_video_result`] or [`Client::wait_for_video`].
    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn generate_video(&self, request: VideoRequest) -> Result<VideoTask> {
        let response = self.send(self.post(VIDEOS_PATH).json(&request)).await?;
        let task: VideoTask = response.json().await?;
        info!(id = %task.id, "video generation job submitted");
        Ok(task)
    }

    pub async fn retrieve_video_result(&self, id: &str) -> Result<VideoResult> {
        let url = self.endpoint(&format!("{ASYNC_RESULT_PATH}/{id}"));
        let builder = self
            .client
            .get(url)
            .bearer_auth(self.config.api_key());
        Ok(self.send(builder).await?.json().await?)
    }

    /// Polls a video job until it succeeds, fails, or `max_wait` has elapsed.
    /// On timeout the last (still processing) result is returned.
    #[tracing::instrument(skip(self))]
    pub async fn wait_for_video(
        &self,
        id: &str,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Result<VideoResult> {
        let started = Instant::now();
        loop {
            let result = self.retrieve_video_result(id).await?;
            if result.task_status.is_finished() {
                info!(status = ?result.task_status, "video generation finished");
                return Ok(result);
            }
            if started.elapsed() >= max_wait {
                info!(elapsed = ?started.elapsed(), "stopped waiting for video generation");
                return Ok(result);
            }
            debug!(elapsed = ?started.elapsed(), "video still processing");
            tokio::time::sleep(poll_interval).await;
        }
    }

    #[tracing::instrument(skip(self, request), fields(file = %request.file.display()))]
    pub async fn transcribe(&self, request: TranscriptionRequest) -> Result<Transcription> {
        let form = transcription_form(&request, false)?;
        let response = self
            .send(self.post(TRANSCRIPTIONS_PATH).multipart(form))
            .await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, request), fields(file = %request.file.display()))]
    pub async fn stream_transcription(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionStream> {
        let form = transcription_form(&request, true)?;
        let response = self
            .send(self.post(TRANSCRIPTIONS_PATH).multipart(form))
            .await?;
        Ok(stream::spawn_sse(response))
    }

    #[tracing::instrument(skip(self, request), fields(query = %request.search_query))]
    pub async fn web_search(&self, mut request: WebSearchRequest) -> Result<WebSearchResponse> {
        request.count = request.count.min(WebSearchRequest::MAX_COUNT);
        let response = self.send(self.post(WEB_SEARCH_PATH).json(&request)).await?;
        Ok(response.json().await?)
    }

    /// Fills in the configured defaults. A request that sets `top_p` keeps the
    /// temperature unset, the two are not meant to be combined.
    fn prepare_chat(&self, mut request: ChatRequest, stream: bool) -> ChatRequest {
        request.stream = stream;
        if request.temperature.is_none() && request.top_p.is_none() {
            request.temperature = Some(self.config.temperature());
        }
        if request.max_tokens.is_none() {
            request.max_tokens = Some(self.config.max_tokens());
        }
        if request.tools.is_empty() {
            request.tool_choice = None;
            request.tool_stream = None;
        } else {
            request.tool_choice.get_or_insert_with(ToolChoice::auto);
            if !stream {
                request.tool_stream = None;
            }
        }
        request
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{base}/{path}",
            base = self.config.base_url().trim_end_matches('/'),
        )
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .bearer_auth(self.config.api_key())
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error body: {}", e));
            return Err(Error::RemoteService { status, message });
        }

        Ok(response)
    }
}

fn transcription_form(request: &TranscriptionRequest, stream: bool) -> Result<Form> {
    let audio = media::load_audio(&request.file)?;
    debug!(?audio, "uploading audio");

    let part = Part::bytes(audio.bytes)
        .file_name(audio.file_name)
        .mime_str(audio.mime_type)?;

    let mut form = Form::new()
        .part("file", part)
        .text("model", request.model.clone())
        .text("stream", stream.to_string());
    if let Some(language) = &request.language {
        form = form.text("language", language.clone());
    }
    Ok(form)
}
