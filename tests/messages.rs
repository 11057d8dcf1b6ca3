use serde_json::json;
use zai::v4::request::{ChatRequest, ImageRequest, VideoRequest, WebSearchRequest};
use zai::v4::response::{ChatChunk, ChatResponse, TaskStatus, Transcription, VideoResult};
use zai::v4::{
    ContentPart, FunctionDeclaration, Message, MediaUrl, ResponseFormat, Thinking, Tool,
    ToolChoice, WebSearchTool,
};

#[test]
fn text_message_serializes_as_string_content() {
    let json = serde_json::to_value(Message::user("hi")).expect("serialize");
    assert_eq!(json, json!({"role": "user", "content": "hi"}));
}

#[test]
fn multimodal_message_serializes_parts() {
    let message = Message::user(vec![
        ContentPart::image_url("https://example.test/a.png"),
        ContentPart::video_url("https://example.test/b.mp4"),
        ContentPart::text("describe"),
    ]);
    let json = serde_json::to_value(&message).expect("serialize");
    assert_eq!(json["content"][0]["type"], "image_url");
    assert_eq!(json["content"][0]["image_url"]["url"], "https://example.test/a.png");
    assert_eq!(json["content"][1]["type"], "video_url");
    assert_eq!(json["content"][1]["video_url"]["url"], "https://example.test/b.mp4");
    assert_eq!(json["content"][2], json!({"type": "text", "text": "describe"}));
}

#[test]
fn tool_message_carries_call_id() {
    let json = serde_json::to_value(Message::tool("call_1", "{\"ok\":true}")).unwrap();
    assert_eq!(json["role"], "tool");
    assert_eq!(json["tool_call_id"], "call_1");
    assert!(json.get("tool_calls").is_none());
}

#[test]
fn chat_request_serializes_optional_fields() {
    let request = ChatRequest::new("glm-4.7", vec![Message::user("hi")])
        .with_thinking(Thinking::Enabled)
        .with_response_format(ResponseFormat::JsonObject)
        .with_max_tokens(10u32);
    let json = serde_json::to_value(&request).expect("serialize");
    assert_eq!(json["model"], "glm-4.7");
    assert_eq!(json["stream"], false);
    assert_eq!(json["thinking"], json!({"type": "enabled"}));
    assert_eq!(json["response_format"], json!({"type": "json_object"}));
    assert_eq!(json["max_tokens"], 10);
    assert!(json.get("temperature").is_none());
    assert!(json.get("tools").is_none());
}

#[test]
fn tools_and_tool_choice_serialize() {
    let request = ChatRequest::new("glm-4.7", vec![Message::user("weather?")])
        .with_tools(vec![
            Tool::function(
                FunctionDeclaration::new("get_weather", "Current weather for a city")
                    .with_parameters(json!({"type": "object", "properties": {"city": {"type": "string"}}})),
            ),
            Tool::web_search(WebSearchTool::new().with_count(5u32)),
        ])
        .with_tool_choice(ToolChoice::function("get_weather"));
    let json = serde_json::to_value(&request).expect("serialize");

    assert_eq!(json["tools"][0]["type"], "function");
    assert_eq!(json["tools"][0]["function"]["name"], "get_weather");
    assert_eq!(json["tools"][1]["type"], "web_search");
    assert_eq!(json["tools"][1]["web_search"]["search_engine"], "search-prime");
    assert_eq!(json["tools"][1]["web_search"]["count"], 5);
    assert_eq!(
        json["tool_choice"],
        json!({"type": "function", "function": {"name": "get_weather"}})
    );
    assert_eq!(serde_json::to_value(ToolChoice::auto()).unwrap(), json!("auto"));
}

#[test]
fn generation_requests_use_defaults() {
    let image = serde_json::to_value(ImageRequest::new("a koi pond")).unwrap();
    assert_eq!(image["model"], "cogView-4-250304");
    assert_eq!(image["size"], "1024x1024");
    assert!(image.get("quality").is_none());

    let video = serde_json::to_value(
        VideoRequest::new("a butterfly").with_frames("https://a.test/1.png", "https://a.test/2.png"),
    )
    .unwrap();
    assert_eq!(video["model"], "cogvideox-3");
    assert_eq!(video["fps"], 30);
    assert_eq!(video["with_audio"], true);
    assert_eq!(video["image_url"], json!(["https://a.test/1.png", "https://a.test/2.png"]));

    let animate = serde_json::to_value(VideoRequest::new("").with_image("https://a.test/1.png")).unwrap();
    assert!(animate.get("prompt").is_none());
    assert_eq!(animate["image_url"], "https://a.test/1.png");

    let silent = serde_json::to_value(VideoRequest::new("rain").with_audio(false)).unwrap();
    assert_eq!(silent["with_audio"], false);

    let search = serde_json::to_value(WebSearchRequest::new("rust")).unwrap();
    assert_eq!(search["search_engine"], "search-prime");
    assert_eq!(search["search_recency_filter"], "noLimit");
}

#[test]
fn data_urls_are_redacted_in_debug_output() {
    let url = MediaUrl::new("data:image/png;base64,AAAAAAAA");
    let printed = format!("{:?}", url);
    assert!(printed.contains("data:image/png;base64,"));
    assert!(!printed.contains("AAAAAAAA"));
}

#[test]
fn chat_response_deserializes() {
    let data = json!({
        "id": "chat-1",
        "created": 1700000000,
        "model": "glm-4.7",
        "choices": [{
            "index": 0,
            "finish_reason": "tool_calls",
            "message": {
                "role": "assistant",
                "content": "",
                "reasoning_content": "thinking...",
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "get_weather", "arguments": "{\"city\":\"Paris\"}"}
                }]
            }
        }],
        "usage": {"prompt_tokens": 5, "completion_tokens": 10, "total_tokens": 15}
    });
    let response: ChatResponse = serde_json::from_value(data).unwrap();
    assert_eq!(response.reasoning(), Some("thinking..."));
    assert_eq!(response.tool_calls().len(), 1);
    assert_eq!(response.usage.as_ref().map(|u| u.total_tokens), Some(15));

    #[derive(serde::Deserialize)]
    struct Args {
        city: String,
    }
    let args: Args = response.tool_calls()[0].function.parse_arguments().unwrap();
    assert_eq!(args.city, "Paris");

    let replay = serde_json::to_value(response.message().unwrap().to_message()).unwrap();
    assert_eq!(replay["role"], "assistant");
    assert_eq!(replay["tool_calls"][0]["id"], "call_1");
}

#[test]
fn chat_response_carries_web_search_results() {
    let response: ChatResponse = serde_json::from_value(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "Rust 1.90 is out."}}],
        "web_search": [{
            "title": "Announcing Rust 1.90",
            "link": "https://blog.rust-lang.org/",
            "content": "The Rust team is happy to announce a new version.",
            "media": "Rust Blog",
            "publish_date": "2025-09-18"
        }]
    }))
    .unwrap();

    assert_eq!(response.content(), Some("Rust 1.90 is out."));
    assert_eq!(response.web_search.len(), 1);
    let result = &response.web_search[0];
    assert_eq!(result.title, "Announcing Rust 1.90");
    assert_eq!(result.link, "https://blog.rust-lang.org/");
    assert!(result.content.starts_with("The Rust team"));
    assert_eq!(result.media.as_deref(), Some("Rust Blog"));
    assert_eq!(result.publish_date.as_deref(), Some("2025-09-18"));
    assert!(result.icon.is_none());
}

#[test]
fn chunk_deserializes_tool_call_fragments() {
    let data = json!({
        "id": "c",
        "choices": [{
            "index": 0,
            "delta": {
                "tool_calls": [{"index": 0, "function": {"arguments": "\"Par"}}]
            }
        }]
    });
    let chunk: ChatChunk = serde_json::from_value(data).unwrap();
    assert!(chunk.content().is_none());
    let delta = chunk.delta().unwrap();
    assert_eq!(delta.tool_calls[0].index, 0);
    assert!(delta.tool_calls[0].id.is_none());
}

#[test]
fn video_result_and_transcription_deserialize() {
    let result: VideoResult = serde_json::from_value(json!({
        "model": "cogvideox-3",
        "task_status": "SUCCESS",
        "video_result": [{"url": "https://v.test/out.mp4", "cover_image_url": "https://v.test/out.png"}]
    }))
    .unwrap();
    assert_eq!(result.task_status, TaskStatus::Success);
    assert!(result.task_status.is_finished());
    assert_eq!(result.video_url(), Some("https://v.test/out.mp4"));
    assert_eq!(result.cover_image_url(), Some("https://v.test/out.png"));

    let odd: VideoResult = serde_json::from_value(json!({"task_status": "QUEUED"})).unwrap();
    assert_eq!(odd.task_status, TaskStatus::Unknown);

    let transcription: Transcription = serde_json::from_value(json!({
        "text": "hello world",
        "segments": [{"id": 0, "start": 0.0, "end": 1.5, "text": "hello world"}]
    }))
    .unwrap();
    assert_eq!(transcription.segments.len(), 1);
    assert_eq!(transcription.segments[0].end, 1.5);
}
