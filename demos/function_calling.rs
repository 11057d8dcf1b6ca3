//! Function calling: the model picks tools, the demo runs them locally and
//! sends the results back for a final answer.

use clap::Parser;
use serde::Deserialize;
use serde_json::{Value, json};
use std::process::ExitCode;
use zai::config::models;
use zai::v4::request::{ChatRequest, WebSearchRequest};
use zai::v4::rest::Client;
use zai::v4::{FunctionDeclaration, Message, Tool, ToolCall};

#[path = "common/utils.rs"]
mod utils;

const MAX_ROUNDS: usize = 4;

#[derive(Debug, Parser)]
#[command(about = "Let the model call local functions")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "What's the weather in Beijing and what time is it?"
    )]
    query: String,
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
    #[serde(default)]
    unit: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

fn tools() -> Vec<Tool> {
    vec![
        Tool::function(
            FunctionDeclaration::new(
                "get_current_weather",
                "Get real-time weather for a location using web search",
            )
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "The city name, e.g. 'Beijing'"},
                    "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]}
                },
                "required": ["location"]
            })),
        ),
        Tool::function(
            FunctionDeclaration::new("get_current_time", "Get the current date and time")
                .with_parameters(json!({"type": "object", "properties": {}})),
        ),
    ]
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Function calling", models::LLM);
    println!("Query: {}\n", cli.query);

    let mut request =
        ChatRequest::new(models::LLM, vec![Message::user(cli.query)]).with_tools(tools());

    for _ in 0..MAX_ROUNDS {
        let response = client.chat(request.clone()).await?;
        let Some(message) = response.message() else {
            break;
        };
        if message.tool_calls.is_empty() {
            println!("{}", message.content.as_deref().unwrap_or_default());
            return Ok(());
        }

        request.push_message(message.to_message());
        for call in &message.tool_calls {
            println!("-> {}({})", call.function.name, call.function.arguments);
            let result = execute(&client, call).await;
            println!("   {result}");
            request.push_message(Message::tool(&call.id, result.to_string()));
        }
    }
    println!("No final answer after {MAX_ROUNDS} rounds.");
    Ok(())
}

async fn execute(client: &Client, call: &ToolCall) -> Value {
    match call.function.name.as_str() {
        "get_current_weather" => match call.function.parse_arguments::<WeatherArgs>() {
            Ok(args) => weather(client, args).await,
            Err(e) => json!({"error": format!("invalid arguments: {e}")}),
        },
        "get_current_time" => current_time(),
        other => json!({"error": format!("unknown function: {other}")}),
    }
}

async fn weather(client: &Client, args: WeatherArgs) -> Value {
    let request = WebSearchRequest::new(format!("current weather in {} temperature", args.location))
        .with_count(3u32)
        .with_search_recency_filter("oneDay");
    match client.web_search(request).await {
        Ok(response) => {
            let summary: String = response
                .search_result
                .iter()
                .map(|result| result.content.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .chars()
                .take(500)
                .collect();
            json!({
                "location": args.location,
                "unit": args.unit.unwrap_or_else(|| "celsius".to_string()),
                "search_results": summary,
            })
        }
        Err(e) => json!({"location": args.location, "error": e.to_string()}),
    }
}

fn current_time() -> Value {
    let now = chrono::Local::now();
    json!({
        "timezone": now.format("%:z").to_string(),
        "time": now.format("%H:%M:%S").to_string(),
        "date": now.format("%Y-%m-%d").to_string(),
        "day_of_week": now.format("%A").to_string(),
    })
}
