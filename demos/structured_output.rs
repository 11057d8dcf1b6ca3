//! JSON mode: the model answers with a single JSON object.

use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use zai::config::models;
use zai::v4::request::ChatRequest;
use zai::v4::rest::Client;
use zai::v4::{Message, ResponseFormat};

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Schema {
    Product,
    Character,
    Event,
}

impl Schema {
    fn prompt(self) -> &'static str {
        match self {
            Schema::Product => "Generate a product listing for a high-end wireless headphone.",
            Schema::Character => {
                "Create a fictional character profile for a detective in a mystery novel."
            }
            Schema::Event => "Generate details for a tech conference event.",
        }
    }

    fn fields(self) -> &'static str {
        match self {
            Schema::Product => "name, brand, price, features (array), specifications (object)",
            Schema::Character => "name, age, occupation, personality_traits (array), backstory",
            Schema::Event => "name, date, location, speakers (array), topics (array), ticket_price",
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Ask for a JSON object and pretty-print it")]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Schema::Product)]
    schema: Schema,
    /// Overrides the built-in prompt of the chosen schema.
    #[arg(short, long)]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Structured output", models::LLM);

    let prompt = cli.prompt.as_deref().unwrap_or(cli.schema.prompt());
    println!("Prompt: {prompt}\n");
    let request = ChatRequest::new(
        models::LLM,
        vec![Message::user(format!(
            "{prompt}\n\nRespond with a JSON object containing: {}.",
            cli.schema.fields()
        ))],
    )
    .with_response_format(ResponseFormat::JsonObject);

    let response = client.chat(request).await?;
    let content = response.content().unwrap_or_default();

    match serde_json::from_str::<serde_json::Value>(strip_fence(content)) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(e) => {
            eprintln!("answer is not valid JSON ({e}), raw answer follows");
            println!("{content}");
        }
    }
    Ok(())
}

/// Some answers still wrap the object in a Markdown code fence.
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches("json")
            .trim_end_matches("```")
            .trim(),
        None => trimmed,
    }
}
