//! Streams a chat answer, printing reasoning and content as they arrive.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tokio_stream::StreamExt;
use zai::config::models;
use zai::v4::request::ChatRequest;
use zai::v4::rest::Client;
use zai::v4::stream::StreamedChat;
use zai::v4::{Message, Thinking};

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Stream a chat answer token by token")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "Write a short poem about the Rust borrow checker."
    )]
    prompt: String,
    /// Show the model's reasoning before the answer.
    #[arg(long)]
    thinking: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Streaming chat", models::LLM);

    let thinking = if cli.thinking {
        Thinking::Enabled
    } else {
        Thinking::Disabled
    };
    let request =
        ChatRequest::new(models::LLM, vec![Message::user(cli.prompt)]).with_thinking(thinking);

    let mut stream = client.stream_chat(request).await?;
    let mut chat = StreamedChat::default();
    let mut stdout = std::io::stdout();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(reasoning) = chunk.reasoning() {
            print!("\x1b[2m{reasoning}\x1b[0m");
        }
        if let Some(content) = chunk.content() {
            print!("{content}");
        }
        stdout.flush()?;
        chat.push(&chunk);
    }
    println!();

    if let Some(usage) = chat.usage {
        println!(
            "\n[{} prompt + {} completion tokens]",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
    Ok(())
}
