//! Single-turn chat completion.

use clap::Parser;
use std::process::ExitCode;
use zai::config::models;
use zai::dispatch::Task;
use zai::v4::request::ChatRequest;
use zai::v4::rest::Client;
use zai::v4::{Message, Thinking};

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Ask the chat model a single question")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "Explain quantum computing in simple terms, as if teaching a curious teenager."
    )]
    prompt: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Basic chat", models::LLM);
    println!("Prompt: {}\n", cli.prompt);

    let request = ChatRequest::new(
        models::LLM,
        vec![
            Message::system("You are a helpful AI assistant."),
            Message::user(cli.prompt),
        ],
    )
    .with_thinking(Thinking::Disabled);

    let output = client.dispatch(Task::Chat(request)).await?;
    println!("{}", output.text().unwrap_or_default());
    Ok(())
}
