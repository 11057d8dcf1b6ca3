//! Chat grounded in live web results through the built-in search tool.

use clap::Parser;
use std::process::ExitCode;
use zai::config::models;
use zai::v4::request::ChatRequest;
use zai::v4::rest::Client;
use zai::v4::{Message, Tool, WebSearchTool};

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Answer a question using web search results")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "What are the most notable AI announcements this week?"
    )]
    query: String,
    /// Number of search results the model may use.
    #[arg(short = 'n', long, default_value_t = 5)]
    count: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Web search chat", models::LLM);
    println!("Query: {}\n", cli.query);

    let request = ChatRequest::new(models::LLM, vec![Message::user(cli.query)])
        .with_tools(vec![Tool::web_search(WebSearchTool::new().with_count(cli.count))]);

    let response = client.chat(request).await?;
    println!("{}", response.content().unwrap_or_default());

    if !response.web_search.is_empty() {
        println!("\nSources:");
    }
    for (i, source) in response.web_search.iter().enumerate() {
        match &source.publish_date {
            Some(date) => println!("{}. {} ({date})\n   {}", i + 1, source.title, source.link),
            None => println!("{}. {}\n   {}", i + 1, source.title, source.link),
        }
    }
    Ok(())
}
