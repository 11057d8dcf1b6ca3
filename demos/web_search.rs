//! Standalone web search.

use clap::Parser;
use std::process::ExitCode;
use zai::v4::request::WebSearchRequest;
use zai::v4::rest::Client;

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Search the web through the API")]
struct Cli {
    #[arg(short, long, default_value = "latest developments in the Rust programming language")]
    query: String,
    /// Number of results, capped at 15.
    #[arg(short = 'n', long, default_value_t = 5)]
    count: u32,
    /// Restrict results to one domain.
    #[arg(short, long)]
    domain: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Web search", "search-prime");

    let mut request = WebSearchRequest::new(cli.query).with_count(cli.count);
    if let Some(domain) = cli.domain {
        request = request.with_search_domain_filter(domain);
    }

    let response = client.web_search(request).await?;
    if response.search_result.is_empty() {
        println!("No results.");
    }
    for (i, result) in response.search_result.iter().enumerate() {
        println!("{}. {}\n   {}", i + 1, result.title, result.link);
        if let Some(date) = &result.publish_date {
            println!("   {date}");
        }
        let summary: String = result.content.chars().take(200).collect();
        println!("   {summary}\n");
    }
    Ok(())
}
