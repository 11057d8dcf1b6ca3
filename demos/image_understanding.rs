//! Asks the vision model about one or more images, given as URLs or local paths.

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tokio_stream::StreamExt;
use zai::config::{models, samples};
use zai::dispatch::{Task, VisionRequest};
use zai::v4::rest::Client;

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Describe an image with the vision model")]
struct Cli {
    /// Image URL or local path. Repeat to compare several images in one request.
    #[arg(short, long)]
    url: Vec<String>,
    #[arg(
        short,
        long,
        default_value = "Describe this image in detail, including any text, objects, and their spatial relationships."
    )]
    prompt: String,
    /// Wait for the complete answer instead of streaming it.
    #[arg(long)]
    no_stream: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Image understanding", models::VLM);
    let urls = if cli.url.is_empty() {
        vec![samples::IMAGES[0].to_string()]
    } else {
        cli.url
    };

    let mut request = VisionRequest::new(cli.prompt);
    for url in urls {
        println!("Image: {url}");
        request = request.with_image(url);
    }
    println!();
    let task = Task::Vision(request);

    if cli.no_stream {
        let output = client.dispatch(task).await?;
        println!("{}", output.text().unwrap_or_default());
        return Ok(());
    }

    let mut stream = client.dispatch_stream(task).await?;
    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        if let Some(text) = chunk?.text() {
            print!("{text}");
            stdout.flush()?;
        }
    }
    println!();
    Ok(())
}
