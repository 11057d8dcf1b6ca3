//! Text to image.

use clap::Parser;
use std::process::ExitCode;
use zai::config::models;
use zai::dispatch::{Output, Task};
use zai::v4::request::ImageRequest;
use zai::v4::rest::Client;

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Generate an image from a prompt")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "A serene Japanese garden at sunset with cherry blossoms, a wooden bridge over a koi pond, and Mount Fuji in the background. Photorealistic, 8K quality."
    )]
    prompt: String,
    /// `WIDTHxHEIGHT`, e.g. 1024x1024 or 768x1344.
    #[arg(short, long, default_value = "1024x1024")]
    size: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Image generation", models::IMAGE_GEN);

    let request = ImageRequest::new(cli.prompt).with_size(cli.size);
    if let Output::Image(response) = client.dispatch(Task::ImageGeneration(request)).await? {
        for url in response.urls() {
            println!("{url}");
        }
    }
    Ok(())
}
