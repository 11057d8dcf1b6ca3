//! Asks the vision model about a video. Only remote URLs are accepted.

use clap::Parser;
use std::process::ExitCode;
use zai::config::{models, samples};
use zai::dispatch::{Task, VisionRequest};
use zai::v4::rest::Client;

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Summarise a video with the vision model")]
struct Cli {
    /// Video URL.
    #[arg(short, long, default_value = samples::VIDEO)]
    url: String,
    #[arg(
        short,
        long,
        default_value = "Describe what happens in this video, step by step."
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
    utils::banner("Video understanding", models::VLM);
    println!("Video: {}\n", cli.url);

    let request = VisionRequest::new(cli.prompt).with_video(cli.url);
    let output = client.dispatch(Task::Vision(request)).await?;
    println!("{}", output.text().unwrap_or_default());
    Ok(())
}
