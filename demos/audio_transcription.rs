//! Speech to text from a local audio file (at most 25 MB).

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_stream::StreamExt;
use zai::config::models;
use zai::dispatch::Task;
use zai::v4::request::TranscriptionRequest;
use zai::v4::rest::Client;

#[path = "common/utils.rs"]
mod utils;

#[derive(Debug, Parser)]
#[command(about = "Transcribe an audio file")]
struct Cli {
    /// Local audio file (mp3, wav, m4a, flac, ogg, webm).
    #[arg(short, long)]
    file: PathBuf,
    /// Language hint, e.g. `en` or `zh`.
    #[arg(short, long)]
    language: Option<String>,
    /// Print the transcript as it is produced.
    #[arg(long)]
    stream: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Audio transcription", models::AUDIO_ASR);

    let mut request = TranscriptionRequest::new(cli.file);
    if let Some(language) = cli.language {
        request = request.with_language(language);
    }
    let task = Task::Transcription(request);

    if !cli.stream {
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
