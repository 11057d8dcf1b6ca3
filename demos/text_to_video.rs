//! Video generation: text to video, image to video, or a start/end frame
//! transition. Jobs are asynchronous; the demo polls until the video is ready.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use zai::config::models;
use zai::dispatch::{Output, Task};
use zai::v4::request::VideoRequest;
use zai::v4::response::{TaskStatus, VideoResult};
use zai::v4::rest::Client;

#[path = "common/utils.rs"]
mod utils;

const POLL_INTERVAL: Duration = Duration::from_secs(10);
const MAX_WAIT: Duration = Duration::from_secs(600);

#[derive(Debug, Parser)]
#[command(about = "Generate a video, optionally from source images")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "A butterfly gently lands on a vibrant sunflower, its wings slowly opening and closing in the warm summer breeze."
    )]
    prompt: String,
    /// Source image (URL or local path) to animate, or the start frame with `--end-image`.
    #[arg(short, long)]
    image: Option<String>,
    /// End frame (URL or local path). Requires `--image`.
    #[arg(long, requires = "image")]
    end_image: Option<String>,
    /// `quality` or `speed`.
    #[arg(short, long, default_value = "quality")]
    quality: String,
    #[arg(short, long, default_value = "1920x1080")]
    size: String,
    #[arg(long, default_value_t = 30)]
    fps: u32,
    #[arg(long)]
    no_audio: bool,
    /// Check on an already submitted job instead of starting a new one.
    #[arg(long, value_name = "ID")]
    check: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    utils::init_tracing();
    utils::exit_with(run(Cli::parse()).await)
}

async fn run(cli: Cli) -> zai::Result<()> {
    let client = Client::from_env()?;
    utils::banner("Video generation", models::VIDEO_GEN);

    if let Some(id) = cli.check {
        report(&client.retrieve_video_result(&id).await?);
        return Ok(());
    }

    let mut request = VideoRequest::new(cli.prompt)
        .with_quality(cli.quality)
        .with_size(cli.size)
        .with_fps(cli.fps)
        .with_audio(!cli.no_audio);
    request = match (cli.image, cli.end_image) {
        (Some(start), Some(end)) => request.with_frames(start, end),
        (Some(image), None) => request.with_image(image),
        _ => request,
    };

    let Output::Video(task) = client.dispatch(Task::VideoGeneration(request)).await? else {
        return Ok(());
    };
    println!("Submitted job {}", task.id);

    let result = client.wait_for_video(&task.id, POLL_INTERVAL, MAX_WAIT).await?;
    report(&result);
    if result.task_status == TaskStatus::Processing {
        println!("Still processing. Check again with --check {}", task.id);
    }
    Ok(())
}

fn report(result: &VideoResult) {
    println!("Status: {:?}", result.task_status);
    if let Some(url) = result.video_url() {
        println!("Video: {url}");
    }
    if let Some(cover) = result.cover_image_url() {
        println!("Cover: {cover}");
    }
}
