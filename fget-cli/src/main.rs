use std::{path::PathBuf, process, sync::Arc, thread};

use clap::Parser;
use fget_core::{
    download::DownloadJob,
    downloader::{Downloader, Outcome},
};
use progress::ConsoleProgress;
use tracing::error;
use tracing_subscriber::EnvFilter;

pub mod progress;

/// Fetch a single remote file, using concurrent range requests when the
/// server supports them.
#[derive(Parser)]
#[command(name = "fget", version)]
struct Args {
    /// Target URL
    #[arg(short = 'u', long = "url")]
    url: String,

    /// Directory to save the file into
    #[arg(short = 'p', long = "path", default_value = ".")]
    path: PathBuf,

    /// Number of concurrent connections
    #[arg(short = 'n', long = "concurrency", default_value_t = default_concurrency())]
    concurrency: usize,
}

fn default_concurrency() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let job = DownloadJob::new(args.url, &args.path, args.concurrency);
    let dest = job.dest_path.clone();
    let downloader = Downloader::new(job, Arc::new(ConsoleProgress::new()));

    match downloader.start().await {
        Ok(Outcome::AlreadyPresent) => {
            println!("File already exists, no need to download");
        }
        Ok(Outcome::Completed { bytes }) => {
            println!("Downloaded {bytes} bytes to {}", dest.display());
        }
        Err(e) => {
            error!("download failed: {e}");
            process::exit(1);
        }
    }
}
