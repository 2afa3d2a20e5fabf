use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Cut postage stamps from a FITS image as described by a JSON job document.
#[derive(Parser, Debug)]
#[command(name = "fitstamp", version, about)]
struct Args {
    /// Input job document (JSON)
    job: PathBuf,
    /// Output result document (JSON)
    result: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    // Per-request failures land in the result document, not the exit code.
    let report = fitstamp_cutout::batch::run(&args.job, &args.result)?;
    eprintln!(
        "{} cutout(s) written, {} log line(s), report at {}",
        report.requests.len(),
        report.log.len(),
        args.result.display()
    );
    Ok(())
}
