use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xbrl_fetch::cli::Args;
use xbrl_fetch::{Downloader, Edgar, Orchestrator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("\n✗ Error downloading filings: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<u8> {
    let config = args.app_config();
    config.validate().context("invalid SEC.gov identity")?;

    let edgar =
        Edgar::with_config(config.edgar_config()).context("failed to create Edgar client")?;
    let request = args.request(&config);
    let downloader = Downloader::new(edgar, &request.output_dir)
        .with_namespace(config.namespace.clone())
        .with_options(args.download_options());

    let outcome = Orchestrator::new(config, downloader)
        .run(&request, &mut io::stdout(), &mut io::stderr())
        .await
        .context("failed to write report")?;

    Ok(outcome.exit_code())
}
