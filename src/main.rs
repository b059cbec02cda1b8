use std::{error::Error, path::PathBuf};

use clap::Parser;
use himawari_arch::{ArchiveFetcher, Config};

/// Download Himawari-8/9 full disk netCDF files from the JAXA P-Tree FTP archive.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML file with credentials, date range, hours and output directory.
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "himawari_arch=info,himawari_fetch=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;

    let mut fetcher = ArchiveFetcher::connect(
        config.remote(),
        config.credentials(),
        config.date_range(),
        config.hour_filter()?,
        &config.output_path,
    )?
    .with_retry_pause(config.retry_pause());

    let summary = fetcher.run(config.max_retries);
    fetcher.disconnect();

    if !summary.failed_dates.is_empty() {
        log::warn!("{} dates could not be fetched", summary.failed_dates.len());
    }

    Ok(())
}
