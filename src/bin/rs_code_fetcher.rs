use anyhow::{Result, anyhow};
use clap::Parser;
use log::LevelFilter;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rs_code_fetcher::api::client::ApiClient;
use rs_code_fetcher::config::{load_config, load_config_from};
use rs_code_fetcher::terminal::run_tui;

#[derive(Parser)]
#[command(name = "rs_code_fetcher")]
#[command(about = "Fetch email verification codes from the code API", long_about = None)]
struct Cli {
    /// API base URL shown in the URL field at startup
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Read settings from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write log output here (RUST_LOG selects the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Off).parse_default_env();
    if let Some(p) = log_file {
        let f = File::create(p).map_err(|e| anyhow!("cannot open log file {}: {e}", p.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(f)));
    }
    builder.try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;
    color_eyre::install().map_err(|e| anyhow!("{e}"))?;

    let cfg = match &cli.config {
        Some(p) => load_config_from(p),
        None => load_config(),
    }
    .map_err(|e| anyhow!("Configuration error: {e:#}"))?;

    let base_url = cli.base_url.unwrap_or_else(|| cfg.base_url());
    let timeout = cli.timeout.map(Duration::from_secs).unwrap_or(cfg.timeout());

    let client = ApiClient::new(timeout)?;
    log::info!("starting with base URL {base_url}, timeout {}s", timeout.as_secs());

    run_tui(client, base_url)
}
