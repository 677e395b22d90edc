mod app;
mod commands;
mod config;
mod event;
mod logging;
mod mirror;
mod remote;
mod store;
mod ui;
mod workflow;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "u9s")]
#[command(about = "A terminal UI for managing user records over REST, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/u9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API base URL, overrides api.base_url
  #[arg(short = 'u', long)]
  base_url: Option<String>,

  /// Do not read or write the local mirror
  #[arg(long)]
  no_mirror: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }
  if args.no_mirror {
    config.mirror.enabled = false;
  }

  // Flushes buffered log lines when dropped
  let _guard = logging::setup_logging(&config.log)?;
  tracing::info!(base_url = %config.api.base_url, mirror = config.mirror.enabled, "starting u9s");

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
