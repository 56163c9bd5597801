mod app;
mod cache;
mod commands;
mod config;
mod db;
mod error;
mod event;
mod market;
mod net;
mod query;
mod ui;
mod worldstate;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wf9s")]
#[command(about = "A terminal UI for Warframe Market and world state, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/wf9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Platform to query: pc, ps4, xb1 or swi
  #[arg(short, long)]
  platform: Option<String>,

  /// Start on the world-state view instead of market search
  #[arg(short, long)]
  world: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // The TUI owns the terminal, so logs go to a file
  let _log_guard = init_logging()?;

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override platform if specified on command line
  let config = if let Some(platform) = args.platform {
    config::Config { platform, ..config }
  } else {
    config
  };

  // Initialize and run the app
  let mut app = app::App::new(config, args.world)?;
  app.run().await?;

  Ok(())
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("wf9s");
  std::fs::create_dir_all(&dir)?;

  let appender = tracing_appender::rolling::never(dir, "wf9s.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wf9s=info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
