mod app;
mod cache;
mod commands;
mod config;
mod error;
mod event;
mod logging;
mod query;
mod render;
mod router;
mod site;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;

use crate::render::{Renderer, TextRenderer};
use crate::router::Navigator;
use crate::site::CachedSiteClient;

#[derive(Parser, Debug)]
#[command(name = "ranobe")]
#[command(about = "A terminal reader for statically hosted light-novel sites")]
#[command(version)]
struct Args {
  /// Location to open, e.g. /my-series or /my-series/1/0
  location: Option<String>,

  /// Path to config file (default: $XDG_CONFIG_HOME/ranobe/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the site (overrides site.url)
  #[arg(short, long)]
  site: Option<String>,

  /// Print the location as text and exit instead of starting the UI
  #[arg(long)]
  print: bool,

  /// Remove every cached resource and exit
  #[arg(long)]
  clear_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init(&config::data_dir().join("logs"))?;
  info!(version = env!("CARGO_PKG_VERSION"), "starting ranobe");

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override site if specified on command line
  if let Some(site) = args.site {
    config.site.url = Some(site);
  }

  let client = CachedSiteClient::new(&config)?;
  info!(site = %client.site().base_url(), "configured site client");

  if args.clear_cache {
    let removed = client.clear_cache();
    println!("Removed {} cached resources", removed);
    return Ok(());
  }

  let location = args.location.as_deref().unwrap_or("/");

  if args.print {
    return print_location(client, location).await;
  }

  let navigator = Navigator::start(client, location);
  let mut app = app::App::new(&config, navigator);
  app.run().await?;

  Ok(())
}

/// Resolve `location` once and write it to stdout.
async fn print_location(client: CachedSiteClient, location: &str) -> Result<()> {
  let mut navigator = Navigator::start(client, location);
  let view = navigator.view().clone();
  let state = navigator.settle().await;

  let mut renderer = TextRenderer::new(std::io::stdout().lock());
  renderer.render(&view, state)?;

  match state.error() {
    Some(e) => Err(eyre!("{}: {}", view, e)),
    None => Ok(()),
  }
}
