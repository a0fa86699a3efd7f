use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use item_icon_painter::{Catalog, Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "item-icon-painter")]
#[command(about = "Fetch item icons and color them by rarity and type", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON item catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory for painted icons
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base URL of the icon endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Also render PNG previews of this size
    #[arg(long)]
    png_size: Option<u32>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(catalog) = self.catalog {
            config.catalog = catalog;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if self.timeout.is_some() {
            config.timeout_seconds = self.timeout;
        }
        if self.png_size.is_some() {
            config.png_size = self.png_size;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = args.into_config()?;
    let catalog = Catalog::load(&config.catalog)
        .with_context(|| format!("loading catalog {}", config.catalog.display()))?;
    if catalog.is_empty() {
        tracing::warn!(catalog = %config.catalog.display(), "catalog has no items");
    } else {
        tracing::info!(
            items = catalog.len(),
            catalog = %config.catalog.display(),
            "loaded catalog"
        );
    }

    config.painter()?.run(&catalog);
    Ok(())
}
