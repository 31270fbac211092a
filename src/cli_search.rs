use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playlist_ocr::catalog::{CatalogResolver, SpotifyCatalogClient};
use playlist_ocr::config::{AppConfig, CliConfig, FileConfig};

/// Interactive free-text search against the music catalog.
#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Bearer token for the catalog search API.
    #[clap(long, env = "CATALOG_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Catalog market (ISO 3166-1 alpha-2 country code).
    #[clap(long)]
    pub market: Option<String>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        access_token: cli_args.access_token.clone(),
        market: cli_args.market.clone(),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let client = SpotifyCatalogClient::new(config.catalog_client_settings()?)
        .context("Failed to create catalog client")?;
    let resolver = CatalogResolver::new(config.resolver_settings());

    let stdin = io::stdin();
    loop {
        print!("Please enter your search query: ");
        io::stdout().flush()?;

        let mut user_input = String::new();
        if stdin.lock().read_line(&mut user_input)? == 0 {
            println!();
            return Ok(());
        }

        let user_input = user_input.trim();
        if user_input.is_empty() {
            continue;
        }

        match resolver.search_manual(user_input, &client) {
            Ok(tracks) if tracks.is_empty() => {
                println!("No matches found for \"{}\".", user_input)
            }
            Ok(tracks) => {
                println!("Found {} matches for \"{}\":\n", tracks.len(), user_input);
                for track in tracks {
                    println!("{}", track);
                }
            }
            Err(err) => println!("Search failed: {:#}", err),
        }
        println!();
    }
}
