use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playlist_ocr::catalog::{SpotifyCatalogClient, TrackRecord};
use playlist_ocr::config::{AppConfig, CliConfig, FileConfig};
use playlist_ocr::pipeline::{BatchOutput, PlaylistImporter, Upload};
use playlist_ocr::text::SongPair;
use playlist_ocr::Fidelity;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

/// Read playlist screenshots and find their songs in the music catalog.
#[derive(Parser, Debug)]
#[clap(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct CliArgs {
    /// Screenshots to read (PNG, JPEG, ...), at most 10.
    #[clap(value_parser = parse_path)]
    pub images: Vec<PathBuf>,

    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Pipeline strategy.
    #[clap(long, value_enum, default_value_t = Fidelity::Enhanced)]
    pub fidelity: Fidelity,

    /// Bearer token for the catalog search API.
    #[clap(long, env = "CATALOG_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Directory uploads are staged in while a batch runs.
    #[clap(long, value_parser = parse_path)]
    pub staging_dir: Option<PathBuf>,

    /// Path or name of the tesseract executable.
    #[clap(long)]
    pub tesseract_cmd: Option<String>,

    /// Catalog market (ISO 3166-1 alpha-2 country code).
    #[clap(long)]
    pub market: Option<String>,

    /// Print the result as JSON.
    #[clap(long)]
    pub json: bool,

    /// Only extract song pairs, skip the catalog lookup.
    #[clap(long)]
    pub extract_only: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            fidelity: self.fidelity,
            access_token: self.access_token.clone(),
            staging_dir: self.staging_dir.clone(),
            tesseract_cmd: self.tesseract_cmd.clone(),
            market: self.market.clone(),
        }
    }
}

fn print_pairs(pairs: &[SongPair]) {
    println!("Extracted {} songs:", pairs.len());
    for (i, pair) in pairs.iter().enumerate() {
        println!("{:>3}: {}", i + 1, pair);
    }
}

fn print_track(track: &TrackRecord) {
    println!("  {}", track);
    if let Some(preview) = &track.preview_url {
        println!("      preview: {}", preview);
    }
}

fn print_report(output: &BatchOutput) {
    println!(
        "Found {} of {} extracted songs.",
        output.found.len(),
        output.total_extracted
    );
    if !output.found.is_empty() {
        println!("\nFound:");
        for track in &output.found {
            print_track(track);
        }
    }
    if !output.not_found.is_empty() {
        println!("\nNot found:");
        for pair in &output.not_found {
            println!("  {}", pair);
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    info!("Running with {} fidelity", config.fidelity);

    let uploads = cli_args
        .images
        .iter()
        .map(|path| {
            Upload::from_path(path).with_context(|| format!("Failed to read image {:?}", path))
        })
        .collect::<Result<Vec<_>>>()?;

    let tesseract = config.tesseract();
    match tesseract.version() {
        Ok(version) => info!("Using {}", version),
        Err(err) => warn!("Could not run {:?}: {}", config.ocr.tesseract_cmd, err),
    }
    let importer = PlaylistImporter::from_config(&config, Box::new(tesseract));

    if cli_args.extract_only {
        let pairs = importer.extract_pairs(&uploads)?;
        if cli_args.json {
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        } else {
            print_pairs(&pairs);
        }
        return Ok(());
    }

    // Fail on a missing token before any image is processed
    let client = SpotifyCatalogClient::new(config.catalog_client_settings()?)
        .context("Failed to create catalog client")?;
    let output = importer.process_batch(&uploads, &client)?;

    if cli_args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&output);
    }
    Ok(())
}
