//! NBA shot-chart collection CLI
//!
//! Scrapes season rosters, resolves identifiers and downloads per-player
//! shot charts into per-season CSV files.

use clap::Parser;
use nba_shots::{pipeline, Config};

#[derive(Parser)]
#[command(name = "nba-shots")]
#[command(about = "Collect per-season NBA shot-chart data into CSV files", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// First season end year to collect (overrides config)
    #[arg(long)]
    first_season: Option<u16>,

    /// Last season end year to collect (overrides config)
    #[arg(long)]
    last_season: Option<u16>,

    /// Output directory (overrides config)
    #[arg(long)]
    out_dir: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let mut config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    if let Some(first) = cli.first_season {
        config.seasons.first = first;
    }
    if let Some(last) = cli.last_season {
        config.seasons.last = last;
    }
    if let Some(dir) = cli.out_dir {
        config.output.dir = dir;
    }

    if let Err(e) = pipeline::run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
