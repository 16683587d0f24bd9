//! Movie Engine CLI
//!
//! Search, list and scrape the supported movie sites from the terminal.
//!
//! ```bash
//! movie-engine engines
//! movie-engine search netnaija "the matrix"
//! movie-engine list fzmovies --page 2
//! movie-engine scrape netnaija series:1 --json
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use movie_engine::{registry, ClientConfig};

/// Search, list and scrape movie index sites
#[derive(Parser)]
#[command(name = "movie-engine")]
#[command(version)]
#[command(about = "Search, list and scrape movie index sites", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of one line per movie
    #[arg(long, global = true)]
    json: bool,

    /// Maximum requests per second per site
    #[arg(long, global = true, env = "MOVIE_ENGINE_RPS", default_value_t = 2.0)]
    rps: f64,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "MOVIE_ENGINE_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Pages fetched at once while scraping
    #[arg(long, global = true, env = "MOVIE_ENGINE_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the available engines
    Engines,

    /// Search an engine
    Search {
        /// Engine name (case-insensitive)
        engine: String,
        /// Search terms
        query: String,
    },

    /// List a page of an engine's catalogue
    List {
        /// Engine name (case-insensitive)
        engine: String,
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Resolve download links for a catalogue category
    Scrape {
        /// Engine name (case-insensitive)
        engine: String,
        /// Category, optionally with a page (e.g. movies, series:2)
        mode: String,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            requests_per_second: self.rps,
            timeout_secs: self.timeout,
            max_concurrency: self.concurrency,
            ..ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let registry = registry::init(&cli.client_config())?;
    debug!(engines = ?registry.names(), "registry ready");

    let output = match &cli.command {
        Commands::Engines => commands::engines(registry),
        Commands::Search { engine, query } => commands::search(registry, engine, query).await?,
        Commands::List { engine, page } => commands::list(registry, engine, *page).await?,
        Commands::Scrape { engine, mode } => commands::scrape(registry, engine, mode).await?,
    };

    println!("{}", output.render(cli.json)?);
    Ok(())
}
