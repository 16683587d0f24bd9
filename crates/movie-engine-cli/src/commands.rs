//! Commands run by the `movie-engine` binary
//!
//! Each command resolves its engine through the registry and returns plain
//! data; `main` decides how to print it.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use movie_engine::{EngineRegistry, Movie, Props, SearchResult};

/// What a command produced
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Engines(Vec<Props>),
    Result(SearchResult),
    Movies(Vec<Movie>),
}

impl Output {
    /// Render as pretty JSON or as one line per entry
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return serde_json::to_string_pretty(self).context("failed to encode output");
        }

        let lines: Vec<String> = match self {
            Output::Engines(engines) => engines
                .iter()
                .map(|props| format!("{:<10} {}  {}", props.name.to_lowercase(), props.base_url, props.description))
                .collect(),
            Output::Result(result) => result.movies.iter().map(movie_line).collect(),
            Output::Movies(movies) => movies.iter().map(movie_line).collect(),
        };
        Ok(lines.join("\n"))
    }
}

fn movie_line(movie: &Movie) -> String {
    let mut line = format!("{:>3}. {}", movie.index, movie);
    if !movie.size.is_empty() {
        line.push_str(&format!(" [{}]", movie.size));
    }
    if let Some(link) = &movie.download_link {
        line.push_str(&format!(" {}", link));
    }
    for episode in &movie.s_download_link {
        line.push_str(&format!("\n       {}", episode));
    }
    line
}

/// Describe every registered engine.
pub fn engines(registry: &EngineRegistry) -> Output {
    Output::Engines(
        registry
            .engines()
            .values()
            .map(|engine| engine.props().clone())
            .collect(),
    )
}

/// Search one engine.
pub async fn search(registry: &EngineRegistry, engine: &str, query: &str) -> Result<Output> {
    let engine = registry.get(engine)?;
    let result = engine.search(query).await;
    info!(engine = %engine, query, movies = result.len(), "search finished");
    Ok(Output::Result(result))
}

/// List a page of one engine's default catalogue.
pub async fn list(registry: &EngineRegistry, engine: &str, page: u32) -> Result<Output> {
    let engine = registry.get(engine)?;
    let result = engine.list(page).await;
    info!(engine = %engine, page, movies = result.len(), "list finished");
    Ok(Output::Result(result))
}

/// Scrape a catalogue category of one engine down to download links.
pub async fn scrape(registry: &EngineRegistry, engine: &str, mode: &str) -> Result<Output> {
    let engine = registry.get(engine)?;
    let movies = engine
        .scrape(mode)
        .await
        .with_context(|| format!("{} failed to scrape {}", engine, mode))?;
    info!(engine = %engine, mode, movies = movies.len(), "scrape finished");
    Ok(Output::Movies(movies))
}
