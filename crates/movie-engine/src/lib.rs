//! Movie Engine Core Library
//!
//! This crate puts several movie index sites behind one [`Engine`] trait so
//! callers can search, list and scrape any of them the same way.
//!
//! # Features
//! - Search a site and list its catalogue page by page
//! - Scrape a catalogue category down to direct download links
//! - Case-insensitive engine registry (`netnaija`, `fzmovies`)
//! - Rate-limited HTTP crawler with retries and bounded concurrency
//!
//! # Example
//! ```no_run
//! use movie_engine::{get_engine, Engine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = get_engine("NetNaija")?;
//!     let result = engine.search("matrix").await;
//!     for title in result.titles() {
//!         println!("{}", title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod correlation;
pub mod engine;
pub mod engines;
pub mod error;
pub mod parser;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, HttpClient, RateLimiter};
pub use correlation::{movie_index, MovieSlot, MovieSlots, PageRequest};
pub use engine::{Engine, ScrapeMode};
pub use engines::{FzMoviesEngine, NetNaijaEngine};
pub use error::{EngineError, Result};
pub use registry::{get_engine, get_engines, EngineRegistry};
pub use types::{Movie, Props, SearchResult};
