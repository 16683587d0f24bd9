//! Error types for the movie engines
//!
//! This module defines all error types used throughout the library.
//! EngineError implements Serialize so API layers can return it as plain text.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Required HTML element was not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Client configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Requested page does not exist on the site (HTTP 404)
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// No movie in a search result carries the requested title
    #[error("Movie not Found: {0}")]
    MovieNotFound(String),

    /// No engine is registered under the requested name
    #[error("Engine {0} Does not exist")]
    EngineNotFound(String),

    /// The engine does not know the requested scrape mode
    #[error("Invalid scrape mode for {engine}: {mode}")]
    InvalidMode { engine: String, mode: String },

    /// A detail-page request was issued without a movie slot
    #[error("Request for {0} carries no movie index")]
    MissingMovieIndex(String),

    /// A response addressed a slot past the end of the working sequence
    #[error("Movie index {index} out of range (len {len})")]
    SlotOutOfRange { index: usize, len: usize },

    /// Two responses addressed the same slot
    #[error("Movie index {0} written twice")]
    SlotAlreadyFilled(usize),

    /// A crawl finished without resolving every slot
    #[error("Movie index {0} was never resolved")]
    UnfilledSlot(usize),
}

/// Serialize EngineError as its display string
impl Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
