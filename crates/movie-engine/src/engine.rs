//! The capability contract every site adapter implements

use std::fmt;

use async_trait::async_trait;

use crate::error::{EngineError, Result};
use crate::types::{Movie, Props, SearchResult};

/// A movie index site behind a uniform interface.
///
/// `search` and `list` are best effort: failures degrade to an empty
/// [`SearchResult`] and are reported as `tracing` warnings. `scrape` walks
/// detail pages and returns its failures.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Static description of the engine
    fn props(&self) -> &Props;

    /// Stable name of the engine, used for logging and as registry key
    fn name(&self) -> &str {
        &self.props().name
    }

    /// Query the site; every movie carries `source` and its position as `index`.
    async fn search(&self, query: &str) -> SearchResult;

    /// Resolve download links for every movie of a listing category.
    ///
    /// `mode` is a category token, optionally followed by `:<page>`
    /// (e.g. `movies:2`).
    ///
    /// # Errors
    /// - `EngineError::InvalidMode` if the engine does not know the category
    /// - any fetch or parse error met while walking the pages
    async fn scrape(&self, mode: &str) -> Result<Vec<Movie>>;

    /// Page `page` (1-based) of the default listing.
    ///
    /// Page 0 and pages past the end yield an empty result.
    async fn list(&self, page: u32) -> SearchResult;
}

impl fmt::Display for dyn Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for dyn Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").field("name", &self.name()).finish()
    }
}

/// A parsed scrape mode: category token plus listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeMode {
    pub category: String,
    pub page: u32,
}

impl ScrapeMode {
    /// Parse `category` or `category:page`.
    ///
    /// The category is lower-cased; the page defaults to 1.
    ///
    /// # Errors
    /// `EngineError::InvalidMode` for an empty category or a page that is not
    /// a positive number.
    pub fn parse(engine: &str, mode: &str) -> Result<Self> {
        let invalid = || EngineError::InvalidMode {
            engine: engine.to_string(),
            mode: mode.to_string(),
        };

        let (category, page) = match mode.trim().split_once(':') {
            Some((category, page)) => {
                let page: u32 = page.trim().parse().map_err(|_| invalid())?;
                (category, page)
            }
            None => (mode.trim(), 1),
        };

        let category = category.trim().to_lowercase();
        if category.is_empty() || page == 0 {
            return Err(invalid());
        }

        Ok(Self { category, page })
    }
}
