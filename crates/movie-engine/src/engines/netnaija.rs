//! NetNaija engine
//!
//! Lists, searches and scrapes <https://www.thenetnaija.net>. Movies resolve
//! to a single download link; series resolve to one link per episode.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::{paged, resolve_movies};
use crate::client::{ClientConfig, HttpClient};
use crate::engine::{Engine, ScrapeMode};
use crate::error::{EngineError, Result};
use crate::parser::netnaija::{parse_category, parse_listing, parse_movie_page, parse_series_page};
use crate::types::{Movie, Props, SearchResult};

/// Query parameter carrying the listing page
const PAGE_PARAM: &str = "page";

/// Engine for NetNaija
pub struct NetNaijaEngine {
    props: Props,
    client: HttpClient,
}

impl NetNaijaEngine {
    /// Create the engine for the live site.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_props(Self::default_props()?, HttpClient::with_config(config)?))
    }

    /// Create the engine for a custom site location (mirrors, tests).
    pub fn with_props(props: Props, client: HttpClient) -> Self {
        Self { props, client }
    }

    /// Props of the live site
    pub fn default_props() -> Result<Props> {
        Props::new(
            "NetNaija",
            "Nigerian site with free downloads of movies and TV series",
            "https://www.thenetnaija.net",
            "https://www.thenetnaija.net/search",
            "https://www.thenetnaija.net/videos/movies",
        )
    }

    /// Listing URL for a scrape category
    fn category_url(&self, mode: &ScrapeMode, raw_mode: &str) -> Result<Url> {
        let path = match mode.category.as_str() {
            "movies" => "/videos/movies",
            "series" => "/videos/series",
            _ => {
                return Err(EngineError::InvalidMode {
                    engine: self.name().to_string(),
                    mode: raw_mode.to_string(),
                })
            }
        };
        Ok(self.props.base_url.join(path)?)
    }

    async fn fetch_listing(&self, url: &Url) -> Result<Vec<Movie>> {
        let html = self.client.fetch(url).await?;
        parse_listing(&html, url, self.name())
    }

    /// Catalogue page to scrape; an unrecognised page is an error.
    async fn fetch_category(&self, url: &Url) -> Result<Vec<Movie>> {
        let html = self.client.fetch(url).await?;
        parse_category(&html, url, self.name())
    }

    /// Best-effort listing fetch for `search` and `list`.
    async fn listing_or_empty(&self, url: &Url, query: &str) -> SearchResult {
        match self.fetch_listing(url).await {
            Ok(movies) => SearchResult::new(query, movies),
            Err(EngineError::PageNotFound(_)) => {
                debug!(engine = self.name(), %url, "listing page does not exist");
                SearchResult::empty(query)
            }
            Err(e) => {
                warn!(engine = self.name(), %url, error = %e, "listing fetch failed");
                SearchResult::empty(query)
            }
        }
    }
}

#[async_trait]
impl Engine for NetNaijaEngine {
    fn props(&self) -> &Props {
        &self.props
    }

    async fn search(&self, query: &str) -> SearchResult {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SearchResult::empty(query);
        }

        let mut url = self.props.search_url.clone();
        url.query_pairs_mut()
            .append_pair("t", trimmed)
            .append_pair("folder", "videos");

        self.listing_or_empty(&url, query).await
    }

    async fn scrape(&self, mode: &str) -> Result<Vec<Movie>> {
        let parsed = ScrapeMode::parse(self.name(), mode)?;
        let url = paged(&self.category_url(&parsed, mode)?, PAGE_PARAM, parsed.page);

        let listed = self.fetch_category(&url).await?;
        debug!(engine = self.name(), %url, movies = listed.len(), "resolving listing");

        resolve_movies(&self.client, listed, |html, page_url, movie| {
            if movie.is_series {
                parse_series_page(html, page_url, movie)
            } else {
                parse_movie_page(html, page_url, movie)
            }
        })
        .await
    }

    async fn list(&self, page: u32) -> SearchResult {
        if page == 0 {
            return SearchResult::empty("");
        }
        let url = paged(&self.props.list_url, PAGE_PARAM, page);
        self.listing_or_empty(&url, "").await
    }
}
