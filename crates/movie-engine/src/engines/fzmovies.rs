//! FzMovies engine
//!
//! Lists, searches and scrapes <https://fzmovies.net>. Scraping walks two
//! pages per movie: the movie page for the download-options link and size,
//! then the download-options page for the direct link.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::{paged, resolve_movies};
use crate::client::{ClientConfig, HttpClient};
use crate::engine::{Engine, ScrapeMode};
use crate::error::{EngineError, Result};
use crate::parser::fzmovies::{parse_category, parse_download_page, parse_listing, parse_movie_page};
use crate::types::{Movie, Props, SearchResult};

/// Query parameter carrying the listing page
const PAGE_PARAM: &str = "pg";

/// Engine for FzMovies
pub struct FzMoviesEngine {
    props: Props,
    client: HttpClient,
}

impl FzMoviesEngine {
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
            "FzMovies",
            "Hollywood and Bollywood movies in mobile-friendly formats",
            "https://fzmovies.net",
            "https://fzmovies.net/csearch.php",
            "https://fzmovies.net/movieslist.php?catID=2&by=date",
        )
    }

    /// Listing URL for a scrape category
    fn category_url(&self, mode: &ScrapeMode, raw_mode: &str) -> Result<Url> {
        let (cat_id, by) = match mode.category.as_str() {
            "hollywood" => ("2", "date"),
            "bollywood" => ("1", "date"),
            "popular" => ("2", "downloads"),
            _ => {
                return Err(EngineError::InvalidMode {
                    engine: self.name().to_string(),
                    mode: raw_mode.to_string(),
                })
            }
        };

        let mut url = self.props.base_url.join("/movieslist.php")?;
        url.query_pairs_mut()
            .append_pair("catID", cat_id)
            .append_pair("by", by);
        Ok(url)
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
impl Engine for FzMoviesEngine {
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
            .append_pair("searchname", trimmed)
            .append_pair("searchby", "Name")
            .append_pair("category", "All")
            .append_pair("Search", "Search");

        self.listing_or_empty(&url, query).await
    }

    async fn scrape(&self, mode: &str) -> Result<Vec<Movie>> {
        let parsed = ScrapeMode::parse(self.name(), mode)?;
        let url = paged(&self.category_url(&parsed, mode)?, PAGE_PARAM, parsed.page);

        let listed = self.fetch_category(&url).await?;
        debug!(engine = self.name(), %url, movies = listed.len(), "resolving listing");

        // movie page -> download-options page
        let with_options = resolve_movies(&self.client, listed, |html, page_url, movie| {
            let (options_url, size) = parse_movie_page(html, page_url)?;
            let mut movie = movie.clone();
            movie.download_link = Some(options_url);
            if let Some(size) = size {
                movie.size = size;
            }
            Ok(movie)
        })
        .await?;

        // download-options page -> direct link
        resolve_movies(&self.client, with_options, |html, page_url, movie| {
            let mut movie = movie.clone();
            movie.download_link = Some(parse_download_page(html, page_url)?);
            Ok(movie)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"
        <html><body>
          <div class="mainbox"><table><tr><td>
            <a href="movie-Up--hmp4.htm"><b>Up</b></a><br><small>(2009)</small>
          </td></tr></table></div>
          <div class="mainbox"><table><tr><td>
            <a href="movie-Coco--hmp4.htm"><b>Coco</b></a><br><small>(2017)</small>
          </td></tr></table></div>
        </body></html>
    "#;

    fn movie_page(key: &str) -> String {
        format!(
            r#"<html><body><ul class="moviesfiles"><li>
                 <a id="downloadoptionslink2" href="download1.php?downloadoptionskey={}">file</a>
                 <dcounter>(700 MB)</dcounter></li></ul></body></html>"#,
            key
        )
    }

    fn download_page(file: &str) -> String {
        format!(
            r#"<html><body><a id="dlink2" href="https://d.example.com/{}">Download</a></body></html>"#,
            file
        )
    }

    fn engine(server: &MockServer) -> FzMoviesEngine {
        let base = Url::parse(&server.uri()).unwrap();
        let props = FzMoviesEngine::default_props().unwrap().rebased(&base).unwrap();
        let client = HttpClient::with_config(&ClientConfig {
            requests_per_second: 1000.0,
            max_retries: 0,
            ..ClientConfig::default()
        })
        .unwrap();
        FzMoviesEngine::with_props(props, client)
    }

    async fn mount_page(server: &MockServer, at: &str, body: String, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(server)
            .await;
    }

    async fn mount_options(server: &MockServer, key: &str, file: &str, delay_ms: u64) {
        Mock::given(method("GET"))
            .and(path("/download1.php"))
            .and(query_param("downloadoptionskey", key))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(download_page(file))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_default_props() {
        let props = FzMoviesEngine::default_props().unwrap();
        assert_eq!(props.name, "FzMovies");
        assert_eq!(props.list_url.query(), Some("catID=2&by=date"));
    }

    #[tokio::test]
    async fn test_list_second_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movieslist.php"))
            .and(query_param("catID", "2"))
            .and(query_param("pg", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let result = engine(&server).list(2).await;
        assert_eq!(result.titles(), vec!["Up", "Coco"]);
        assert_eq!(result.movies[0].year, 2009);
        assert_eq!(result.movies[1].index, 1);
    }

    #[tokio::test]
    async fn test_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/csearch.php"))
            .and(query_param("searchname", "coco"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let result = engine(&server).search("coco").await;
        assert_eq!(result.query, "coco");
        assert_eq!(result.get_movie_by_title("Coco").unwrap().index, 1);
        assert!(result.movies.iter().all(|m| m.source == "FzMovies"));
    }

    #[tokio::test]
    async fn test_search_unreachable_is_empty() {
        let server = MockServer::start().await;
        let result = engine(&server).search("coco").await;
        assert!(result.is_empty());
        assert_eq!(result.query, "coco");
    }

    #[tokio::test]
    async fn test_scrape_resolves_two_levels_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movieslist.php"))
            .and(query_param("catID", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;
        mount_page(&server, "/movie-Up--hmp4.htm", movie_page("up"), 60).await;
        mount_page(&server, "/movie-Coco--hmp4.htm", movie_page("coco"), 0).await;
        mount_options(&server, "up", "up.mp4", 0).await;
        mount_options(&server, "coco", "coco.mp4", 60).await;

        let movies = engine(&server).scrape("bollywood").await.unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Up");
        assert_eq!(
            movies[0].download_link.as_ref().unwrap().as_str(),
            "https://d.example.com/up.mp4"
        );
        assert_eq!(movies[0].size, "700 MB");
        assert_eq!(movies[1].title, "Coco");
        assert_eq!(movies[1].index, 1);
        assert_eq!(
            movies[1].download_link.as_ref().unwrap().as_str(),
            "https://d.example.com/coco.mp4"
        );
    }

    #[tokio::test]
    async fn test_scrape_missing_direct_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movieslist.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;
        mount_page(&server, "/movie-Up--hmp4.htm", movie_page("up"), 0).await;
        mount_page(&server, "/movie-Coco--hmp4.htm", movie_page("coco"), 0).await;
        mount_page(&server, "/download1.php", "<html><body>expired</body></html>".to_string(), 0).await;

        let result = engine(&server).scrape("popular").await;
        assert!(matches!(result, Err(EngineError::ElementNotFound(_))));
    }

    #[tokio::test]
    async fn test_scrape_unknown_category() {
        let server = MockServer::start().await;
        match engine(&server).scrape("Nollywood:3").await {
            Err(EngineError::InvalidMode { engine, mode }) => {
                assert_eq!(engine, "FzMovies");
                assert_eq!(mode, "Nollywood:3");
            }
            other => panic!("Expected InvalidMode, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scrape_rejects_unrecognised_layout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movieslist.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><ul class='cards'><li><a href='movie-Up--hmp4.htm'>Up</a></li></ul></body></html>",
            ))
            .mount(&server)
            .await;

        let engine = engine(&server);
        assert!(matches!(
            engine.scrape("hollywood").await,
            Err(EngineError::ElementNotFound(_))
        ));
        assert!(engine.list(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_scrape_rejects_boxes_without_movies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movieslist.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><div class="mainbox"><table><tr><td>advert</td></tr></table></div></body></html>"#,
            ))
            .mount(&server)
            .await;

        let result = engine(&server).scrape("hollywood").await;
        assert!(matches!(result, Err(EngineError::ElementNotFound(_))));
    }
}
