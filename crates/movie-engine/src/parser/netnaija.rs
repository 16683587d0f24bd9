//! NetNaija page parser
//!
//! Listing and search pages share the same article markup. Movie detail
//! pages carry the file size and a download button; series detail pages list
//! one link per episode.

use scraper::{ElementRef, Html};
use url::Url;

use super::common::{
    element_text, extract_size, extract_year, first_attr, first_text, resolve_link, selector,
    split_title_year,
};
use crate::error::{EngineError, Result};
use crate::types::Movie;

/// Movie items on listing and search pages
const ITEM_SELECTOR: &str = "article.file-one, article.result, .video-files article";

/// Container wrapping the items of a catalogue page
const LISTING_SELECTOR: &str = ".video-files";

/// Parse the movies listed on a listing or search page.
///
/// Items without a title link are skipped. Every movie's `download_link`
/// is its detail page until the movie is scraped.
///
/// # Arguments
/// * `html` - Raw HTML of the page
/// * `page_url` - URL the page was fetched from, for resolving links
/// * `source` - Engine name stamped on every movie
pub fn parse_listing(html: &str, page_url: &Url, source: &str) -> Result<Vec<Movie>> {
    let document = Html::parse_document(html);
    let (_, movies) = listing_items(&document, page_url, source)?;
    Ok(movies)
}

/// Parse a catalogue page that is about to be scraped.
///
/// Same items as [`parse_listing`], but a page that does not look like a
/// catalogue is an error instead of an empty listing.
///
/// # Errors
/// `EngineError::ElementNotFound` if the page has neither items nor the
/// listing container, or if it has items and none of them parse.
pub fn parse_category(html: &str, page_url: &Url, source: &str) -> Result<Vec<Movie>> {
    let document = Html::parse_document(html);
    let (found, movies) = listing_items(&document, page_url, source)?;

    if found == 0 && document.select(&selector(LISTING_SELECTOR)?).next().is_none() {
        return Err(EngineError::ElementNotFound(LISTING_SELECTOR.to_string()));
    }
    if found > 0 && movies.is_empty() {
        return Err(EngineError::ElementNotFound(format!(
            "title link in any of {} listing items",
            found
        )));
    }
    Ok(movies)
}

/// Count the listing items on a page and parse the ones that have a title link.
fn listing_items(document: &Html, page_url: &Url, source: &str) -> Result<(usize, Vec<Movie>)> {
    let items = selector(ITEM_SELECTOR)?;
    let items: Vec<ElementRef> = document.select(&items).collect();
    let movies = items
        .iter()
        .filter_map(|item| parse_item(item, page_url, source))
        .collect();
    Ok((items.len(), movies))
}

/// Parse a single listing item.
fn parse_item(item: &ElementRef, page_url: &Url, source: &str) -> Option<Movie> {
    let link_selector = selector("h2 a, h3 a, .result-title a, .info a").ok()?;
    let link = item.select(&link_selector).next()?;
    let href = link.value().attr("href")?;
    let detail_url = resolve_link(page_url, href)?;

    let raw_title = element_text(&link);
    if raw_title.is_empty() {
        return None;
    }
    let (title, year) = split_title_year(&raw_title);

    let mut movie = Movie::new(title, source);
    movie.year = year.unwrap_or(0);
    movie.is_series = detail_url.path().contains("/series/");
    movie.cover_photo_link = first_attr(item, &["img"], "src")
        .or_else(|| first_attr(item, &["img"], "data-src"))
        .and_then(|src| resolve_link(page_url, &src))
        .map(|url| url.to_string())
        .unwrap_or_default();
    movie.description =
        first_text(item, &["p.sum", ".result-desc", ".info p", "p"]).unwrap_or_default();
    movie.upload_date = first_attr(item, &["time"], "datetime")
        .or_else(|| first_text(item, &["time", ".time", ".result-date", ".meta span"]))
        .unwrap_or_default();
    movie.download_link = Some(detail_url);

    Some(movie)
}

/// Resolve a movie from its detail page.
///
/// Returns `listed` with size, year, description and the download link
/// filled from the page.
///
/// # Errors
/// `EngineError::ElementNotFound` if the page has no download link.
pub fn parse_movie_page(html: &str, page_url: &Url, listed: &Movie) -> Result<Movie> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let href = first_attr(
        &root,
        &[
            "a.download-link",
            "a.btn-download",
            "a.btn[href*='sabishare']",
            "a[href*='/download']",
        ],
        "href",
    )
    .ok_or_else(|| EngineError::ElementNotFound(format!("download link on {}", page_url)))?;
    let download_link = resolve_link(page_url, &href)
        .ok_or_else(|| EngineError::ParseError(format!("bad download link: {}", href)))?;

    let mut movie = listed.clone();
    movie.download_link = Some(download_link);
    fill_details(&root, &mut movie);
    Ok(movie)
}

/// Resolve a series from its detail page.
///
/// Returns `listed` with every episode link in page order. The series'
/// own `download_link` stays its detail page.
///
/// # Errors
/// `EngineError::ElementNotFound` if the page lists no episodes.
pub fn parse_series_page(html: &str, page_url: &Url, listed: &Movie) -> Result<Movie> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let episodes = selector(".video-seasons a, .episodes a, .season-episodes a")?;

    let links: Vec<Url> = root
        .select(&episodes)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(page_url, href))
        .collect();
    if links.is_empty() {
        return Err(EngineError::ElementNotFound(format!("episode links on {}", page_url)));
    }

    let mut movie = listed.clone();
    movie.is_series = true;
    movie.s_download_link = links;
    movie.download_link = Some(page_url.clone());
    fill_details(&root, &mut movie);
    Ok(movie)
}

/// Fill the fields both detail page kinds share.
fn fill_details(root: &ElementRef, movie: &mut Movie) {
    if let Some(size) = first_text(root, &[".db-size", ".file-size", ".size"])
        .and_then(|text| extract_size(&text))
    {
        movie.size = size;
    }

    if movie.year == 0 {
        if let Some(year) = first_text(root, &[".video-year", ".year", "h1"])
            .and_then(|text| extract_year(&text))
        {
            movie.year = year;
        }
    }

    if movie.description.is_empty() {
        if let Some(description) = first_text(root, &[".video-description", ".synopsis", "article p"]) {
            movie.description = description;
        }
    }
}
