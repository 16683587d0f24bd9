//! FzMovies page parser
//!
//! FzMovies hides the file behind two pages: the movie page links to a
//! download-options page, which in turn carries the direct link.

use scraper::{ElementRef, Html};
use url::Url;

use super::common::{
    element_text, extract_size, extract_year, first_attr, first_text, resolve_link, selector,
    split_title_year,
};
use crate::error::{EngineError, Result};
use crate::types::Movie;

/// One movie per box on listing and search pages
const ITEM_SELECTOR: &str = "div.mainbox";

/// Parse the movies listed on a listing or search page.
///
/// Each movie sits in its own `div.mainbox` table. Items without a title
/// link are skipped. `download_link` is the movie page until scraped.
pub fn parse_listing(html: &str, page_url: &Url, source: &str) -> Result<Vec<Movie>> {
    let document = Html::parse_document(html);
    let (_, movies) = listing_items(&document, page_url, source)?;
    Ok(movies)
}

/// Parse a catalogue page that is about to be scraped.
///
/// # Errors
/// `EngineError::ElementNotFound` if the page has no `div.mainbox`, or if
/// none of its boxes hold a movie link.
pub fn parse_category(html: &str, page_url: &Url, source: &str) -> Result<Vec<Movie>> {
    let document = Html::parse_document(html);
    let (found, movies) = listing_items(&document, page_url, source)?;

    if found == 0 {
        return Err(EngineError::ElementNotFound(ITEM_SELECTOR.to_string()));
    }
    if movies.is_empty() {
        return Err(EngineError::ElementNotFound(format!(
            "movie link in any of {} {} items",
            found, ITEM_SELECTOR
        )));
    }
    Ok(movies)
}

fn listing_items(document: &Html, page_url: &Url, source: &str) -> Result<(usize, Vec<Movie>)> {
    let boxes = selector(ITEM_SELECTOR)?;
    let boxes: Vec<ElementRef> = document.select(&boxes).collect();
    let movies = boxes
        .iter()
        .filter_map(|item| parse_item(item, page_url, source))
        .collect();
    Ok((boxes.len(), movies))
}

/// Parse a single `div.mainbox` item.
fn parse_item(item: &ElementRef, page_url: &Url, source: &str) -> Option<Movie> {
    let link_selector = selector("a[href*='movie-']").ok()?;
    let title_link = item
        .select(&link_selector)
        .find(|a| !element_text(a).is_empty())?;
    let detail_url = resolve_link(page_url, title_link.value().attr("href")?)?;

    let (title, title_year) = split_title_year(&element_text(&title_link));
    let mut movie = Movie::new(title, source);

    movie.year = title_year
        .or_else(|| first_text(item, &["small"]).and_then(|text| extract_year(&text)))
        .unwrap_or(0);
    movie.cover_photo_link = first_attr(item, &["img"], "src")
        .and_then(|src| resolve_link(page_url, &src))
        .map(|url| url.to_string())
        .unwrap_or_default();
    movie.description = first_text(item, &["span.moviedesc", "i"]).unwrap_or_default();
    movie.download_link = Some(detail_url);

    Some(movie)
}

/// Find the download-options link and file size on a movie page.
///
/// # Errors
/// `EngineError::ElementNotFound` if the page has no download options.
pub fn parse_movie_page(html: &str, page_url: &Url) -> Result<(Url, Option<String>)> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let href = first_attr(
        &root,
        &[
            "a#downloadoptionslink2",
            "a#downloadoptionslink1",
            "ul.moviesfiles a",
        ],
        "href",
    )
    .ok_or_else(|| EngineError::ElementNotFound(format!("download options on {}", page_url)))?;
    let options_url = resolve_link(page_url, &href)
        .ok_or_else(|| EngineError::ParseError(format!("bad download options link: {}", href)))?;

    let size = first_text(&root, &["ul.moviesfiles", "dcounter"]).and_then(|text| extract_size(&text));

    Ok((options_url, size))
}

/// Find the direct download link on a download-options page.
///
/// # Errors
/// `EngineError::ElementNotFound` if the page has no direct link.
pub fn parse_download_page(html: &str, page_url: &Url) -> Result<Url> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let href = first_attr(&root, &["a#dlink2", "a#dlink1", "a[id^='dlink']"], "href")
        .or_else(|| first_attr(&root, &["input[name='download1']"], "value"))
        .ok_or_else(|| EngineError::ElementNotFound(format!("download link on {}", page_url)))?;

    resolve_link(page_url, &href)
        .ok_or_else(|| EngineError::ParseError(format!("bad download link: {}", href)))
}
