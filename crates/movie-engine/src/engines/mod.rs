//! Site adapters implementing [`Engine`](crate::engine::Engine)
//!
//! - `netnaija`: NetNaija movies and series
//! - `fzmovies`: FzMovies Hollywood and Bollywood catalogues

pub mod fzmovies;
pub mod netnaija;

pub use fzmovies::FzMoviesEngine;
pub use netnaija::NetNaijaEngine;

use url::Url;

use crate::client::HttpClient;
use crate::correlation::{movie_index, MovieSlots, PageRequest};
use crate::error::{EngineError, Result};
use crate::types::Movie;

/// `url` with `key=page` appended, unchanged for the first page.
pub(crate) fn paged(url: &Url, key: &str, page: u32) -> Url {
    let mut url = url.clone();
    if page > 1 {
        url.query_pairs_mut().append_pair(key, &page.to_string());
    }
    url
}

/// Visit the page each movie's `download_link` points at and replace the
/// movie with what `resolve` makes of that page.
///
/// Pages are fetched concurrently; each response is written back into the
/// slot of the movie it was requested for, so the result keeps listing
/// order. The first fetch or parse failure aborts the crawl.
pub(crate) async fn resolve_movies<F>(
    client: &HttpClient,
    movies: Vec<Movie>,
    resolve: F,
) -> Result<Vec<Movie>>
where
    F: Fn(&str, &Url, &Movie) -> Result<Movie>,
{
    let requests = movies
        .iter()
        .enumerate()
        .map(|(index, movie)| {
            movie
                .download_link
                .clone()
                .map(|url| PageRequest::for_movie(url, index))
                .ok_or_else(|| EngineError::ElementNotFound(format!("page link for {}", movie.title)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut slots = MovieSlots::new(movies);
    client
        .crawl(requests, |request, body| {
            let slot = movie_index(request)?;
            let html = body?;
            let resolved = resolve(&html, &request.url, slots.get(slot)?)?;
            slots.fill(slot, resolved)
        })
        .await?;

    slots.into_movies()
}
