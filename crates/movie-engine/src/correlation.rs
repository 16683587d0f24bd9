//! Correlation of crawl responses with movie slots
//!
//! A deep scrape fans out one request per listed movie. Responses complete in
//! any order, so every request carries the slot of the movie it belongs to and
//! the response handler writes into that slot of a pre-sized [`MovieSlots`].

use url::Url;

use crate::error::{EngineError, Result};
use crate::types::Movie;

/// Position of a movie in the working sequence of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovieSlot(usize);

impl MovieSlot {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A page the crawler should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: Url,
    /// Movie the page belongs to; `None` for listing pages
    pub slot: Option<MovieSlot>,
}

impl PageRequest {
    /// Request for a page that is not tied to a movie
    pub fn page(url: Url) -> Self {
        Self { url, slot: None }
    }

    /// Request for a page resolving the movie at `index`
    pub fn for_movie(url: Url, index: usize) -> Self {
        Self {
            url,
            slot: Some(MovieSlot::new(index)),
        }
    }
}

/// Recover the movie slot a request was issued for.
///
/// # Errors
/// Returns `EngineError::MissingMovieIndex` if the request was built without
/// a slot, which means the caller mixed listing and movie requests.
pub fn movie_index(request: &PageRequest) -> Result<MovieSlot> {
    request
        .slot
        .ok_or_else(|| EngineError::MissingMovieIndex(request.url.to_string()))
}

/// Pre-sized working sequence of movies for one crawl.
///
/// Every slot starts with the shallow movie from the listing and may be
/// filled exactly once with its resolved version.
#[derive(Debug)]
pub struct MovieSlots {
    movies: Vec<Movie>,
    filled: Vec<bool>,
}

impl MovieSlots {
    /// Create slots from listing movies, stamping each index with its position.
    pub fn new(mut movies: Vec<Movie>) -> Self {
        for (index, movie) in movies.iter_mut().enumerate() {
            movie.index = index;
        }
        let filled = vec![false; movies.len()];
        Self { movies, filled }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Movie currently held by `slot`
    pub fn get(&self, slot: MovieSlot) -> Result<&Movie> {
        self.movies.get(slot.index()).ok_or(EngineError::SlotOutOfRange {
            index: slot.index(),
            len: self.movies.len(),
        })
    }

    /// Write the resolved movie for `slot`.
    ///
    /// The stored movie keeps the slot position as its index.
    ///
    /// # Errors
    /// - `EngineError::SlotOutOfRange` if the slot is past the end
    /// - `EngineError::SlotAlreadyFilled` if the slot was already written
    pub fn fill(&mut self, slot: MovieSlot, mut movie: Movie) -> Result<()> {
        let index = slot.index();
        let len = self.movies.len();
        let filled = self
            .filled
            .get_mut(index)
            .ok_or(EngineError::SlotOutOfRange { index, len })?;
        if *filled {
            return Err(EngineError::SlotAlreadyFilled(index));
        }

        movie.index = index;
        self.movies[index] = movie;
        *filled = true;
        Ok(())
    }

    /// Whether every slot has been written
    pub fn is_complete(&self) -> bool {
        self.filled.iter().all(|filled| *filled)
    }

    /// Take the resolved movies in slot order.
    ///
    /// # Errors
    /// Returns `EngineError::UnfilledSlot` naming the first slot never written.
    pub fn into_movies(self) -> Result<Vec<Movie>> {
        if let Some(index) = self.filled.iter().position(|filled| !filled) {
            return Err(EngineError::UnfilledSlot(index));
        }
        Ok(self.movies)
    }
}
