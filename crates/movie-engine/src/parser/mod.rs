//! HTML parsers for the supported sites
//!
//! This module contains the site-specific parsers the engines delegate to:
//! - `netnaija`: NetNaija listing, search, movie and series pages
//! - `fzmovies`: FzMovies listing, search, movie and download pages
//! - `common`: selector and text helpers shared by both

pub mod common;
pub mod fzmovies;
pub mod netnaija;

// Re-export helpers used outside the parsers
pub use common::{extract_size, extract_year, split_title_year};
