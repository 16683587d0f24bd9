//! Data types shared by every engine
//!
//! This module contains the core data structures used throughout the library.
//! Field names serialize in PascalCase and links serialize as absolute URL
//! strings, which is the shape API consumers of the engines expect.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{EngineError, Result};

/// Static description of an engine and the site it scrapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Props {
    /// Engine name, also the lowercase registry key
    #[serde(rename = "Name")]
    pub name: String,
    /// Human-readable description of the site
    #[serde(rename = "Description")]
    pub description: String,
    /// Root of the site
    #[serde(rename = "BaseURL")]
    pub base_url: Url,
    /// Endpoint queried by `search`
    #[serde(rename = "SearchURL")]
    pub search_url: Url,
    /// Endpoint paged through by `list`
    #[serde(rename = "ListURL")]
    pub list_url: Url,
}

impl Props {
    /// Build props from absolute URL strings.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidUrl` if any locator is not an absolute URL.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        base_url: &str,
        search_url: &str,
        list_url: &str,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            description: description.into(),
            base_url: Url::parse(base_url)?,
            search_url: Url::parse(search_url)?,
            list_url: Url::parse(list_url)?,
        })
    }

    /// Props for the same site rooted somewhere else.
    ///
    /// Paths and queries of the three locators are kept; only scheme, host
    /// and port are taken from `base`. Used to point an engine at a mirror.
    pub fn rebased(&self, base: &Url) -> Result<Self> {
        let rebase = |url: &Url| -> Result<Url> {
            let mut joined = base.join(url.path())?;
            joined.set_query(url.query());
            Ok(joined)
        };

        Ok(Self {
            name: self.name.clone(),
            description: self.description.clone(),
            base_url: rebase(&self.base_url)?,
            search_url: rebase(&self.search_url)?,
            list_url: rebase(&self.list_url)?,
        })
    }
}

/// A downloadable title found on one of the sites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Movie {
    /// Position within the originating search result
    pub index: usize,
    pub title: String,
    pub cover_photo_link: String,
    pub description: String,
    /// Size as printed by the site (e.g. "1.2 GB")
    pub size: String,
    /// Download link once scraped, otherwise the detail page of the title
    #[serde(with = "link_string")]
    pub download_link: Option<Url>,
    /// Release year, 0 when unknown
    pub year: u32,
    pub is_series: bool,
    /// Per-episode links, only filled for series
    #[serde(
        rename = "SDownloadLink",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub s_download_link: Vec<Url>,
    pub upload_date: String,
    /// Name of the engine the movie came from
    pub source: String,
}

impl Movie {
    /// Create a movie with a title, tagged with the engine it came from.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

/// `Option<Url>` as a plain string, empty when absent.
mod link_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use url::Url;

    pub fn serialize<S>(link: &Option<Url>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(link.as_ref().map(Url::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.is_empty() => Url::parse(&raw).map(Some).map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Episode links, reading `null` as no episodes.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Url>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Url>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Movies returned by one search or listing, in site order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    /// Query that produced the result (empty for listings)
    pub query: String,
    pub movies: Vec<Movie>,
}

impl SearchResult {
    /// Create a result, stamping every movie's index with its position.
    pub fn new(query: impl Into<String>, mut movies: Vec<Movie>) -> Self {
        for (index, movie) in movies.iter_mut().enumerate() {
            movie.index = index;
        }
        Self {
            query: query.into(),
            movies,
        }
    }

    /// Create a result with no movies
    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Titles of all movies, in result order
    pub fn titles(&self) -> Vec<String> {
        self.movies.iter().map(|movie| movie.title.clone()).collect()
    }

    /// First movie whose title matches exactly.
    ///
    /// # Errors
    /// Returns `EngineError::MovieNotFound` when no title matches.
    pub fn get_movie_by_title(&self, title: &str) -> Result<&Movie> {
        self.movies
            .iter()
            .find(|movie| movie.title == title)
            .ok_or_else(|| EngineError::MovieNotFound(title.to_string()))
    }

    /// Position of the first movie whose title matches exactly.
    ///
    /// # Errors
    /// Returns `EngineError::MovieNotFound` when no title matches.
    pub fn get_index_from_title(&self, title: &str) -> Result<usize> {
        self.movies
            .iter()
            .position(|movie| movie.title == title)
            .ok_or_else(|| EngineError::MovieNotFound(title.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matrix_result() -> SearchResult {
        SearchResult::new(
            "matrix",
            vec![
                Movie::new("The Matrix", "netnaija"),
                Movie::new("The Matrix Reloaded", "netnaija"),
            ],
        )
    }

    #[test]
    fn test_matrix_lookup_scenario() {
        let result = matrix_result();
        assert_eq!(result.get_index_from_title("The Matrix Reloaded").unwrap(), 1);
        assert_eq!(result.titles(), vec!["The Matrix", "The Matrix Reloaded"]);
    }

    #[test]
    fn test_new_stamps_indices() {
        let mut first = Movie::new("A", "fzmovies");
        first.index = 9;
        let result = SearchResult::new("q", vec![first, Movie::new("B", "fzmovies")]);
        assert_eq!(result.movies[0].index, 0);
        assert_eq!(result.movies[1].index, 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let result = matrix_result();
        assert!(matches!(
            result.get_movie_by_title("the matrix"),
            Err(EngineError::MovieNotFound(_))
        ));
    }

    #[test]
    fn test_empty_result_lookups() {
        let result = SearchResult::empty("anything");
        assert!(result.titles().is_empty());
        assert!(result.get_movie_by_title("The Matrix").is_err());
        assert!(result.get_index_from_title("The Matrix").is_err());
    }

    #[test]
    fn test_duplicate_titles_first_wins() {
        let mut second = Movie::new("Dup", "netnaija");
        second.year = 2001;
        let result = SearchResult::new("dup", vec![Movie::new("Dup", "netnaija"), second]);
        assert_eq!(result.get_movie_by_title("Dup").unwrap().year, 0);
        assert_eq!(result.get_index_from_title("Dup").unwrap(), 0);
    }

    #[test]
    fn test_movie_display() {
        let mut movie = Movie::new("Inception", "fzmovies");
        movie.year = 2010;
        assert_eq!(movie.to_string(), "Inception (2010)");
    }

    #[test]
    fn test_props_serialization() {
        let props = Props::new(
            "NetNaija",
            "Movies and series",
            "https://www.thenetnaija.net",
            "https://www.thenetnaija.net/search",
            "https://www.thenetnaija.net/videos/movies",
        )
        .unwrap();

        let json: serde_json::Value = serde_json::to_value(&props).unwrap();
        assert_eq!(json["Name"], "NetNaija");
        assert_eq!(json["BaseURL"], "https://www.thenetnaija.net/");
        assert_eq!(json["SearchURL"], "https://www.thenetnaija.net/search");
        assert_eq!(json["ListURL"], "https://www.thenetnaija.net/videos/movies");
    }

    #[test]
    fn test_props_rejects_relative_url() {
        let props = Props::new("x", "y", "/relative", "https://a.b/s", "https://a.b/l");
        assert!(matches!(props, Err(EngineError::InvalidUrl(_))));
    }

    #[test]
    fn test_props_rebased_keeps_paths() {
        let props = Props::new(
            "FzMovies",
            "",
            "https://fzmovies.net",
            "https://fzmovies.net/csearch.php?searchby=Name",
            "https://fzmovies.net/movieslist.php",
        )
        .unwrap();
        let mirror = Url::parse("http://127.0.0.1:8080").unwrap();
        let rebased = props.rebased(&mirror).unwrap();

        assert_eq!(rebased.base_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(
            rebased.search_url.as_str(),
            "http://127.0.0.1:8080/csearch.php?searchby=Name"
        );
        assert_eq!(rebased.list_url.as_str(), "http://127.0.0.1:8080/movieslist.php");
    }

    #[test]
    fn test_movie_json_round_trip_links() {
        let mut movie = Movie::new("Dark", "netnaija");
        movie.is_series = true;
        movie.download_link = Some(Url::parse("https://cdn.example.com/dark/s01.mkv?token=a%20b").unwrap());
        movie.s_download_link = vec![
            Url::parse("https://cdn.example.com/dark/s01e01.mkv").unwrap(),
            Url::parse("https://cdn.example.com/dark/s01e02.mkv").unwrap(),
        ];

        let json = serde_json::to_string(&movie).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["DownloadLink"],
            "https://cdn.example.com/dark/s01.mkv?token=a%20b"
        );
        assert_eq!(value["SDownloadLink"][1], "https://cdn.example.com/dark/s01e02.mkv");
        assert_eq!(value["IsSeries"], true);

        let decoded: Movie = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, movie);
        assert_eq!(
            decoded.download_link.unwrap().as_str(),
            movie.download_link.as_ref().unwrap().as_str()
        );
    }

    #[test]
    fn test_movie_json_without_links() {
        let movie = Movie::new("Unscraped", "fzmovies");
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["DownloadLink"], "");
        assert!(value.get("SDownloadLink").is_none());

        let decoded: Movie = serde_json::from_value(value).unwrap();
        assert!(decoded.download_link.is_none());
        assert!(decoded.s_download_link.is_empty());
    }

    #[test]
    fn test_movie_json_null_links() {
        let json = r#"{"Index":0,"Title":"Up","CoverPhotoLink":"","Description":"","Size":"",
            "DownloadLink":null,"Year":2009,"IsSeries":false,"SDownloadLink":null,
            "UploadDate":"","Source":"fzmovies"}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.title, "Up");
        assert!(movie.download_link.is_none());
        assert!(movie.s_download_link.is_empty());
    }

    #[test]
    fn test_search_result_json_shape() {
        let json = serde_json::to_value(matrix_result()).unwrap();
        assert_eq!(json["Query"], "matrix");
        assert_eq!(json["Movies"][1]["Index"], 1);
        assert_eq!(json["Movies"][1]["Title"], "The Matrix Reloaded");
    }

    proptest! {
        #[test]
        fn prop_titles_mirror_movies(titles in proptest::collection::vec("[a-c]{0,3}", 0..12)) {
            let movies = titles.iter().map(|t| Movie::new(t.clone(), "netnaija")).collect();
            let result = SearchResult::new("q", movies);
            let listed = result.titles();

            prop_assert_eq!(listed.len(), result.movies.len());
            for (i, title) in listed.iter().enumerate() {
                prop_assert_eq!(title, &result.movies[i].title);
            }
        }

        #[test]
        fn prop_lookups_agree_on_first_match(
            titles in proptest::collection::vec("[a-c]{1,2}", 0..12),
            wanted in "[a-c]{1,2}",
        ) {
            let movies = titles.iter().map(|t| Movie::new(t.clone(), "fzmovies")).collect();
            let result = SearchResult::new("q", movies);
            let expected = titles.iter().position(|t| *t == wanted);

            match expected {
                Some(i) => {
                    prop_assert_eq!(result.get_index_from_title(&wanted).unwrap(), i);
                    prop_assert_eq!(result.get_movie_by_title(&wanted).unwrap().index, i);
                }
                None => {
                    prop_assert!(result.get_index_from_title(&wanted).is_err());
                    prop_assert!(result.get_movie_by_title(&wanted).is_err());
                }
            }
        }
    }
}
