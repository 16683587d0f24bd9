//! Selector and text helpers shared by the site parsers

use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::{EngineError, Result};

/// Compile a CSS selector, mapping failures to `EngineError::ParseError`.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| EngineError::ParseError(format!("Invalid selector {}: {:?}", css, e)))
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text of an element
pub fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Text of the first element matching any of `selectors`, skipping empty ones.
pub fn first_text(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for el in element.select(&selector) {
                let text = element_text(&el);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }

    None
}

/// Attribute `attr` of the first element matching any of `selectors`.
pub fn first_attr(element: &ElementRef, selectors: &[&str], attr: &str) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for el in element.select(&selector) {
                if let Some(value) = el.value().attr(attr) {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }

    None
}

/// Resolve a possibly relative link against the page it was found on.
pub fn resolve_link(page: &Url, href: &str) -> Option<Url> {
    page.join(href.trim()).ok()
}

/// Extract a four digit release year from text (e.g. "(1999)" or "1999").
pub fn extract_year(text: &str) -> Option<u32> {
    let re_paren = regex_lite::Regex::new(r"\(((?:19|20)\d{2})\)").ok()?;
    if let Some(caps) = re_paren.captures(text) {
        return caps.get(1)?.as_str().parse().ok();
    }

    let re_year = regex_lite::Regex::new(r"\b((?:19|20)\d{2})\b").ok()?;
    let caps = re_year.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Split a display title like "The Matrix (1999)" into title and year.
///
/// Titles without a trailing parenthesised year are returned unchanged.
pub fn split_title_year(raw: &str) -> (String, Option<u32>) {
    let raw = clean_text(raw);
    let re = match regex_lite::Regex::new(r"^(.*?)\s*\(((?:19|20)\d{2})\)\s*$") {
        Ok(re) => re,
        Err(_) => return (raw, None),
    };

    match re.captures(&raw) {
        Some(caps) => {
            let title = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            let year = caps.get(2).and_then(|m| m.as_str().parse().ok());
            if title.is_empty() {
                (raw.clone(), year)
            } else {
                (title, year)
            }
        }
        None => (raw, None),
    }
}

/// Extract a file size such as "1.2 GB" or "700MB" from text.
pub fn extract_size(text: &str) -> Option<String> {
    let re = regex_lite::Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(GB|MB|KB)\b").ok()?;
    let caps = re.captures(text)?;
    Some(format!(
        "{} {}",
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str().to_uppercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  The \n  Matrix\t"), "The Matrix");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("The Matrix (1999)"), Some(1999));
        assert_eq!(extract_year("Released 2021 in cinemas"), Some(2021));
        assert_eq!(extract_year("no year here"), None);
        assert_eq!(extract_year("Top 1080p"), None);
    }

    #[test]
    fn test_split_title_year() {
        assert_eq!(
            split_title_year("The Matrix (1999)"),
            ("The Matrix".to_string(), Some(1999))
        );
        assert_eq!(split_title_year("  Dark  "), ("Dark".to_string(), None));
        assert_eq!(
            split_title_year("1917 (2019)"),
            ("1917".to_string(), Some(2019))
        );
    }

    #[test]
    fn test_extract_size() {
        assert_eq!(extract_size("Size: 1.2 GB"), Some("1.2 GB".to_string()));
        assert_eq!(extract_size("(700mb)"), Some("700 MB".to_string()));
        assert_eq!(extract_size("unknown"), None);
    }

    #[test]
    fn test_resolve_link() {
        let page = Url::parse("https://fzmovies.net/movieslist.php?pg=2").unwrap();
        assert_eq!(
            resolve_link(&page, "movie-Up--hmp4.htm").unwrap().as_str(),
            "https://fzmovies.net/movie-Up--hmp4.htm"
        );
        assert_eq!(
            resolve_link(&page, "https://cdn.example.com/a.mp4").unwrap().as_str(),
            "https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn test_first_text_and_attr_fallbacks() {
        let html = Html::parse_fragment(
            r#"<div><p class="empty"> </p><p class="sum">Plot here</p><img data-src="/a.jpg"></div>"#,
        );
        let root = html.root_element();
        assert_eq!(
            first_text(&root, &[".missing", "p.empty", "p.sum"]),
            Some("Plot here".to_string())
        );
        assert_eq!(first_attr(&root, &["img"], "src"), None);
        assert_eq!(first_attr(&root, &["img"], "data-src"), Some("/a.jpg".to_string()));
    }

    #[test]
    fn test_selector_error() {
        assert!(matches!(selector("a[["), Err(EngineError::ParseError(_))));
    }
}
