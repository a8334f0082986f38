//! AllMusic source
//!
//! Artist search page, then the genre section of the first matching artist page.

use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::html::{
    absolute_url, class_matches, dedup_keep_order, element_text, is_label_text, selector,
};
use crate::services::http::fetch_text;
use crate::services::name_matcher::name_variants;
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

const ALLMUSIC_ORIGIN: &str = "https://www.allmusic.com";

/// Search result containers inspected
const RESULTS_INSPECTED: usize = 10;

/// Name words shorter than this are not used for loose matching
const MIN_MATCH_WORD_CHARS: usize = 4;

static RESULT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)result|artist").expect("static regex"));
static GENRE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)genre").expect("static regex"));

const IGNORED_LABELS: &[&str] = &["genre", "genres", "more"];

/// Loose match of a result link against a searched name
fn link_matches(link_text: &str, name: &str) -> bool {
    let text = link_text.to_lowercase();
    let name = name.to_lowercase();
    if text.is_empty() {
        return false;
    }

    let squash = |s: &str| s.chars().filter(|c| *c != ' ').collect::<String>();

    text.contains(&name)
        || name.contains(&text)
        || squash(&text).contains(&squash(&name))
        || name
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_MATCH_WORD_CHARS)
            .any(|word| text.contains(word))
}

/// First artist link in the search results whose text matches the name
pub fn find_artist_link(html: &str, name: &str) -> Result<Option<String>, LookupFailure> {
    let document = Html::parse_document(html);
    let containers = selector("div[class]")?;
    let links = selector("a[href]")?;

    for result in document
        .select(&containers)
        .filter(|div| class_matches(div, &RESULT_CLASS))
        .take(RESULTS_INSPECTED)
    {
        let link = result.select(&links).find(|a| {
            a.value()
                .attr("href")
                .map(|href| href.to_lowercase().contains("/artist/"))
                .unwrap_or(false)
        });

        if let Some(link) = link {
            if link_matches(&element_text(&link), name) {
                if let Some(href) = link.value().attr("href") {
                    return Ok(Some(absolute_url(ALLMUSIC_ORIGIN, href)));
                }
            }
        }
    }

    Ok(None)
}

/// Anchor texts of the artist page's genre section, at most five
pub fn artist_page_genres(html: &str) -> Result<Vec<String>, LookupFailure> {
    let document = Html::parse_document(html);
    let sections = selector("section[class]")?;
    let divs = selector("div[class]")?;
    let anchors = selector("a")?;

    let genre_section = document
        .select(&sections)
        .find(|el| class_matches(el, &GENRE_CLASS))
        .or_else(|| {
            document
                .select(&divs)
                .find(|el| class_matches(el, &GENRE_CLASS))
        });

    let Some(section) = genre_section else {
        return Ok(Vec::new());
    };

    let genres: Vec<String> = section
        .select(&anchors)
        .map(|a| element_text(&a))
        .filter(|text| is_label_text(text, IGNORED_LABELS))
        .collect();

    let mut genres = dedup_keep_order(genres);
    genres.truncate(MAX_GENRES);
    Ok(genres)
}

/// AllMusic scrape by artist name
pub struct AllMusicSource {
    http: Client,
}

impl AllMusicSource {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn genres_for(&self, name: &str) -> LookupResult {
        let search_url = format!(
            "{}/search/artists/{}",
            ALLMUSIC_ORIGIN,
            urlencoding::encode(name)
        );
        let search = fetch_text(self.http.get(&search_url)).await?;

        let artist_url = find_artist_link(&search, name)?.ok_or(LookupFailure::NoMatch)?;
        debug!(url = %artist_url, "Reading AllMusic artist page");

        let page = fetch_text(self.http.get(&artist_url)).await?;
        let genres = artist_page_genres(&page)?;
        if genres.is_empty() {
            return Err(LookupFailure::Empty);
        }
        Ok(genres)
    }
}

#[async_trait]
impl GenreSource for AllMusicSource {
    fn label(&self) -> SourceLabel {
        SourceLabel::AllMusic
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        let mut last_failure = LookupFailure::NoMatch;

        for name in name_variants(&artist.name) {
            match self.genres_for(&name).await {
                Ok(genres) => return Ok(genres),
                Err(failure) => {
                    debug!(artist = %name, %failure, "AllMusic lookup failed");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_matches() {
        assert!(link_matches("Boards of Canada", "Boards of Canada"));
        assert!(link_matches("BoardsofCanada", "Boards of Canada"));
        assert!(link_matches("Canada Choir", "Boards of Canada"));
        assert!(!link_matches("Of Montreal", "Boards of Canada"));
        assert!(!link_matches("", "Boards of Canada"));
    }

    #[test]
    fn test_find_artist_link() {
        let html = r#"
            <div class="search-header"><a href="/search/all/x">All results</a></div>
            <div class="artist-result">
              <a href="/artist/someone-else-mn0000000001">Someone Else</a>
            </div>
            <div class="artist-result">
              <a href="/artist/boards-of-canada-mn0000016853">Boards of Canada</a>
            </div>
        "#;
        let link = find_artist_link(html, "Boards of Canada").unwrap();
        assert_eq!(
            link.as_deref(),
            Some("https://www.allmusic.com/artist/boards-of-canada-mn0000016853")
        );
    }

    #[test]
    fn test_artist_page_genres_prefers_section() {
        let html = r#"
            <div class="genre-sidebar"><a href="/g/x">Sidebar</a></div>
            <section class="basicInfo genre">
              <h4>Genre</h4>
              <a href="/genre/electronic">Electronic</a>
              <a href="/genre/electronic">Electronic</a>
              <a href="/style/idm">IDM</a>
              <a href="/genre">More</a>
            </section>
        "#;
        assert_eq!(
            artist_page_genres(html).unwrap(),
            vec!["Electronic".to_string(), "IDM".to_string()]
        );
    }

    #[test]
    fn test_artist_page_genres_falls_back_to_div() {
        let html = r#"<div class="genres"><a href="/g">Ambient</a></div>"#;
        assert_eq!(artist_page_genres(html).unwrap(), vec!["Ambient".to_string()]);
        assert!(artist_page_genres("<p>nothing</p>").unwrap().is_empty());
    }
}
