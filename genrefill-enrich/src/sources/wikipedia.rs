//! Wikipedia infobox source

use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::html::{element_text, is_label_text, selector};
use crate::services::http::fetch_text;
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org/wiki";

/// Separators used in infobox cells that list genres as plain text
const TEXT_SEPARATORS: &[char] = &[',', ';', '•', '·'];

/// Article URL for an artist name
///
/// Each `/`-separated part is percent-encoded on its own so names such as
/// `AC/DC` keep their slash.
pub fn article_url(name: &str) -> String {
    let title = name
        .replace(' ', "_")
        .split('/')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", WIKIPEDIA_BASE_URL, title)
}

/// Genres from the infobox row whose header mentions "genre"
///
/// Linked genre names are preferred; citation markers such as `[1]` are
/// skipped. When the cell has no usable links its text is split on list
/// separators instead.
pub fn infobox_genres(html: &str) -> Result<Vec<String>, LookupFailure> {
    let document = Html::parse_document(html);
    let infobox = selector("table.infobox")?;
    let rows = selector("tr")?;
    let header = selector("th")?;
    let cell = selector("td")?;
    let anchors = selector("a")?;

    let Some(table) = document.select(&infobox).next() else {
        return Ok(Vec::new());
    };

    for row in table.select(&rows) {
        let is_genre_row = row
            .select(&header)
            .next()
            .map(|th| element_text(&th).to_lowercase().contains("genre"))
            .unwrap_or(false);
        if !is_genre_row {
            continue;
        }
        let Some(data) = row.select(&cell).next() else {
            continue;
        };

        let mut genres: Vec<String> = data
            .select(&anchors)
            .map(|a| element_text(&a))
            .filter(|text| !text.starts_with('['))
            .filter(|text| is_label_text(text, &[]))
            .collect();

        if genres.is_empty() {
            genres = element_text(&data)
                .split(TEXT_SEPARATORS)
                .map(str::trim)
                .filter(|text| is_label_text(text, &[]))
                .map(str::to_string)
                .collect();
        }

        if !genres.is_empty() {
            genres.truncate(MAX_GENRES);
            return Ok(genres);
        }
    }

    Ok(Vec::new())
}

/// Wikipedia article scrape by artist name
pub struct WikipediaSource {
    http: reqwest::Client,
}

impl WikipediaSource {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GenreSource for WikipediaSource {
    fn label(&self) -> SourceLabel {
        SourceLabel::Wikipedia
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        let url = article_url(&artist.name);
        debug!(url = %url, "Reading Wikipedia article");

        let page = fetch_text(self.http.get(&url)).await?;
        let genres = infobox_genres(&page)?;
        if genres.is_empty() {
            return Err(LookupFailure::Empty);
        }
        Ok(genres)
    }
}
