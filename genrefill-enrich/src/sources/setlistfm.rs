//! Setlist.fm source
//!
//! Setlist.fm artist URLs embed the artist UUID, so the search page is scanned
//! for an artist link carrying the known identifier and that page's tag-like
//! elements are read.

use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::html::{absolute_url, collect_classed_texts, selector};
use crate::services::http::fetch_text;
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

const SETLISTFM_ORIGIN: &str = "https://www.setlist.fm";

/// Search result links inspected
const LINKS_INSPECTED: usize = 10;

static TAG_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tag|genre|label").expect("static regex"));

const IGNORED_LABELS: &[&str] = &["tag", "tags", "genre", "genres"];

fn compact_id(id: &str) -> String {
    id.to_lowercase().replace('-', "")
}

/// Artist page links from a search page whose href carries the identifier
pub fn find_artist_links(html: &str, setlistfm_id: &str) -> Result<Vec<String>, LookupFailure> {
    let wanted = compact_id(setlistfm_id);
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let document = Html::parse_document(html);
    let links = selector("a[href]")?;

    Ok(document
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.to_lowercase().contains("/artist/"))
        .take(LINKS_INSPECTED)
        .filter(|href| compact_id(href).contains(&wanted))
        .map(|href| absolute_url(SETLISTFM_ORIGIN, href))
        .collect())
}

/// Tag-like labels on an artist page, at most five
pub fn artist_page_tags(html: &str) -> Result<Vec<String>, LookupFailure> {
    let mut tags = collect_classed_texts(html, "a, span", &TAG_CLASS, IGNORED_LABELS)?;
    tags.truncate(MAX_GENRES);
    Ok(tags)
}

/// Setlist.fm lookup by the artist's Setlist.fm identifier
pub struct SetlistFmById {
    http: Client,
}

impl SetlistFmById {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GenreSource for SetlistFmById {
    fn label(&self) -> SourceLabel {
        SourceLabel::SetlistFmId
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        let setlistfm_id = artist
            .external_id("setlistfm")
            .ok_or(LookupFailure::NotApplicable("no Setlist.fm ID"))?;
        if artist.name.trim().is_empty() {
            return Err(LookupFailure::NotApplicable("no artist name"));
        }

        debug!(setlistfm_id = %setlistfm_id, artist = %artist.name, "Searching Setlist.fm");
        let search = fetch_text(
            self.http
                .get(format!("{}/search", SETLISTFM_ORIGIN))
                .query(&[("query", artist.name.as_str()), ("type", "artist")]),
        )
        .await?;

        let links = find_artist_links(&search, setlistfm_id)?;
        if links.is_empty() {
            return Err(LookupFailure::NoMatch);
        }

        let mut last_failure = LookupFailure::Empty;
        for url in links {
            match fetch_text(self.http.get(&url)).await {
                Ok(page) => {
                    let tags = artist_page_tags(&page)?;
                    if !tags.is_empty() {
                        return Ok(tags);
                    }
                }
                Err(failure) => {
                    debug!(url = %url, %failure, "Setlist.fm artist page failed");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}
