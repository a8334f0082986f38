//! Dice source
//!
//! Dice is a ticketing site and rarely shows genres. Its search page links to
//! artist and event pages; those whose link text names the artist are read for
//! tag, genre, category or style elements.

use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::html::{absolute_url, collect_classed_texts, element_text, selector};
use crate::services::http::fetch_text;
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use tracing::debug;

const DICE_ORIGIN: &str = "https://dice.fm";

/// Search result links inspected
const LINKS_INSPECTED: usize = 10;

static TAG_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tag|genre|category|style").expect("static regex"));

const IGNORED_LABELS: &[&str] = &[
    "genre",
    "genres",
    "tag",
    "tags",
    "category",
    "categories",
    "style",
];

/// Either name contains the other (case-insensitive); empty link text never matches
fn link_names_artist(link_text: &str, artist_name: &str) -> bool {
    let text = link_text.to_lowercase();
    let name = artist_name.to_lowercase();
    !text.is_empty() && (text.contains(&name) || name.contains(&text))
}

/// Artist or event links from a search page whose text names the artist
pub fn find_candidate_links(html: &str, artist_name: &str) -> Result<Vec<String>, LookupFailure> {
    let document = Html::parse_document(html);
    let links = selector("a[href]")?;

    Ok(document
        .select(&links)
        .filter(|a| {
            a.value()
                .attr("href")
                .map(|href| {
                    let href = href.to_lowercase();
                    href.contains("/artist/") || href.contains("/event/")
                })
                .unwrap_or(false)
        })
        .take(LINKS_INSPECTED)
        .filter(|a| link_names_artist(&element_text(a), artist_name))
        .filter_map(|a| a.value().attr("href"))
        .map(|href| absolute_url(DICE_ORIGIN, href))
        .collect())
}

/// Tag-like labels on an artist or event page, at most five
pub fn page_tags(html: &str) -> Result<Vec<String>, LookupFailure> {
    let mut tags = collect_classed_texts(html, "span, div, a, p", &TAG_CLASS, IGNORED_LABELS)?;
    tags.truncate(MAX_GENRES);
    Ok(tags)
}

/// Dice lookup, enabled by the artist's Dice identifier
pub struct DiceById {
    http: Client,
}

impl DiceById {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GenreSource for DiceById {
    fn label(&self) -> SourceLabel {
        SourceLabel::DiceId
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        artist
            .external_id("dice")
            .ok_or(LookupFailure::NotApplicable("no Dice ID"))?;
        if artist.name.trim().is_empty() {
            return Err(LookupFailure::NotApplicable("no artist name"));
        }

        debug!(artist = %artist.name, "Searching Dice");
        let search = fetch_text(
            self.http
                .get(format!("{}/search", DICE_ORIGIN))
                .query(&[("q", artist.name.as_str())]),
        )
        .await?;

        let links = find_candidate_links(&search, &artist.name)?;
        if links.is_empty() {
            return Err(LookupFailure::NoMatch);
        }

        let mut last_failure = LookupFailure::Empty;
        for url in links {
            match fetch_text(self.http.get(&url)).await {
                Ok(page) => {
                    let tags = page_tags(&page)?;
                    if !tags.is_empty() {
                        return Ok(tags);
                    }
                }
                Err(failure) => {
                    debug!(url = %url, %failure, "Dice page failed");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}
