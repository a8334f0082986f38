//! Last.fm top-tags source
//!
//! `artist.gettoptags` returns user tags ordered by weight. Many of them are
//! listening habits rather than genres ("seen live", "favorites"), so the first
//! ten are screened before the best five are kept.

use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::http::fetch_json;
use crate::services::name_matcher::name_variants;
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const LASTFM_API_URL: &str = "http://ws.audioscrobbler.com/2.0/";

/// Tags inspected per response
const TAGS_INSPECTED: usize = 10;

/// Tags rejected on exact (lowercase) match
const EXCLUDED_TAGS: &[&str] = &[
    "seen live",
    "favorites",
    "my library",
    "under 2000 listeners",
    "seen-live",
    "favorite",
    "library",
    "all",
    "rock",
    "pop",
    "music",
    "times",
    "2 times",
    "seen live 2 times",
];

/// Tags rejected when they contain any of these
const EXCLUDED_TERMS: &[&str] = &[
    "seen live",
    "favorites",
    "my library",
    "under 2000 listeners",
    "seen-live",
    "favorite",
    "library",
    "all",
    "times",
];

#[derive(Debug, Default, Deserialize)]
struct TopTagsResponse {
    #[serde(default)]
    toptags: TopTags,
}

#[derive(Debug, Default, Deserialize)]
struct TopTags {
    #[serde(default)]
    tag: Vec<LastFmTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastFmTag {
    #[serde(default)]
    pub name: String,
}

/// Genre-like tags among the first ten, at most five, original casing kept
pub fn genre_tags(tags: &[LastFmTag]) -> Vec<String> {
    tags.iter()
        .take(TAGS_INSPECTED)
        .filter(|tag| {
            let lower = tag.name.to_lowercase();
            lower.chars().count() > 2
                && !EXCLUDED_TAGS.contains(&lower.as_str())
                && !EXCLUDED_TERMS.iter().any(|term| lower.contains(term))
        })
        .take(MAX_GENRES)
        .map(|tag| tag.name.clone())
        .collect()
}

/// Last.fm top-tags by artist name
pub struct LastFmSource {
    http: Client,
    api_key: Option<String>,
}

impl LastFmSource {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    async fn top_tags(&self, api_key: &str, name: &str) -> Result<Vec<LastFmTag>, LookupFailure> {
        let request = self.http.get(LASTFM_API_URL).query(&[
            ("method", "artist.gettoptags"),
            ("artist", name),
            ("api_key", api_key),
            ("format", "json"),
        ]);
        let response: TopTagsResponse = fetch_json(request).await?;
        Ok(response.toptags.tag)
    }
}

#[async_trait]
impl GenreSource for LastFmSource {
    fn label(&self) -> SourceLabel {
        SourceLabel::LastFm
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupFailure::NotApplicable("no Last.fm API key"))?;
        let mut last_failure = LookupFailure::Empty;

        for name in name_variants(&artist.name) {
            debug!(artist = %name, "Querying Last.fm top tags");

            match self.top_tags(api_key, &name).await {
                Ok(tags) => {
                    let genres = genre_tags(&tags);
                    if !genres.is_empty() {
                        return Ok(genres);
                    }
                }
                Err(failure) => {
                    debug!(artist = %name, %failure, "Last.fm lookup failed");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}
