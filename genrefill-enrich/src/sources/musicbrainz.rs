//! MusicBrainz API source
//!
//! Artist tags, ranked by vote count, stand in for genres. Lookup by MBID is
//! a single request; name search fetches the tag list of each candidate in
//! turn until one has usable tags.
//!
//! # API Reference
//! - Lookup: `GET https://musicbrainz.org/ws/2/artist/{mbid}?inc=tags&fmt=json`
//! - Search: `GET https://musicbrainz.org/ws/2/artist/?query=...&limit=5&fmt=json`
//! - Rate Limit: 1 request/second (as per MusicBrainz Terms of Service)

use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::http::fetch_json;
use crate::services::name_matcher::musicbrainz_queries;
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

const MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2";

/// Rate limit: 1 request per second (MusicBrainz TOS)
const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(1000);

/// Candidates requested per search
const SEARCH_LIMIT: &str = "5";

/// MusicBrainz artist with tags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MbArtist {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub tags: Vec<MbTag>,
}

/// MusicBrainz folksonomy tag
#[derive(Debug, Clone, Deserialize)]
pub struct MbTag {
    pub name: String,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
struct MbSearchResponse {
    #[serde(default)]
    artists: Vec<MbSearchHit>,
}

#[derive(Debug, Deserialize)]
struct MbSearchHit {
    id: Option<String>,
}

/// Tags ordered by vote count (highest first), first five, positive counts only
pub fn top_tags(tags: &[MbTag]) -> Vec<String> {
    let mut sorted: Vec<&MbTag> = tags.iter().collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
        .into_iter()
        .take(MAX_GENRES)
        .filter(|tag| tag.count > 0)
        .map(|tag| tag.name.clone())
        .collect()
}

/// Rate limiter enforcing a minimum interval between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait if necessary to comply with rate limit
    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!(
                    sleep_ms = wait_time.as_millis(),
                    "Rate limiting: sleeping before MusicBrainz request"
                );
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http: Client,
    rate_limiter: RateLimiter,
}

impl MusicBrainzClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            rate_limiter: RateLimiter::new(RATE_LIMIT_INTERVAL),
        }
    }

    /// Ranked tags of an artist by MBID
    pub async fn artist_tags(&self, mbid: &str) -> LookupResult {
        self.rate_limiter.wait().await;

        let url = format!("{}/artist/{}", MUSICBRAINZ_API_URL, urlencoding::encode(mbid));
        debug!(mbid = %mbid, "Querying MusicBrainz artist");

        let artist: MbArtist = fetch_json(
            self.http
                .get(&url)
                .query(&[("inc", "tags"), ("fmt", "json")]),
        )
        .await?;

        let tags = top_tags(&artist.tags);
        if tags.is_empty() {
            return Err(LookupFailure::Empty);
        }
        Ok(tags)
    }

    /// MBIDs of search candidates for a query
    async fn search(&self, query: &str) -> Result<Vec<String>, LookupFailure> {
        self.rate_limiter.wait().await;

        let url = format!("{}/artist/", MUSICBRAINZ_API_URL);
        debug!(query = %query, "Searching MusicBrainz");

        let response: MbSearchResponse = fetch_json(self.http.get(&url).query(&[
            ("query", query),
            ("limit", SEARCH_LIMIT),
            ("fmt", "json"),
        ]))
        .await?;

        Ok(response
            .artists
            .into_iter()
            .filter_map(|hit| hit.id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Ranked tags of the first search candidate that has any
    pub async fn search_tags(&self, name: &str) -> LookupResult {
        let mut last_failure = LookupFailure::NoMatch;

        for query in musicbrainz_queries(name) {
            let candidates = match self.search(&query).await {
                Ok(candidates) => candidates,
                Err(failure) => {
                    debug!(query = %query, %failure, "MusicBrainz search failed");
                    last_failure = failure;
                    continue;
                }
            };

            for mbid in candidates {
                match self.artist_tags(&mbid).await {
                    Ok(tags) => return Ok(tags),
                    Err(failure) => last_failure = failure,
                }
            }
        }

        Err(last_failure)
    }
}

/// MusicBrainz lookup by the artist's MBID
pub struct MusicBrainzById {
    client: Arc<MusicBrainzClient>,
}

impl MusicBrainzById {
    pub fn new(client: Arc<MusicBrainzClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenreSource for MusicBrainzById {
    fn label(&self) -> SourceLabel {
        SourceLabel::MusicBrainzId
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        let mbid = artist
            .external_id("musicbrainz")
            .ok_or(LookupFailure::NotApplicable("no MusicBrainz ID"))?;
        self.client.artist_tags(mbid).await
    }
}

/// MusicBrainz search by artist name
pub struct MusicBrainzSearch {
    client: Arc<MusicBrainzClient>,
}

impl MusicBrainzSearch {
    pub fn new(client: Arc<MusicBrainzClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenreSource for MusicBrainzSearch {
    fn label(&self) -> SourceLabel {
        SourceLabel::MusicBrainz
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        self.client.search_tags(&artist.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_tags_ranks_by_count() {
        let artist: MbArtist = serde_json::from_str(
            r#"{
                "id": "a74b1b7f-71a5-4011-9441-d0b5e4122711",
                "tags": [
                    {"name": "rock", "count": 3},
                    {"name": "alternative rock", "count": 11},
                    {"name": "british", "count": 7},
                    {"name": "misc", "count": 0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            top_tags(&artist.tags),
            vec!["alternative rock".to_string(), "british".to_string(), "rock".to_string()]
        );
    }

    #[test]
    fn test_top_tags_takes_five_before_dropping_zero_counts() {
        let tags: Vec<MbTag> = (0..7)
            .map(|i| MbTag {
                name: format!("tag{}", i),
                count: 7 - i,
            })
            .collect();
        assert_eq!(top_tags(&tags).len(), 5);

        let none_voted = vec![MbTag { name: "x".into(), count: 0 }];
        assert!(top_tags(&none_voted).is_empty());
    }

    #[test]
    fn test_artist_without_tags_parses() {
        let artist: MbArtist = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(artist.tags.is_empty());
    }

    #[test]
    fn test_search_response_ids() {
        let response: MbSearchResponse = serde_json::from_str(
            r#"{"artists": [{"id": "one", "score": 100}, {"score": 90}]}"#,
        )
        .unwrap();
        let ids: Vec<String> = response.artists.into_iter().filter_map(|h| h.id).collect();
        assert_eq!(ids, vec!["one".to_string()]);
    }

    #[tokio::test]
    async fn test_rate_limiter_timing() {
        let limiter = RateLimiter::new(Duration::from_millis(200));

        let start = Instant::now();
        limiter.wait().await;
        let first_elapsed = start.elapsed();
        limiter.wait().await;
        let second_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(100));
        assert!(second_elapsed >= Duration::from_millis(180));
    }
}
