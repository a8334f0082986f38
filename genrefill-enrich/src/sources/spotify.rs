//! Spotify Web API source
//!
//! Uses the client-credentials flow. One token is requested at startup and
//! shared by the lookup-by-ID and search sources; without a token both report
//! `NotApplicable`.
//!
//! # API Reference
//! - Token: `POST https://accounts.spotify.com/api/token`
//! - Artist: `GET https://api.spotify.com/v1/artists/{id}`
//! - Search: `GET https://api.spotify.com/v1/search?q=...&type=artist`

use crate::config::SpotifyCredentials;
use crate::models::{ArtistRecord, MAX_GENRES};
use crate::services::http::fetch_json;
use crate::services::name_matcher::{name_variants, names_match, MatchThresholds};
use crate::types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Candidates requested per search
const SEARCH_LIMIT: &str = "20";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Artist object as returned by the artist and search endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyArtist {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: ArtistPage,
}

#[derive(Debug, Default, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<SpotifyArtist>,
}

/// Request an app token with the client-credentials flow
pub async fn request_token(
    http: &Client,
    credentials: &SpotifyCredentials,
) -> Result<String, LookupFailure> {
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];

    let token: TokenResponse = fetch_json(http.post(TOKEN_URL).form(&form)).await?;
    Ok(token.access_token)
}

/// First candidate that names the wanted artist and carries genres
pub fn pick_matching_genres(
    candidates: &[SpotifyArtist],
    wanted: &str,
    thresholds: &MatchThresholds,
) -> Option<Vec<String>> {
    candidates
        .iter()
        .filter(|c| !c.genres.is_empty())
        .find(|c| names_match(wanted, &c.name, thresholds))
        .map(|c| c.genres.iter().take(MAX_GENRES).cloned().collect())
}

/// Spotify Web API client
pub struct SpotifyClient {
    http: Client,
    token: Option<String>,
    thresholds: MatchThresholds,
}

impl SpotifyClient {
    pub fn new(http: Client, token: Option<String>) -> Self {
        Self {
            http,
            token,
            thresholds: MatchThresholds::default(),
        }
    }

    fn token(&self) -> Result<&str, LookupFailure> {
        self.token
            .as_deref()
            .ok_or(LookupFailure::NotApplicable("no Spotify token"))
    }

    /// Genres of an artist by Spotify ID
    pub async fn artist_genres(&self, spotify_id: &str) -> LookupResult {
        let token = self.token()?;
        let url = format!("{}/artists/{}", API_BASE_URL, urlencoding::encode(spotify_id));

        debug!(spotify_id = %spotify_id, "Querying Spotify artist");

        let artist: SpotifyArtist = fetch_json(self.http.get(&url).bearer_auth(token)).await?;
        if artist.genres.is_empty() {
            return Err(LookupFailure::Empty);
        }
        Ok(artist.genres.into_iter().take(MAX_GENRES).collect())
    }

    /// Genres of the first search hit matching the name, trying each name variant
    pub async fn search_genres(&self, name: &str) -> LookupResult {
        let token = self.token()?;
        let url = format!("{}/search", API_BASE_URL);
        let mut last_failure = LookupFailure::NoMatch;

        for query in name_variants(name) {
            debug!(query = %query, "Searching Spotify");

            let request = self
                .http
                .get(&url)
                .bearer_auth(token)
                .query(&[("q", query.as_str()), ("type", "artist"), ("limit", SEARCH_LIMIT)]);

            match fetch_json::<SearchResponse>(request).await {
                Ok(response) => {
                    if let Some(genres) =
                        pick_matching_genres(&response.artists.items, name, &self.thresholds)
                    {
                        return Ok(genres);
                    }
                }
                Err(failure) => {
                    debug!(query = %query, %failure, "Spotify search failed");
                    last_failure = failure;
                }
            }
        }

        Err(last_failure)
    }
}

/// Spotify lookup by the artist's Spotify ID
pub struct SpotifyById {
    client: Arc<SpotifyClient>,
}

impl SpotifyById {
    pub fn new(client: Arc<SpotifyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenreSource for SpotifyById {
    fn label(&self) -> SourceLabel {
        SourceLabel::SpotifyId
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        let spotify_id = artist
            .external_id("spotify")
            .ok_or(LookupFailure::NotApplicable("no Spotify ID"))?;
        self.client.artist_genres(spotify_id).await
    }
}

/// Spotify search by artist name
pub struct SpotifySearch {
    client: Arc<SpotifyClient>,
}

impl SpotifySearch {
    pub fn new(client: Arc<SpotifyClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenreSource for SpotifySearch {
    fn label(&self) -> SourceLabel {
        SourceLabel::Spotify
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        self.client.search_genres(&artist.name).await
    }
}
