//! Genre sources
//!
//! Each source implements [`GenreSource`]. [`standard_sources`] builds them in
//! the order they are consulted: identifier lookups first, then name searches,
//! then page scrapes.

pub mod allmusic;
pub mod dice;
pub mod lastfm;
pub mod musicbrainz;
pub mod setlistfm;
pub mod spotify;
pub mod wikipedia;

pub use allmusic::AllMusicSource;
pub use dice::DiceById;
pub use lastfm::LastFmSource;
pub use musicbrainz::{MusicBrainzById, MusicBrainzClient, MusicBrainzSearch};
pub use setlistfm::SetlistFmById;
pub use spotify::{request_token, SpotifyById, SpotifyClient, SpotifySearch};
pub use wikipedia::WikipediaSource;

use crate::config::EnrichConfig;
use crate::services::HttpClients;
use crate::types::GenreSource;
use std::sync::Arc;

/// All sources in consultation order
///
/// `spotify_token` is the app token obtained at startup; without it both
/// Spotify sources report themselves not applicable.
pub fn standard_sources(
    config: &EnrichConfig,
    clients: &HttpClients,
    spotify_token: Option<String>,
) -> Vec<Box<dyn GenreSource>> {
    let spotify = Arc::new(SpotifyClient::new(clients.api.clone(), spotify_token));
    let musicbrainz = Arc::new(MusicBrainzClient::new(clients.musicbrainz.clone()));

    vec![
        Box::new(SpotifyById::new(spotify.clone())),
        Box::new(MusicBrainzById::new(musicbrainz.clone())),
        Box::new(SetlistFmById::new(clients.browser.clone())),
        Box::new(DiceById::new(clients.browser.clone())),
        Box::new(SpotifySearch::new(spotify)),
        Box::new(LastFmSource::new(
            clients.api.clone(),
            config.lastfm_api_key.clone(),
        )),
        Box::new(MusicBrainzSearch::new(musicbrainz)),
        Box::new(AllMusicSource::new(clients.browser.clone())),
        Box::new(WikipediaSource::new(clients.browser.clone())),
    ]
}
