//! Core Types and Trait Definitions for genrefill-enrich
//!
//! Every external service is wrapped in a [`GenreSource`]. The resolver walks an
//! ordered list of sources and stops at the first one whose filtered answer is
//! non-empty.

use crate::models::ArtistRecord;
use genrefill_common::config::PacingConfig;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Source Labels
// ============================================================================

/// Which service supplied a genre list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceLabel {
    SpotifyId,
    MusicBrainzId,
    SetlistFmId,
    DiceId,
    Spotify,
    LastFm,
    MusicBrainz,
    AllMusic,
    Wikipedia,
}

impl SourceLabel {
    /// Order used by the statistics section of the report and the console summary
    pub const REPORT_ORDER: [SourceLabel; 9] = [
        SourceLabel::SpotifyId,
        SourceLabel::Spotify,
        SourceLabel::MusicBrainzId,
        SourceLabel::MusicBrainz,
        SourceLabel::SetlistFmId,
        SourceLabel::DiceId,
        SourceLabel::LastFm,
        SourceLabel::AllMusic,
        SourceLabel::Wikipedia,
    ];

    /// Human-readable label written to results
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLabel::SpotifyId => "Spotify (ID)",
            SourceLabel::MusicBrainzId => "MusicBrainz (ID)",
            SourceLabel::SetlistFmId => "Setlist.fm (ID)",
            SourceLabel::DiceId => "Dice (ID)",
            SourceLabel::Spotify => "Spotify",
            SourceLabel::LastFm => "Last.fm",
            SourceLabel::MusicBrainz => "MusicBrainz",
            SourceLabel::AllMusic => "AllMusic",
            SourceLabel::Wikipedia => "Wikipedia",
        }
    }

    /// Caption used in the report statistics lines
    pub fn caption(&self) -> &'static str {
        match self {
            SourceLabel::SpotifyId => "Spotify (ID)",
            SourceLabel::Spotify => "Spotify (search)",
            SourceLabel::MusicBrainzId => "MusicBrainz (ID)",
            SourceLabel::MusicBrainz => "MusicBrainz (search)",
            SourceLabel::SetlistFmId => "Setlist.fm (ID)",
            SourceLabel::DiceId => "Dice (ID)",
            SourceLabel::LastFm => "Last.fm",
            SourceLabel::AllMusic => "AllMusic (web)",
            SourceLabel::Wikipedia => "Wikipedia (web)",
        }
    }

    /// Whether this label comes from an external-ID lookup
    pub fn is_id_based(&self) -> bool {
        matches!(
            self,
            SourceLabel::SpotifyId
                | SourceLabel::MusicBrainzId
                | SourceLabel::SetlistFmId
                | SourceLabel::DiceId
        )
    }

    /// Delay to apply after an artist answered by this source
    pub fn pace(source: Option<SourceLabel>, pacing: &PacingConfig) -> Duration {
        let ms = match source {
            Some(SourceLabel::SpotifyId | SourceLabel::Spotify) => pacing.spotify_ms,
            Some(SourceLabel::LastFm) => pacing.lastfm_ms,
            Some(SourceLabel::MusicBrainzId | SourceLabel::MusicBrainz) => pacing.musicbrainz_ms,
            Some(SourceLabel::AllMusic | SourceLabel::Wikipedia) => pacing.scrape_ms,
            _ => pacing.default_ms,
        };
        Duration::from_millis(ms)
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Lookup Failures
// ============================================================================

/// Why a single source produced no genres
///
/// Never aborts a run: the resolver logs it and moves on to the next source.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupFailure {
    /// Artist lacks the identifier, or the source lacks the credential
    #[error("Not applicable: {0}")]
    NotApplicable(&'static str),

    /// Transport error (connect, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Body could not be decoded or parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// No candidate matched the artist
    #[error("No matching artist")]
    NoMatch,

    /// Artist matched but carried no genres
    #[error("No genres")]
    Empty,
}

impl From<reqwest::Error> for LookupFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupFailure::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            LookupFailure::Status(status.as_u16())
        } else {
            LookupFailure::Network(err.to_string())
        }
    }
}

/// Outcome of one source attempt
pub type LookupResult = Result<Vec<String>, LookupFailure>;

// ============================================================================
// Genre Source Trait
// ============================================================================

/// One external service consulted for an artist's genres
///
/// Implementations return the raw genre list (at most 5 entries); filtering is
/// applied by the resolver.
#[async_trait::async_trait]
pub trait GenreSource: Send + Sync {
    /// Label recorded when this source answers
    fn label(&self) -> SourceLabel;

    /// Look up genres for an artist
    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult;
}
