//! Genre resolution chain
//!
//! Sources are consulted in order until one yields a non-empty list after
//! filtering. Failures never propagate: each is logged at debug level with its
//! reason and the next source is tried.

use crate::config::EnrichConfig;
use crate::models::{ArtistRecord, GenreResult};
use crate::services::{filter_genres, HttpClients};
use crate::sources::{request_token, standard_sources};
use crate::types::{GenreSource, LookupFailure, SourceLabel};
use genrefill_common::Result;
use tracing::{debug, info, warn};

/// Which credentialed services are usable for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceReadiness {
    pub spotify: bool,
    pub lastfm: bool,
}

/// Ordered chain of genre sources
pub struct GenreResolver {
    sources: Vec<Box<dyn GenreSource>>,
}

impl GenreResolver {
    pub fn new(sources: Vec<Box<dyn GenreSource>>) -> Self {
        Self { sources }
    }

    /// Labels of the chain, in consultation order
    pub fn labels(&self) -> Vec<SourceLabel> {
        self.sources.iter().map(|s| s.label()).collect()
    }

    /// Genres and answering source, or `None` when every source came up empty
    pub async fn resolve(&self, artist: &ArtistRecord) -> Option<(Vec<String>, SourceLabel)> {
        for source in &self.sources {
            let label = source.label();

            let raw = match source.lookup(artist).await {
                Ok(genres) => genres,
                Err(LookupFailure::NotApplicable(reason)) => {
                    debug!(artist = %artist.name, source = %label, reason, "Source skipped");
                    continue;
                }
                Err(failure) => {
                    debug!(artist = %artist.name, source = %label, %failure, "Source lookup failed");
                    continue;
                }
            };

            let genres = filter_genres(&raw);
            if genres.is_empty() {
                debug!(
                    artist = %artist.name,
                    source = %label,
                    raw = ?raw,
                    "Source genres removed by filter"
                );
                continue;
            }

            return Some((genres, label));
        }

        None
    }

    /// Result row for an artist, the placeholder when nothing was found
    pub async fn resolve_result(&self, artist: &ArtistRecord) -> GenreResult {
        match self.resolve(artist).await {
            Some((genres, label)) => GenreResult::found(artist, genres, label),
            None => GenreResult::placeholder(artist),
        }
    }
}

/// Build the standard chain, requesting the Spotify token up front
///
/// A token failure is logged and disables the Spotify sources; it does not
/// abort the run.
pub async fn build_resolver(config: &EnrichConfig) -> Result<(GenreResolver, SourceReadiness)> {
    let clients = HttpClients::new(&config.http)?;

    let spotify_token = match &config.spotify {
        Some(credentials) => match request_token(&clients.api, credentials).await {
            Ok(token) => {
                info!("Spotify token acquired");
                Some(token)
            }
            Err(failure) => {
                warn!(%failure, "Spotify token request failed; Spotify sources disabled");
                None
            }
        },
        None => None,
    };

    let readiness = SourceReadiness {
        spotify: spotify_token.is_some(),
        lastfm: config.lastfm_api_key.is_some(),
    };

    let resolver = GenreResolver::new(standard_sources(config, &clients, spotify_token));
    Ok((resolver, readiness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LookupResult;
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    struct Fixed {
        label: SourceLabel,
        result: LookupResult,
    }

    #[async_trait]
    impl GenreSource for Fixed {
        fn label(&self) -> SourceLabel {
            self.label
        }

        async fn lookup(&self, _artist: &ArtistRecord) -> LookupResult {
            self.result.clone()
        }
    }

    fn fixed(label: SourceLabel, result: LookupResult) -> Box<dyn GenreSource> {
        Box::new(Fixed { label, result })
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn artist() -> ArtistRecord {
        ArtistRecord::new("a1", "Anyone", BTreeMap::new(), 2)
    }

    #[tokio::test]
    async fn test_first_non_empty_source_wins() {
        let resolver = GenreResolver::new(vec![
            fixed(SourceLabel::SpotifyId, Err(LookupFailure::NotApplicable("no Spotify ID"))),
            fixed(SourceLabel::MusicBrainzId, Err(LookupFailure::Status(503))),
            fixed(SourceLabel::LastFm, Ok(strings(&["shoegaze"]))),
            fixed(SourceLabel::Wikipedia, Ok(strings(&["rock"]))),
        ]);

        let resolved = resolver.resolve(&artist()).await;
        assert_eq!(resolved, Some((strings(&["shoegaze"]), SourceLabel::LastFm)));
    }

    #[tokio::test]
    async fn test_filtered_out_result_falls_through() {
        let resolver = GenreResolver::new(vec![
            fixed(
                SourceLabel::AllMusic,
                Ok(strings(&["Blues", "Classical", "Country", "Electronic", "Folk"])),
            ),
            fixed(SourceLabel::Wikipedia, Ok(strings(&["Folk rock"]))),
        ]);

        let resolved = resolver.resolve(&artist()).await;
        assert_eq!(resolved, Some((strings(&["Folk rock"]), SourceLabel::Wikipedia)));
    }

    #[tokio::test]
    async fn test_placeholder_when_all_sources_fail() {
        let resolver = GenreResolver::new(vec![
            fixed(SourceLabel::Spotify, Err(LookupFailure::Network("offline".into()))),
            fixed(SourceLabel::LastFm, Ok(strings(&["kids music"]))),
        ]);

        let result = resolver.resolve_result(&artist()).await;
        assert_eq!(result.source, None);
        assert_eq!(result.genres, strings(&["small artist"]));
        assert_eq!(result.source_label(), "None");
    }

    #[tokio::test]
    async fn test_build_resolver_without_credentials() {
        let (resolver, readiness) = build_resolver(&EnrichConfig::offline()).await.unwrap();
        assert_eq!(
            readiness,
            SourceReadiness {
                spotify: false,
                lastfm: false
            }
        );
        assert_eq!(resolver.labels().len(), SourceLabel::REPORT_ORDER.len());
    }
}
