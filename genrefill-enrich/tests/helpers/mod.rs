//! Shared helpers for integration tests
//!
//! Stub genre sources stand in for the network so the pipeline can be driven
//! end to end.

#![allow(dead_code)]

use async_trait::async_trait;
use genrefill_enrich::{ArtistRecord, GenreSource, LookupFailure, LookupResult, SourceLabel};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Order in which stub sources were consulted
pub type CallLog = Arc<Mutex<Vec<(SourceLabel, String)>>>;

/// Source answering every artist with the same result and logging each call
pub struct StubSource {
    label: SourceLabel,
    result: LookupResult,
    calls: CallLog,
}

impl StubSource {
    pub fn boxed(label: SourceLabel, result: LookupResult, calls: &CallLog) -> Box<dyn GenreSource> {
        Box::new(Self {
            label,
            result,
            calls: calls.clone(),
        })
    }
}

#[async_trait]
impl GenreSource for StubSource {
    fn label(&self) -> SourceLabel {
        self.label
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        self.calls
            .lock()
            .unwrap()
            .push((self.label, artist.name.clone()));
        self.result.clone()
    }
}

/// Source that needs an external identifier, like the real ID-based sources
pub struct StubIdSource {
    label: SourceLabel,
    id_key: &'static str,
    genres: Vec<String>,
    calls: CallLog,
}

impl StubIdSource {
    pub fn boxed(
        label: SourceLabel,
        id_key: &'static str,
        genres: &[&str],
        calls: &CallLog,
    ) -> Box<dyn GenreSource> {
        Box::new(Self {
            label,
            id_key,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            calls: calls.clone(),
        })
    }
}

#[async_trait]
impl GenreSource for StubIdSource {
    fn label(&self) -> SourceLabel {
        self.label
    }

    async fn lookup(&self, artist: &ArtistRecord) -> LookupResult {
        artist
            .external_id(self.id_key)
            .ok_or(LookupFailure::NotApplicable("no identifier"))?;
        self.calls
            .lock()
            .unwrap()
            .push((self.label, artist.name.clone()));
        Ok(self.genres.clone())
    }
}

/// Every label in chain order, each failing with a network error
pub fn failing_chain(calls: &CallLog) -> Vec<Box<dyn GenreSource>> {
    chain_labels()
        .into_iter()
        .map(|label| {
            StubSource::boxed(
                label,
                Err(LookupFailure::Network("connection refused".to_string())),
                calls,
            )
        })
        .collect()
}

/// Labels in the order the standard chain consults them
pub fn chain_labels() -> Vec<SourceLabel> {
    vec![
        SourceLabel::SpotifyId,
        SourceLabel::MusicBrainzId,
        SourceLabel::SetlistFmId,
        SourceLabel::DiceId,
        SourceLabel::Spotify,
        SourceLabel::LastFm,
        SourceLabel::MusicBrainz,
        SourceLabel::AllMusic,
        SourceLabel::Wikipedia,
    ]
}

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Quote a CSV field
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Write an artists CSV with the columns the loader reads
///
/// Each row is `(id, name, genres, external_identifiers)`.
pub fn write_artists_csv(dir: &Path, file_name: &str, rows: &[(&str, &str, &str, &str)]) -> PathBuf {
    let mut content = String::from("id,name,genres,external_identifiers\n");
    for (id, name, genres, external_ids) in rows {
        content.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(id),
            csv_field(name),
            csv_field(genres),
            csv_field(external_ids)
        ));
    }

    let path = dir.join(file_name);
    std::fs::write(&path, content).unwrap();
    path
}
