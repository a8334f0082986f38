//! Per-artist outcome of the resolution chain

use crate::models::ArtistRecord;
use crate::types::SourceLabel;
use genrefill_common::{Error, Result};

/// Upper bound on genres kept per artist
pub const MAX_GENRES: usize = 5;

/// Genre written for artists no source could describe
pub const PLACEHOLDER_GENRE: &str = "small artist";

/// Genres found for one artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreResult {
    pub artist_id: String,
    pub artist_name: String,
    /// At most [`MAX_GENRES`] entries, in source order
    pub genres: Vec<String>,
    /// `None` when every source came up empty
    pub source: Option<SourceLabel>,
    pub row_number: u64,
}

impl GenreResult {
    /// Result for an artist a source answered for
    pub fn found(artist: &ArtistRecord, mut genres: Vec<String>, source: SourceLabel) -> Self {
        genres.truncate(MAX_GENRES);
        Self {
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            genres,
            source: Some(source),
            row_number: artist.original_row_number,
        }
    }

    /// Placeholder for an artist no source could describe
    pub fn placeholder(artist: &ArtistRecord) -> Self {
        Self {
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            genres: vec![PLACEHOLDER_GENRE.to_string()],
            source: None,
            row_number: artist.original_row_number,
        }
    }

    /// Source label as written to reports ("None" for placeholders)
    pub fn source_label(&self) -> &'static str {
        self.source.map(|s| s.as_str()).unwrap_or("None")
    }

    /// Genres serialized as a JSON array
    pub fn genres_json(&self) -> Result<String> {
        serde_json::to_string(&self.genres)
            .map_err(|e| Error::Internal(format!("Failed to serialize genres: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn artist() -> ArtistRecord {
        ArtistRecord::new("id-1", "Nobody", BTreeMap::new(), 7)
    }

    #[test]
    fn test_found_truncates_to_five() {
        let genres = (1..=8).map(|i| format!("genre {}", i)).collect();
        let result = GenreResult::found(&artist(), genres, SourceLabel::LastFm);
        assert_eq!(result.genres.len(), MAX_GENRES);
        assert_eq!(result.genres[0], "genre 1");
        assert_eq!(result.source_label(), "Last.fm");
    }

    #[test]
    fn test_placeholder() {
        let result = GenreResult::placeholder(&artist());
        assert_eq!(result.genres, vec!["small artist".to_string()]);
        assert_eq!(result.source_label(), "None");
        assert_eq!(result.row_number, 7);
        assert_eq!(result.source, None);
    }

    #[test]
    fn test_genres_json() {
        let result = GenreResult::found(
            &artist(),
            vec!["rock".into(), "rock'n'roll".into()],
            SourceLabel::Spotify,
        );
        assert_eq!(result.genres_json().unwrap(), r#"["rock","rock'n'roll"]"#);
    }
}
