//! Input catalog loader
//!
//! Reads the artists CSV and keeps only rows whose `genres` column is the
//! literal empty array `[]`.

use crate::models::ArtistRecord;
use crate::services::external_ids::extract_external_ids;
use genrefill_common::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Columns that must be present in the header row
const REQUIRED_COLUMNS: [&str; 3] = ["id", "name", "genres"];

/// One CSV row, as far as this tool cares
#[derive(Debug, Deserialize)]
struct InputRow {
    id: String,
    name: String,
    #[serde(default)]
    genres: String,
    #[serde(default)]
    external_identifiers: String,
}

/// Load artists with an empty genre list from a CSV file
///
/// # Errors
/// - `NotFound` if the file does not exist
/// - `InvalidInput` if a required column is missing
/// - `Csv` if the header row cannot be read
///
/// Individual malformed rows are skipped with a warning.
pub fn load_artists(path: &Path) -> Result<Vec<ArtistRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(Error::InvalidInput(format!(
                "Missing required column '{}' in {}",
                column,
                path.display()
            )));
        }
    }

    let mut artists = Vec::new();
    let mut skipped_with_genres = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: InputRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed CSV row");
                continue;
            }
        };

        if row.genres.trim() != "[]" {
            skipped_with_genres += 1;
            continue;
        }

        let external_ids = extract_external_ids(&row.external_identifiers);
        artists.push(ArtistRecord::new(row.id, row.name, external_ids, line));
    }

    debug!(
        selected = artists.len(),
        skipped_with_genres,
        "Input catalog loaded"
    );

    Ok(artists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("artists.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_selects_only_empty_genre_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "id,name,genres,external_identifiers\n\
             a1,Solo Act,[],[]\n\
             a2,Known Band,\"[\"\"rock\"\"]\",[]\n\
             a3,Other Act,[],\"[{\"\"source\"\": \"\"Spotify\"\", \"\"identifier\"\": [\"\"sp1\"\"]}]\"\n",
        );

        let artists = load_artists(&path).unwrap();
        assert_eq!(artists.len(), 2);

        assert_eq!(artists[0].id, "a1");
        assert_eq!(artists[0].original_row_number, 2);
        assert!(artists[0].external_ids.is_empty());

        assert_eq!(artists[1].id, "a3");
        assert_eq!(artists[1].original_row_number, 4);
        assert_eq!(artists[1].external_id("spotify"), Some("sp1"));
    }

    #[test]
    fn test_missing_external_identifiers_column_is_allowed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,name,genres\nx,Name, [] \n");

        let artists = load_artists(&path).unwrap();
        assert_eq!(artists.len(), 1);
        assert!(artists[0].external_ids.is_empty());
    }

    #[test]
    fn test_names_with_commas_keep_their_row_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "id,name,genres\n\
             a1,\"Crosby, Stills & Nash\",[]\n\
             a2,\"Earth, Wind & Fire\",[]\n",
        );

        let artists = load_artists(&path).unwrap();
        assert_eq!(artists[0].name, "Crosby, Stills & Nash");
        assert_eq!(artists[0].original_row_number, 2);
        assert_eq!(artists[1].original_row_number, 3);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_artists(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,name\na1,Someone\n");
        let result = load_artists(&path);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
