//! Markdown run report

use crate::models::RunStatistics;
use crate::types::SourceLabel;
use std::path::Path;

/// Row numbers per fenced block
const ROW_CHUNK: usize = 50;

/// Render the report
///
/// `processed_rows` must already be sorted. `generated_at` is preformatted so
/// callers control the clock.
pub fn render_report(
    statistics: &RunStatistics,
    processed_rows: &[u64],
    sql_path: &Path,
    generated_at: &str,
) -> String {
    let mut lines = vec![
        "# Processing Report: Artists Without Genres".to_string(),
        String::new(),
        format!("**Total Artists Processed:** {}", statistics.total()),
        format!("**Date:** {}", generated_at),
        String::new(),
        "## Statistics".to_string(),
        String::new(),
    ];

    for label in SourceLabel::REPORT_ORDER {
        lines.push(format!(
            "- ✓ Found via {}: {}",
            label.caption(),
            statistics.count(label)
        ));
    }
    lines.push(format!("- ✗ Not found: {}", statistics.not_found()));
    lines.push(String::new());

    lines.push("## Processed CSV Row Numbers".to_string());
    lines.push(String::new());
    lines.push(format!(
        "The following **{} rows** from the CSV were processed:",
        processed_rows.len()
    ));
    lines.push(String::new());

    for chunk in processed_rows.chunks(ROW_CHUNK) {
        let joined = chunk
            .iter()
            .map(|row| row.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push("```".to_string());
        lines.push(joined);
        lines.push("```".to_string());
        lines.push(String::new());
    }

    lines.push("## SQL File".to_string());
    lines.push(String::new());
    lines.push(format!(
        "SQL UPDATE statements have been saved to: `{}`",
        sql_path.display()
    ));
    lines.push(String::new());
    lines.push("Run the statements against the database to apply the genres.".to_string());

    lines.join("\n")
}

/// Local timestamp in the report's format
pub fn report_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtistRecord, GenreResult};
    use std::collections::BTreeMap;

    fn statistics() -> RunStatistics {
        let mut stats = RunStatistics::new();
        let a = ArtistRecord::new("1", "A", BTreeMap::new(), 2);
        stats.record(&GenreResult::found(&a, vec!["jazz".into()], SourceLabel::SpotifyId));
        stats.record(&GenreResult::found(&a, vec!["jazz".into()], SourceLabel::Wikipedia));
        stats.record(&GenreResult::placeholder(&a));
        stats
    }

    #[test]
    fn test_report_statistics_lines() {
        let report = render_report(
            &statistics(),
            &[2, 3, 4],
            Path::new("/tmp/out_updates.sql"),
            "2024-01-01 00:00:00",
        );

        assert!(report.contains("**Total Artists Processed:** 3"));
        assert!(report.contains("**Date:** 2024-01-01 00:00:00"));
        assert!(report.contains("- ✓ Found via Spotify (ID): 1"));
        assert!(report.contains("- ✓ Found via Spotify (search): 0"));
        assert!(report.contains("- ✓ Found via Wikipedia (web): 1"));
        assert!(report.contains("- ✗ Not found: 1"));
        assert!(report.contains("```\n2, 3, 4\n```"));
        assert!(report.contains("`/tmp/out_updates.sql`"));

        let spotify_id = report.find("Spotify (ID)").unwrap();
        let spotify_search = report.find("Spotify (search)").unwrap();
        let musicbrainz_id = report.find("MusicBrainz (ID)").unwrap();
        assert!(spotify_id < spotify_search && spotify_search < musicbrainz_id);
    }

    #[test]
    fn test_rows_are_chunked_by_fifty() {
        let rows: Vec<u64> = (2..=121).collect();
        let report = render_report(&RunStatistics::new(), &rows, Path::new("x.sql"), "now");

        assert_eq!(report.matches("```").count(), 6);
        assert!(report.contains("The following **120 rows**"));
    }

    #[test]
    fn test_report_timestamp_format() {
        let stamp = report_timestamp();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[13..14], ":");
    }
}
