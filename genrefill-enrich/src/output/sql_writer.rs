//! SQL update script

use crate::models::GenreResult;
use genrefill_common::Result;

/// Escape a value for a single-quoted SQL string literal
pub fn sql_quote(value: &str) -> String {
    value.replace('\'', "''")
}

/// One UPDATE per artist inside a single transaction
pub fn render_sql(results: &[GenreResult], table: &str) -> Result<String> {
    let mut lines = vec![
        "-- SQL UPDATE statements for artists without genres".to_string(),
        format!("-- Generated automatically - {} artists", results.len()),
        String::new(),
        "BEGIN;".to_string(),
        String::new(),
    ];

    for result in results {
        lines.push(format!(
            "UPDATE {} SET genres = '{}'::jsonb WHERE id = '{}';",
            table,
            sql_quote(&result.genres_json()?),
            sql_quote(&result.artist_id)
        ));
    }

    lines.push(String::new());
    lines.push("COMMIT;".to_string());

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtistRecord;
    use crate::types::SourceLabel;
    use std::collections::BTreeMap;

    fn update_statements(sql: &str) -> usize {
        sql.lines().filter(|l| l.starts_with("UPDATE ")).count()
    }

    #[test]
    fn test_render_sql_wraps_updates_in_transaction() {
        let found = GenreResult::found(
            &ArtistRecord::new("id-1", "Sinéad O'Connor", BTreeMap::new(), 2),
            vec!["Celtic".to_string(), "Rock 'n' roll".to_string()],
            SourceLabel::Spotify,
        );
        let missing = GenreResult::placeholder(&ArtistRecord::new("id'2", "Nobody", BTreeMap::new(), 3));

        let sql = render_sql(&[found, missing], "artists").unwrap();
        let lines: Vec<&str> = sql.lines().collect();

        assert_eq!(lines[1], "-- Generated automatically - 2 artists");
        assert_eq!(lines[3], "BEGIN;");
        assert_eq!(
            lines[5],
            r#"UPDATE artists SET genres = '["Celtic","Rock ''n'' roll"]'::jsonb WHERE id = 'id-1';"#
        );
        assert_eq!(
            lines[6],
            r#"UPDATE artists SET genres = '["small artist"]'::jsonb WHERE id = 'id''2';"#
        );
        assert_eq!(*lines.last().unwrap(), "COMMIT;");
        assert_eq!(update_statements(&sql), 2);
    }

    #[test]
    fn test_render_sql_uses_configured_table() {
        let sql = render_sql(&[], "catalog.artists").unwrap();
        assert!(sql.contains("BEGIN;"));
        assert_eq!(update_statements(&sql), 0);

        let result = GenreResult::placeholder(&ArtistRecord::new("x", "X", BTreeMap::new(), 2));
        let sql = render_sql(&[result], "catalog.artists").unwrap();
        assert!(sql.contains("UPDATE catalog.artists SET"));
    }
}
