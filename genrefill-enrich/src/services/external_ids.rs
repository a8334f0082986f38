//! External identifier extraction
//!
//! The catalog stores links to other services as a JSON array:
//! `[{"source": "Spotify", "identifier": ["3WrFJ7ztbogyGnTHbHJFl2"]}, ...]`.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Parse a serialized identifier list into `lowercased source → first identifier`
///
/// Empty or malformed input yields an empty map. When a source appears more
/// than once, the last entry carrying an identifier wins.
pub fn extract_external_ids(raw: &str) -> BTreeMap<String, String> {
    let mut ids = BTreeMap::new();

    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return ids;
    }

    let entries = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            debug!("External identifiers are not a JSON array, ignoring");
            return ids;
        }
        Err(e) => {
            debug!(error = %e, "Malformed external identifiers, ignoring");
            return ids;
        }
    };

    for entry in &entries {
        let source = match entry.get("source").and_then(Value::as_str) {
            Some(source) if !source.trim().is_empty() => source.trim().to_lowercase(),
            _ => continue,
        };

        let identifier = match entry.get("identifier") {
            Some(Value::Array(values)) => values.first().and_then(identifier_text),
            Some(value) => identifier_text(value),
            None => None,
        };

        if let Some(identifier) = identifier {
            ids.insert(source, identifier);
        }
    }

    ids
}

fn identifier_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_identifier_per_source() {
        let raw = r#"[
            {"source": "Spotify", "identifier": ["abc", "def"]},
            {"source": "musicbrainz", "identifier": ["b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d"]}
        ]"#;
        let ids = extract_external_ids(raw);

        assert_eq!(ids.len(), 2);
        assert_eq!(ids["spotify"], "abc");
        assert_eq!(ids["musicbrainz"], "b10bbbfc-cf9e-42e0-be17-e2c3e1d2600d");
    }

    #[test]
    fn test_empty_and_malformed_inputs() {
        assert!(extract_external_ids("").is_empty());
        assert!(extract_external_ids("[]").is_empty());
        assert!(extract_external_ids("   ").is_empty());
        assert!(extract_external_ids("[{not json").is_empty());
        assert!(extract_external_ids(r#"{"source": "spotify"}"#).is_empty());
    }

    #[test]
    fn test_skips_entries_without_identifiers() {
        let raw = r#"[
            {"source": "dice", "identifier": []},
            {"source": "setlistfm"},
            {"identifier": ["orphan"]},
            {"source": "Dice", "identifier": [12345]}
        ]"#;
        let ids = extract_external_ids(raw);

        assert_eq!(ids.len(), 1);
        assert_eq!(ids["dice"], "12345");
    }

    #[test]
    fn test_later_entry_for_a_source_wins() {
        let raw = r#"[
            {"source": "spotify", "identifier": ["first"]},
            {"source": "Spotify", "identifier": ["second"]},
            {"source": "SPOTIFY", "identifier": []}
        ]"#;
        assert_eq!(extract_external_ids(raw)["spotify"], "second");
    }

    #[test]
    fn test_accepts_bare_string_identifier() {
        let raw = r#"[{"source": "setlistfm", "identifier": "63d6b6f7-1234"}]"#;
        assert_eq!(extract_external_ids(raw)["setlistfm"], "63d6b6f7-1234");
    }
}
