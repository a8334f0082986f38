//! Artist rows read from the input catalog

use std::collections::BTreeMap;

/// An artist awaiting genres
///
/// Built once by the input loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRecord {
    /// Catalog ID (used in the WHERE clause of the SQL update)
    pub id: String,
    /// Display name used for name-based searches
    pub name: String,
    /// Lowercased source name → first identifier for that source
    pub external_ids: BTreeMap<String, String>,
    /// CSV line on which the record starts (header is line 1)
    pub original_row_number: u64,
}

impl ArtistRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        external_ids: BTreeMap<String, String>,
        original_row_number: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            external_ids,
            original_row_number,
        }
    }

    /// Identifier for a source, if the artist carries one
    pub fn external_id(&self, source: &str) -> Option<&str> {
        self.external_ids.get(source).map(String::as_str)
    }
}
