//! Per-source counters for a run

use crate::models::GenreResult;
use crate::types::SourceLabel;
use std::collections::BTreeMap;

/// Counts of artists answered per source
///
/// Keyed by the closed [`SourceLabel`] set, so an unexpected label cannot be
/// silently merged into another counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    counts: BTreeMap<SourceLabel, usize>,
    not_found: usize,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one processed artist
    pub fn record(&mut self, result: &GenreResult) {
        match result.source {
            Some(label) => *self.counts.entry(label).or_insert(0) += 1,
            None => self.not_found += 1,
        }
    }

    pub fn count(&self, label: SourceLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn not_found(&self) -> usize {
        self.not_found
    }

    pub fn found(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn total(&self) -> usize {
        self.found() + self.not_found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtistRecord;
    use std::collections::BTreeMap;

    #[test]
    fn test_record_counts_by_source() {
        let artist = ArtistRecord::new("1", "A", BTreeMap::new(), 2);
        let mut stats = RunStatistics::new();

        stats.record(&GenreResult::found(&artist, vec!["jazz".into()], SourceLabel::LastFm));
        stats.record(&GenreResult::found(&artist, vec!["jazz".into()], SourceLabel::LastFm));
        stats.record(&GenreResult::found(&artist, vec!["rock".into()], SourceLabel::SpotifyId));
        stats.record(&GenreResult::placeholder(&artist));

        assert_eq!(stats.count(SourceLabel::LastFm), 2);
        assert_eq!(stats.count(SourceLabel::SpotifyId), 1);
        assert_eq!(stats.count(SourceLabel::Wikipedia), 0);
        assert_eq!(stats.not_found(), 1);
        assert_eq!(stats.found(), 3);
        assert_eq!(stats.total(), 4);
    }
}
