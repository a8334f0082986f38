//! Artist name matching
//!
//! Pure helpers used by the name-based sources: search-variant generation and
//! a tiered similarity rule deciding whether a search hit is the artist we
//! asked for. No network access here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is neither a word character nor whitespace
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("static regex"));

/// Separators after which a name carries qualifiers rather than the name itself
const VARIANT_SEPARATORS: [char; 3] = ['(', '–', '-'];

/// Shortest search string worth sending
const MIN_QUERY_CHARS: usize = 2;

/// Thresholds for [`names_match`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    /// Shorter name must have at least this many characters for a containment match
    pub min_contained_chars: usize,
    /// Shorter/longer length ratio required for a containment match
    pub containment_ratio: f64,
    /// Words shorter than this are ignored by the word-overlap tier
    pub min_word_chars: usize,
    /// Fraction of the wanted name's words that must appear in the candidate
    pub word_overlap_ratio: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            min_contained_chars: 3,
            containment_ratio: 0.7,
            min_word_chars: 3,
            word_overlap_ratio: 0.8,
        }
    }
}

/// Lowercase, strip punctuation, trim
pub fn normalize_name(name: &str) -> String {
    NON_WORD
        .replace_all(&name.to_lowercase(), "")
        .trim()
        .to_string()
}

/// Decide whether `candidate` names the same artist as `wanted`
///
/// Tiers, first applicable one decides:
/// 1. normalized names are equal
/// 2. one normalized name contains the other: the shorter must be long enough
///    and cover `containment_ratio` of the longer
/// 3. multi-word names: enough of the wanted name's significant words appear
///    in the candidate
pub fn names_match(wanted: &str, candidate: &str, thresholds: &MatchThresholds) -> bool {
    let wanted_clean = normalize_name(wanted);
    let candidate_clean = normalize_name(candidate);

    if wanted_clean.is_empty() || candidate_clean.is_empty() {
        return false;
    }

    if wanted_clean == candidate_clean {
        return true;
    }

    if wanted_clean.contains(&candidate_clean) || candidate_clean.contains(&wanted_clean) {
        let wanted_len = wanted_clean.chars().count();
        let candidate_len = candidate_clean.chars().count();
        let shorter = wanted_len.min(candidate_len);
        let longer = wanted_len.max(candidate_len);
        return shorter >= thresholds.min_contained_chars
            && (shorter as f64 / longer as f64) >= thresholds.containment_ratio;
    }

    if wanted.split_whitespace().count() > 1 {
        let wanted_words = significant_words(&wanted_clean, thresholds.min_word_chars);
        let candidate_words = significant_words(&candidate_clean, thresholds.min_word_chars);

        if wanted_words.len() >= 2 && candidate_words.len() >= 2 {
            let common = wanted_words
                .iter()
                .filter(|w| candidate_words.contains(w))
                .count();
            return common > 0
                && (common as f64 / wanted_words.len() as f64) >= thresholds.word_overlap_ratio;
        }
    }

    false
}

fn significant_words(clean: &str, min_chars: usize) -> Vec<&str> {
    let mut words: Vec<&str> = clean
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_chars)
        .collect();
    words.sort_unstable();
    words.dedup();
    words
}

/// Search strings to try for a name
///
/// The full name, then the part before `(`, `–` and `-`. Trimmed, entries shorter
/// than two characters dropped, duplicates removed keeping the first.
pub fn name_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.trim().to_string()];
    for separator in VARIANT_SEPARATORS {
        if let Some(head) = name.split(separator).next() {
            variants.push(head.trim().to_string());
        }
    }
    dedup_queries(variants)
}

/// MusicBrainz search queries for a name: a fielded query, the bare name, and
/// the name before any parenthetical
pub fn musicbrainz_queries(name: &str) -> Vec<String> {
    let name = name.trim();
    let mut queries = vec![format!("artist:\"{}\"", name.replace('"', ""))];
    queries.push(name.to_string());
    if let Some(head) = name.split('(').next() {
        queries.push(head.trim().to_string());
    }
    dedup_queries(queries)
}

fn dedup_queries(candidates: Vec<String>) -> Vec<String> {
    let mut queries: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.chars().count() < MIN_QUERY_CHARS {
            continue;
        }
        if !queries.contains(&candidate) {
            queries.push(candidate);
        }
    }
    queries
}
