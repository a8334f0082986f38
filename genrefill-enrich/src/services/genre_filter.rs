//! Genre filter
//!
//! Strips children's-music terms and non-genre noise (demographics, places,
//! platform UI labels) from a raw genre list, and discards AllMusic's generic
//! fallback set.

use crate::models::MAX_GENRES;

/// Children's-music terms (substring match, case-insensitive)
const CHILDRENS_TERMS: &[&str] = &[
    "children's music",
    "childrens music",
    "childrens",
    "kids",
    "lullaby",
    "kids music",
    "children music",
    "children",
];

/// Non-genre tags (substring match, case-insensitive)
const NON_GENRE_TAGS: &[&str] = &[
    "seen live",
    "favorites",
    "my library",
    "under 2000 listeners",
    "seen-live",
    "favorite",
    "library",
    "all",
    "music",
    "spotify",
    "usa",
    "american",
    "united states",
    "british",
    "german",
    "italian",
    "french",
    "european",
    "columbus",
    "birmingham",
    "new orleans",
    "peruvian",
    "quechua",
    "switzerland",
    "fixme or cleanup",
    "unknown",
    "special purpose artist",
    "special purpose",
    "compilation",
    "soundtrack",
    "cast",
    "2008 universal fire victim",
    "oh yeah",
    "classy",
    "elegance is learn",
    "ekwal",
    "leon larregui",
    "zoé",
    "raf",
    "80s",
    "italy",
    "kinderlieder",
    "female vocalists",
    "female composer",
    "german composer",
    "composer",
    "2 tone",
    "2 times",
    "times",
];

/// AllMusic answers with exactly these five when it has no real data
const ALLMUSIC_FALLBACK: [&str; 5] = ["blues", "classical", "country", "electronic", "folk"];

/// Shortest string accepted as a genre
const MIN_GENRE_CHARS: usize = 3;

/// Filter a raw genre list
///
/// Keeps source order and at most [`MAX_GENRES`] entries. Returns an empty list
/// when what survives is exactly the AllMusic fallback set. Idempotent.
pub fn filter_genres(genres: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = genres
        .iter()
        .filter(|genre| is_genre(genre))
        .cloned()
        .collect();
    kept.truncate(MAX_GENRES);

    if is_allmusic_fallback(&kept) {
        return Vec::new();
    }

    kept
}

/// Whether a single string survives the denylists and length check
pub fn is_genre(genre: &str) -> bool {
    let lower = genre.trim().to_lowercase();

    if lower.chars().count() < MIN_GENRE_CHARS {
        return false;
    }
    if CHILDRENS_TERMS.iter().any(|term| lower.contains(term)) {
        return false;
    }
    !NON_GENRE_TAGS.iter().any(|tag| lower.contains(tag))
}

/// Whether a list is exactly AllMusic's five-genre fallback
pub fn is_allmusic_fallback(genres: &[String]) -> bool {
    if genres.len() != ALLMUSIC_FALLBACK.len() {
        return false;
    }
    let mut lowered: Vec<String> = genres.iter().map(|g| g.trim().to_lowercase()).collect();
    lowered.sort();
    lowered.dedup();
    lowered == ALLMUSIC_FALLBACK
}
