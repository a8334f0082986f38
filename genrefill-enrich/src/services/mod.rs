//! Service modules for the enrichment workflow
//!
//! Input loading, identifier parsing, filtering and matching helpers, plus the
//! shared HTTP and HTML plumbing used by the genre sources.

pub mod external_ids;
pub mod genre_filter;
pub mod html;
pub mod http;
pub mod input_loader;
pub mod name_matcher;

pub use external_ids::extract_external_ids;
pub use genre_filter::filter_genres;
pub use http::HttpClients;
pub use input_loader::load_artists;
pub use name_matcher::{musicbrainz_queries, name_variants, names_match, MatchThresholds};
