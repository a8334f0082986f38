//! Data models for the enrichment run

pub mod artist;
pub mod genre_result;
pub mod statistics;

pub use artist::ArtistRecord;
pub use genre_result::{GenreResult, MAX_GENRES, PLACEHOLDER_GENRE};
pub use statistics::RunStatistics;
