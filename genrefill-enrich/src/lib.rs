//! genrefill-enrich library interface
//!
//! Fills in missing artist genres from external music services and renders
//! the results as an SQL update script plus a markdown report. Exposed as a
//! library for integration testing; the binary in `main.rs` is a thin CLI.

pub mod config;
pub mod models;
pub mod output;
pub mod services;
pub mod sources;
pub mod types;
pub mod workflow;

pub use config::{EnrichConfig, SpotifyCredentials};
pub use models::{ArtistRecord, GenreResult, RunStatistics};
pub use types::{GenreSource, LookupFailure, LookupResult, SourceLabel};
pub use workflow::{build_resolver, enrich_file, GenreResolver};
