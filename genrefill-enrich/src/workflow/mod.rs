//! Enrichment workflow
//!
//! The resolver walks the source chain for one artist; the pipeline drives it
//! over every artist loaded from the input file and hands the outcome to the
//! output writers.

pub mod pipeline;
pub mod resolver;

pub use pipeline::{
    enrich_file, output_paths, output_stem, process_artists, run_enrichment, OutputPaths, RunOutcome,
    RunSummary,
};
pub use resolver::{build_resolver, GenreResolver, SourceReadiness};
