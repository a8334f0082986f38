//! Enrichment pipeline
//!
//! Strictly sequential: one artist at a time, each followed by a pause whose
//! length depends on which source answered.
//!
//! # Example
//! ```rust,ignore
//! let (resolver, _) = build_resolver(&config).await?;
//! let summary = enrich_file(Path::new("artists.csv"), &output_dir, &config, &resolver).await?;
//! ```

use super::resolver::GenreResolver;
use crate::config::EnrichConfig;
use crate::models::{ArtistRecord, GenreResult, RunStatistics};
use crate::output::write_outputs;
use crate::services::load_artists;
use crate::types::SourceLabel;
use genrefill_common::config::PacingConfig;
use genrefill_common::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Every Nth artist gets an info-level progress line
const PROGRESS_EVERY: usize = 10;

/// Stem used when the input file name has no usable characters
const FALLBACK_STEM: &str = "artists";

/// Seconds per artist assumed by the startup estimate
const ESTIMATED_SECS_PER_ARTIST: f64 = 0.3;

static STEM_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("static regex"));

/// Results of processing every loaded artist
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// One entry per artist, in input order
    pub results: Vec<GenreResult>,
    pub statistics: RunStatistics,
    /// Original CSV row numbers, sorted ascending
    pub processed_rows: Vec<u64>,
}

/// Where a run writes its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub sql: PathBuf,
    pub report: PathBuf,
}

/// Outcome plus the files it was written to
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub paths: OutputPaths,
}

/// Output file stem derived from the input file name
///
/// Characters other than word characters, whitespace and `-` are dropped;
/// spaces become underscores.
pub fn output_stem(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cleaned = STEM_STRIP.replace_all(&stem, "").trim().replace(' ', "_");
    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned
    }
}

/// `<stem>_updates.sql` and `<stem>_report.md` under the output directory
pub fn output_paths(input: &Path, output_dir: &Path) -> OutputPaths {
    let stem = output_stem(input);
    OutputPaths {
        sql: output_dir.join(format!("{}_updates.sql", stem)),
        report: output_dir.join(format!("{}_report.md", stem)),
    }
}

fn describe(result: &GenreResult) -> String {
    match result.source {
        Some(label) => {
            let shown = result
                .genres
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            let more = if result.genres.len() > 2 { "..." } else { "" };
            format!("[{}] {}{}", label, shown, more)
        }
        None => "not found".to_string(),
    }
}

/// Resolve every artist in order
pub async fn process_artists(
    artists: &[ArtistRecord],
    resolver: &GenreResolver,
    pacing: &PacingConfig,
) -> RunOutcome {
    let total = artists.len();
    let mut outcome = RunOutcome::default();

    for (index, artist) in artists.iter().enumerate() {
        let position = index + 1;
        let result = resolver.resolve_result(artist).await;

        if position == 1 || position % PROGRESS_EVERY == 0 || position == total {
            info!("[{}/{}] {}: {}", position, total, artist.name, describe(&result));
        } else {
            debug!("[{}/{}] {}: {}", position, total, artist.name, describe(&result));
        }

        outcome.statistics.record(&result);
        outcome.processed_rows.push(result.row_number);

        let pause = SourceLabel::pace(result.source, pacing);
        outcome.results.push(result);

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    outcome.processed_rows.sort_unstable();
    outcome
}

/// Resolve loaded artists and write both output files
pub async fn run_enrichment(
    artists: &[ArtistRecord],
    paths: &OutputPaths,
    config: &EnrichConfig,
    resolver: &GenreResolver,
) -> Result<RunOutcome> {
    let outcome = process_artists(artists, resolver, &config.pacing).await;
    write_outputs(&outcome, paths, &config.table)?;
    Ok(outcome)
}

/// Load, resolve and write outputs for one input file
///
/// Returns `Ok(None)` when the file has no artists with empty genres; nothing
/// is written in that case.
pub async fn enrich_file(
    input: &Path,
    output_dir: &Path,
    config: &EnrichConfig,
    resolver: &GenreResolver,
) -> Result<Option<RunSummary>> {
    let artists = load_artists(input)?;
    if artists.is_empty() {
        info!(input = %input.display(), "No artists with empty genres; nothing to do");
        return Ok(None);
    }

    info!("Found {} artists with empty genres", artists.len());
    info!(
        "Estimated time: ~{:.1} minutes",
        artists.len() as f64 * ESTIMATED_SECS_PER_ARTIST / 60.0
    );

    let paths = output_paths(input, output_dir);
    let outcome = run_enrichment(&artists, &paths, config, resolver).await?;

    Ok(Some(RunSummary { outcome, paths }))
}
