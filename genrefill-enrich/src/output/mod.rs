//! Output files: SQL update script and markdown report

pub mod report_writer;
pub mod sql_writer;

pub use report_writer::{render_report, report_timestamp};
pub use sql_writer::{render_sql, sql_quote};

use crate::workflow::{OutputPaths, RunOutcome};
use genrefill_common::Result;
use std::fs;
use tracing::info;

/// Write both output files for a finished run
pub fn write_outputs(outcome: &RunOutcome, paths: &OutputPaths, table: &str) -> Result<()> {
    if let Some(parent) = paths.sql.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&paths.sql, render_sql(&outcome.results, table)?)?;
    info!(path = %paths.sql.display(), statements = outcome.results.len(), "SQL file written");

    let report = render_report(
        &outcome.statistics,
        &outcome.processed_rows,
        &paths.sql,
        &report_timestamp(),
    );
    fs::write(&paths.report, report)?;
    info!(path = %paths.report.display(), "Markdown report written");

    Ok(())
}
