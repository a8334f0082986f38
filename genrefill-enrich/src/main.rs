//! genrefill-enrich - artist genre enrichment
//!
//! Reads a CSV export of artists, finds genres for those with an empty genre
//! list and writes `<name>_updates.sql` and `<name>_report.md`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use genrefill_common::config::{default_output_dir, expand_home, load_toml_config};
use genrefill_enrich::config::EnrichConfig;
use genrefill_enrich::types::SourceLabel;
use genrefill_enrich::workflow::{build_resolver, enrich_file, output_paths, SourceReadiness};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for genrefill-enrich
#[derive(Parser, Debug)]
#[command(name = "genrefill-enrich")]
#[command(about = "Fill missing artist genres from external music services")]
#[command(version)]
struct Args {
    /// CSV file with `id`, `name`, `genres` and `external_identifiers` columns
    input: PathBuf,

    /// Directory for the SQL and report files (default: home directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// TOML config file (default: <config dir>/genrefill/config.toml)
    #[arg(short, long, env = "GENREFILL_CONFIG")]
    config: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(config_level: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { config_level };
    let default_directive = format!("genrefill_enrich={0},genrefill_common={0}", default_level);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn ready(flag: bool) -> &'static str {
    if flag {
        "ready"
    } else {
        "disabled"
    }
}

fn log_readiness(readiness: SourceReadiness) {
    info!("Spotify API: {}", if readiness.spotify { "connected" } else { "not connected" });
    info!("Last.fm API: {}", ready(readiness.lastfm));
    info!("MusicBrainz: ready");
    info!("Setlist.fm: ready (ID lookup)");
    info!("Dice: ready (ID lookup)");
    info!("Web scraping: ready (AllMusic, Wikipedia)");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&toml_config.logging.level, args.verbose);

    info!("Starting genrefill-enrich v{}", env!("CARGO_PKG_VERSION"));

    let input = expand_home(&args.input);
    let output_dir = match &args.output_dir {
        Some(dir) => expand_home(dir),
        None => default_output_dir().context("Failed to resolve output directory")?,
    };
    let planned = output_paths(&input, &output_dir);

    info!("Input file: {}", input.display());
    info!("Output SQL: {}", planned.sql.display());
    info!("Output report: {}", planned.report.display());

    let config = EnrichConfig::resolve(&toml_config);
    let (resolver, readiness) = build_resolver(&config)
        .await
        .context("Failed to set up genre sources")?;
    log_readiness(readiness);

    let chain: Vec<&str> = resolver.labels().iter().map(|label| label.as_str()).collect();
    info!("Source order: {}", chain.join(" -> "));

    let summary = match enrich_file(&input, &output_dir, &config, &resolver)
        .await
        .with_context(|| format!("Failed to enrich {}", input.display()))?
    {
        Some(summary) => summary,
        None => {
            info!("No artists to process");
            return Ok(());
        }
    };

    let stats = &summary.outcome.statistics;
    info!(
        "Summary: {} artists processed, {} with genres",
        stats.total(),
        stats.found()
    );
    for label in SourceLabel::REPORT_ORDER {
        info!("  Found via {}: {}", label.caption(), stats.count(label));
    }
    info!("  Not found: {}", stats.not_found());
    info!("SQL file saved to: {}", summary.paths.sql.display());
    info!("Markdown report saved to: {}", summary.paths.report.display());
    info!("Processed CSV rows: {}", summary.outcome.processed_rows.len());

    Ok(())
}
