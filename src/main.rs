//! xmlfmt CLI: format every matching XML file under a project root.
//!
//! Logging goes to stderr; set `RUST_LOG=xmlfmt=debug` (or pass `--verbose`)
//! to see per-file diagnostics.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xmlfmt::pipeline::{FormatPipeline, FormatRequest};
use xmlfmt::tracker::RunTracker;

#[derive(Parser, Debug)]
#[command(name = "xmlfmt", version, about = "Canonical XML re-formatter")]
struct Cli {
    /// Project root to scan (defaults to current dir)
    root: Option<PathBuf>,
    /// Glob patterns of files to format, relative to the root
    #[arg(long = "include", value_name = "GLOB")]
    includes: Vec<String>,
    /// Glob patterns to leave alone; exclusion wins over inclusion
    #[arg(long = "exclude", value_name = "GLOB")]
    excludes: Vec<String>,
    /// Spaces per nesting level
    #[arg(long, default_value_t = 4)]
    indent: usize,
    /// Indent with tabs instead of spaces
    #[arg(long)]
    tabs: bool,
    /// Per-file diagnostics
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else info.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "xmlfmt=debug"
        } else {
            "xmlfmt=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if cli.indent == 0 {
        bail!("--indent must be at least 1");
    }

    let mut request = FormatRequest::new(cli.root.unwrap_or_else(|| PathBuf::from(".")));
    if !cli.includes.is_empty() {
        request.includes = cli.includes;
    }
    if !cli.excludes.is_empty() {
        request.excludes = cli.excludes;
    }
    request.indent_width = cli.indent;
    request.use_tabs = cli.tabs;

    let pipeline = FormatPipeline::new(request);
    let summary = pipeline
        .run(RunTracker::global())
        .context("failed to enumerate candidate files")?;
    info!(
        rewritten = summary.rewritten,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        failed = summary.failed,
        "format run finished"
    );
    Ok(())
}
