//! The formatting pipeline
//!
//! One file at a time: parse, re-serialize canonically to a scratch file,
//! optionally convert the indentation to tabs, fingerprint both files, and
//! replace the original only when the bytes actually differ. Digest equality
//! means the original is never opened for writing, which is what makes the
//! formatter idempotent: a second run over a formatted tree rewrites nothing
//! and disturbs no modification timestamps.
//!
//! Per-file failures are isolated; the batch loop in [`FormatPipeline::run`]
//! reports them and moves on. Only candidate discovery can fail the run.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::canonical::{self, ParseError};
use crate::digest;
use crate::discover::{self, DEFAULT_EXCLUDE, DEFAULT_INCLUDE, DiscoveryError};
use crate::style;
use crate::tracker::RunTracker;

/// Everything one run needs to know. Immutable once the pipeline is built.
#[derive(Debug, Clone)]
pub struct FormatRequest {
    /// Project root the include/exclude patterns are relative to.
    pub root: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    /// Spaces per nesting level in the canonical layout. Must be positive.
    pub indent_width: usize,
    /// Convert each level's indent to one tab after rendering.
    pub use_tabs: bool,
}

impl FormatRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            includes: vec![DEFAULT_INCLUDE.to_owned()],
            excludes: vec![DEFAULT_EXCLUDE.to_owned()],
            indent_width: 4,
            use_tabs: false,
        }
    }
}

/// A single file failed somewhere in the pipeline. The original file is left
/// untouched in every case except a replace failure interrupted mid-write,
/// which the atomic rename keeps to a minimal window.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to write formatted copy of {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to convert indentation for {}: {source}", .path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to replace {}: {source}", .path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to one candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Already in canonical form; the file was not opened for writing.
    Unchanged,
    /// Content replaced with the canonical serialization.
    Rewritten,
    /// Not a formattable input (missing, or not a regular file).
    Skipped(&'static str),
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub rewritten: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct FormatPipeline {
    request: FormatRequest,
}

impl FormatPipeline {
    pub fn new(request: FormatRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &FormatRequest {
        &self.request
    }

    /// Discover candidates and format each one, claiming every absolute path
    /// against `tracker` first so repeated invocations within one process
    /// never reformat the same file.
    ///
    /// Per-file failures are logged and counted; only a [`DiscoveryError`]
    /// aborts the run.
    pub fn run(&self, tracker: &RunTracker) -> Result<RunSummary, DiscoveryError> {
        let candidates = discover::discover(
            &self.request.root,
            &self.request.includes,
            &self.request.excludes,
        )?;
        debug!(
            count = candidates.len(),
            root = %self.request.root.display(),
            tabs = self.request.use_tabs,
            "formatting candidates"
        );

        let mut summary = RunSummary::default();
        for rel in candidates {
            let path = self.request.root.join(rel);
            if !tracker.try_claim(&path) {
                debug!(path = %path.display(), "already formatted in this run");
                continue;
            }
            match self.format_file(&path) {
                Ok(Outcome::Rewritten) => {
                    info!(path = %path.display(), "file reformatted");
                    summary.rewritten += 1;
                }
                Ok(Outcome::Unchanged) => {
                    debug!(path = %path.display(), "file unchanged after formatting");
                    summary.unchanged += 1;
                }
                Ok(Outcome::Skipped(reason)) => {
                    info!(path = %path.display(), reason, "file skipped");
                    summary.skipped += 1;
                }
                Err(err) => {
                    error!("{err}, skipping and moving on to the next file");
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Run the full pipeline on a single file.
    ///
    /// The scratch artifact is a [`NamedTempFile`] created next to the
    /// target, so it is deleted on drop on every exit path and the final
    /// replace is a same-filesystem rename.
    pub fn format_file(&self, path: &Path) -> Result<Outcome, FormatError> {
        if !path.is_file() {
            return Ok(Outcome::Skipped("not a regular file"));
        }

        let source = fs::read_to_string(path).map_err(|err| FormatError::Parse {
            path: path.to_path_buf(),
            source: ParseError::Io(err),
        })?;
        let document = canonical::parse(&source).map_err(|source| FormatError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "successfully parsed");

        let rendered = canonical::render(&document, self.request.indent_width);
        let scratch = self
            .write_scratch(path, &rendered)
            .map_err(|source| FormatError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        if self.request.use_tabs {
            style::convert_indent_in_place(scratch.path(), self.request.indent_width).map_err(
                |source| FormatError::Convert {
                    path: path.to_path_buf(),
                    source,
                },
            )?;
        }

        // A fingerprint failure must never silently drop a formatting
        // attempt, so it counts as "changed" and we rewrite.
        let identical = match (digest::fingerprint(scratch.path()), digest::fingerprint(path)) {
            (Ok(fresh), Ok(original)) => fresh == original,
            (Err(err), _) | (_, Err(err)) => {
                debug!(path = %path.display(), "fingerprint failed ({err}), rewriting anyway");
                false
            }
        };
        if identical {
            return Ok(Outcome::Unchanged);
        }

        replace(scratch, path).map_err(|source| FormatError::Replace {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Outcome::Rewritten)
    }

    fn write_scratch(&self, target: &Path, content: &str) -> io::Result<NamedTempFile> {
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let mut scratch = Builder::new().prefix(".xmlfmt").suffix(".xml").tempfile_in(dir)?;
        scratch.write_all(content.as_bytes())?;
        scratch.flush()?;
        Ok(scratch)
    }
}

/// Move the scratch content onto the target, preferring an atomic rename and
/// falling back to a byte copy if the filesystem refuses the move.
fn replace(scratch: NamedTempFile, target: &Path) -> io::Result<()> {
    match scratch.persist(target) {
        Ok(_) => Ok(()),
        Err(err) => {
            debug!("rename onto {} failed ({}), copying bytes", target.display(), err.error);
            let scratch = err.file;
            fs::copy(scratch.path(), target)?;
            Ok(())
        }
    }
}
