//! # xmlfmt - Canonical XML Re-Formatter
//!
//! xmlfmt normalizes the on-disk layout of XML files across a project tree
//! so that files edited with different editor settings converge to one
//! canonical form: fixed indentation (spaces or tabs), no blank line after
//! the declaration, no padded text content.
//!
//! The formatter is idempotent. Every file is re-serialized to a scratch
//! file and fingerprinted against the original; an already-canonical file is
//! never rewritten, so timestamps and version-control diffs stay quiet. A
//! process-wide tracker additionally ensures a file reachable from several
//! invocations in one process (one per sub-module of a build, say) is only
//! formatted once.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```rust
//! use xmlfmt::canonical::{parse, render};
//!
//! let messy = "<project>\n  <name>demo</name>\n</project>";
//! let doc = parse(messy).unwrap();
//! assert_eq!(render(&doc, 4), "<project>\n    <name>demo</name>\n</project>\n");
//! ```
//!
//! Whole-tree runs go through [`pipeline::FormatPipeline`] with a
//! [`tracker::RunTracker`].
//!
//! ### As a CLI Tool
//!
//! The library is also available as a command-line tool. See the `main`
//! module for CLI usage details.
//!
//! ## Modules
//!
//! - [`canonical`] - XML parsing and canonical re-serialization
//! - [`pipeline`] - Per-file pipeline and the batch run loop
//! - [`discover`] - Include/exclude glob matching over the project tree
//! - [`style`] - Space-to-tab indentation conversion
//! - [`digest`] - Whole-file fingerprints for change detection
//! - [`tracker`] - Run-scoped dedup of formatted files

/// XML parsing and canonical re-serialization
pub mod canonical;

/// Whole-file content fingerprints
pub mod digest;

/// Candidate file discovery (include/exclude globs)
pub mod discover;

/// The per-file formatting pipeline and batch runner
pub mod pipeline;

/// Indentation style conversion
pub mod style;

/// Run-scoped dedup tracker
pub mod tracker;
