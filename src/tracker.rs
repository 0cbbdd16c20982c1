//! Run-scoped dedup of formatted files
//!
//! A build invoking the formatter once per sub-module reaches the same files
//! from every invocation. The tracker records each absolute path the first
//! time it is claimed and rejects every later claim, so a file is formatted
//! at most once per tracker lifetime. The process-wide instance returned by
//! [`RunTracker::global`] lives for the whole process; callers that want
//! fresh dedup semantics per logical run construct their own tracker.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static GLOBAL: Lazy<RunTracker> = Lazy::new(RunTracker::new);

/// Append-only set of already-formatted absolute paths.
#[derive(Debug, Default)]
pub struct RunTracker {
    seen: Mutex<HashSet<PathBuf>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide tracker, empty at process start and never cleared.
    pub fn global() -> &'static RunTracker {
        &GLOBAL
    }

    /// Record `path` as formatted. Returns true on the first claim for a
    /// given path and false on every claim after that. The check-and-insert
    /// holds the lock for its whole duration, so concurrent callers can
    /// never both win a claim.
    pub fn try_claim(&self, path: &Path) -> bool {
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            // A poisoned lock only means another claim panicked mid-insert;
            // the set itself is still usable.
            Err(poisoned) => poisoned.into_inner(),
        };
        seen.insert(path.to_path_buf())
    }
}
