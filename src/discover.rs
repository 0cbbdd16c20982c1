//! Candidate file discovery
//!
//! Walks the project root and matches each file's root-relative path against
//! compiled include and exclude glob sets (`globset` compiles every pattern
//! into one matcher, so a walk costs one lookup per file). Exclusion always
//! wins over inclusion. Results are sorted by file name so a fixed tree and
//! pattern set produce the same candidate list every time.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// By default every XML file under the root is a candidate.
pub const DEFAULT_INCLUDE: &str = "**/*.xml";
/// By default build output is left alone.
pub const DEFAULT_EXCLUDE: &str = "**/target/**";

/// The candidate set could not be computed. Unlike per-file formatting
/// failures, this is fatal to the run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

fn compile(patterns: &[String]) -> Result<GlobSet, DiscoveryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| DiscoveryError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| DiscoveryError::Pattern {
        pattern: source.glob().unwrap_or_default().to_owned(),
        source,
    })
}

/// Return the root-relative paths of all regular files under `root` that
/// match an include pattern and no exclude pattern.
pub fn discover(
    root: &Path,
    includes: &[String],
    excludes: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let include = compile(includes)?;
    let exclude = compile(excludes)?;

    let mut matched = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if exclude.is_match(rel) {
            continue;
        }
        if include.is_match(rel) {
            debug!(path = %rel.display(), "file scheduled for formatting");
            matched.push(rel.to_path_buf());
        }
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<a/>\n").unwrap();
    }

    #[test]
    fn exclusion_overrides_inclusion() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "pom.xml");
        touch(dir.path(), "module/pom.xml");
        touch(dir.path(), "target/generated/out.xml");
        touch(dir.path(), "module/readme.txt");

        let found = discover(
            dir.path(),
            &[DEFAULT_INCLUDE.to_owned()],
            &[DEFAULT_EXCLUDE.to_owned()],
        )
        .unwrap();
        assert_eq!(
            found,
            vec![PathBuf::from("module/pom.xml"), PathBuf::from("pom.xml")]
        );
    }

    #[test]
    fn empty_exclude_list_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "target/out.xml");

        let found = discover(dir.path(), &[DEFAULT_INCLUDE.to_owned()], &[]).unwrap();
        assert_eq!(found, vec![PathBuf::from("target/out.xml")]);
    }

    #[test]
    fn bad_patterns_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(dir.path(), &["a{".to_owned()], &[]);
        assert!(matches!(err, Err(DiscoveryError::Pattern { .. })));
    }
}
