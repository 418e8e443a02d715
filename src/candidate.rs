//! Candidate preparer (spec §4.9): merges raw scanner output with the
//! auto-include set and per-file token estimates.
use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ContextError;
use crate::types::{CodebaseFile, FileCandidate, Filesystem, TokenEstimator};

/// Prepares scored-ready candidates from raw scanner files.
///
/// `filesystem` is stat'd per file for its mtime; a failed stat is logged as
/// `ContextError::StatMissing` and recency scoring/cache lookups are skipped for
/// that file (spec §7).
pub fn prepare(
    files: Vec<CodebaseFile>,
    auto_include_paths: &HashSet<PathBuf>,
    filesystem: &dyn Filesystem,
    estimator: &dyn TokenEstimator,
) -> Vec<FileCandidate> {
    files
        .into_iter()
        .map(|f| {
            let is_auto_include = f.force || auto_include_paths.contains(&f.path);
            let tokens = estimator.estimate(&f.content);
            let mtime_ms = filesystem.mtime_ms(&f.path);
            if mtime_ms.is_none() {
                let err = ContextError::StatMissing(f.path.clone());
                debug!(error = %err, "skipping recency scoring and cache lookup for this file");
            }
            FileCandidate {
                path: f.path,
                content: f.content,
                force: f.force,
                is_auto_include,
                tokens,
                score: 0.0,
                reasons: Vec::new(),
                mtime_ms,
            }
        })
        .collect()
}
