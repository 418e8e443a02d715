//! Heuristic scorer (spec §4.6): path/name keyword matching, extension affinities,
//! recency boost, and the auto-include boost. Applied additively after the base
//! scorer (TF-IDF or embeddings). No localization is attempted (spec §9b) — the
//! "component"/"function"/"style"/"config"/"test" keyword checks are
//! English-specific by design.
use std::collections::HashSet;
use std::path::Path;

use crate::config::SelectorConfig;
use crate::types::FileCandidate;

const ONE_DAY_MS: u64 = 24 * 60 * 60 * 1000;
const SEVEN_DAYS_MS: u64 = 7 * ONE_DAY_MS;
const THIRTY_DAYS_MS: u64 = 30 * ONE_DAY_MS;

const CONFIG_BASENAMES: &[&str] = &["package.json", "tsconfig.json", ".env"];
const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx"];
const FUNCTION_EXTENSIONS: &[&str] = &["ts", "js"];

fn basename_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn parent_lower(path: &Path) -> String {
    path.parent()
        .map(|p| p.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn extension_lower(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Applies every adjustment in spec §4.6 to `candidate`, appending a reason for
/// each adjustment that fires.
pub fn apply(
    candidate: &mut FileCandidate,
    query_keywords: &HashSet<String>,
    now_ms: u64,
    cfg: &SelectorConfig,
) {
    let basename = basename_lower(&candidate.path);
    let parent = parent_lower(&candidate.path);
    let ext = extension_lower(&candidate.path);

    // Path match: +0.8 per keyword found in basename, +0.4 per keyword in parent path.
    for kw in query_keywords {
        if basename.contains(kw.as_str()) {
            candidate.add(0.8, format!("path match (basename): {kw}"));
        }
        if parent.contains(kw.as_str()) {
            candidate.add(0.4, format!("path match (parent): {kw}"));
        }
    }

    // Extension affinities.
    let query_has = |word: &str| query_keywords.iter().any(|k| k == word);
    if COMPONENT_EXTENSIONS.contains(&ext.as_str()) && query_has("component") {
        candidate.add(0.6, "extension affinity: component file");
    }
    if FUNCTION_EXTENSIONS.contains(&ext.as_str()) && query_has("function") {
        candidate.add(0.4, "extension affinity: function file");
    }
    if ext == "css" && query_has("style") {
        candidate.add(0.6, "extension affinity: stylesheet");
    }

    // Config files.
    if CONFIG_BASENAMES.contains(&basename.as_str()) && (query_has("config") || query_has("setup"))
    {
        candidate.add(0.7, "config file match");
    }

    // Test files.
    let is_test_file = basename.contains("test") || basename.contains("spec");
    if is_test_file {
        if query_has("test") {
            candidate.add(0.5, "test file matches test query");
        } else {
            candidate.add(-0.3, "test file penalty");
        }
    }

    // Recency.
    if let Some(mtime) = candidate.mtime_ms {
        let age = now_ms.saturating_sub(mtime);
        if age < ONE_DAY_MS {
            candidate.add(0.5, "recency: modified <1 day ago");
        } else if age < SEVEN_DAYS_MS {
            candidate.add(0.3, "recency: modified <7 days ago");
        } else if age < THIRTY_DAYS_MS {
            candidate.add(0.1, "recency: modified <30 days ago");
        }
    }

    // Auto-include boost.
    if candidate.is_auto_include {
        candidate.add(cfg.auto_include_boost, "auto-include");
    }
}
