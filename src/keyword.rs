//! Keyword post-adjustment pass (spec §4.7): a second pass over both path and
//! content that applies topic-specific boosts/penalties after the heuristic scorer
//! has run. Re-sorting by descending score happens in the caller
//! ([`crate::engine`]) once every candidate has been through this pass.
use std::collections::HashSet;
use std::path::Path;

use crate::types::FileCandidate;

const WATERMARK_TOPIC_KEYWORDS: &[&str] = &["watermark", "ternary", "made"];
const WATERMARK_PATH_MARKERS: &[&str] = &["made-with-ternary", "watermark"];
const WATERMARK_CONTENT_MARKER: &str = "made with ternary";

const THEME_TOPIC_KEYWORDS: &[&str] = &["theme", "toggle", "dark", "light"];
const THEME_PATH_MARKERS: &[&str] = &[
    "theme",
    "toggle",
    "globals.css",
    "tailwind.config",
    "index.html",
    "app.css",
    "layout",
    "themetoggle",
    "toggle-group",
];

const NEGATIVE_CATEGORIES: &[&str] = &["chart", "charts", "graph", "analytics", "test", "stories", "storybook"];

fn basename_lower(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn path_lower(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Applies the topic boosts, negative-category penalty, and keyword-hint
/// adjustment from spec §4.7 to `candidate`.
pub fn apply(candidate: &mut FileCandidate, query_keywords: &HashSet<String>) {
    let basename = basename_lower(&candidate.path);
    let full_path = path_lower(&candidate.path);
    let content_lower = candidate.content.to_lowercase();

    // Watermark topic.
    if query_keywords.iter().any(|k| WATERMARK_TOPIC_KEYWORDS.contains(&k.as_str())) {
        let path_hit = WATERMARK_PATH_MARKERS.iter().any(|m| basename.contains(m));
        let content_hit = content_lower.contains(WATERMARK_CONTENT_MARKER);
        if path_hit || content_hit {
            candidate.add(2.0, "watermark topic match");
        }
    }

    // Theme/toggle topic.
    if query_keywords.iter().any(|k| THEME_TOPIC_KEYWORDS.contains(&k.as_str())) {
        let path_hit = THEME_PATH_MARKERS
            .iter()
            .any(|m| full_path.contains(m) || basename.contains(m));
        if path_hit {
            candidate.add(1.5, "theme/toggle topic match");
        }
    }

    // Negative categories: path/basename mentions a negative-category token, no
    // query keyword mentions that token, and no query keyword matches anywhere in
    // path or content.
    for &category in NEGATIVE_CATEGORIES {
        let path_has_category = full_path.contains(category) || basename.contains(category);
        if !path_has_category {
            continue;
        }
        let query_mentions_category = query_keywords.iter().any(|k| k == category);
        if query_mentions_category {
            continue;
        }
        let any_keyword_matches = query_keywords
            .iter()
            .any(|k| full_path.contains(k.as_str()) || content_lower.contains(k.as_str()));
        if !any_keyword_matches {
            candidate.add(-5.0, format!("negative category: {category}"));
        }
    }

    // Keyword hint: any query keyword anywhere in basename, parent, or content.
    let parent = candidate
        .path
        .parent()
        .map(|p| p.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let any_hint = query_keywords
        .iter()
        .any(|k| basename.contains(k.as_str()) || parent.contains(k.as_str()) || content_lower.contains(k.as_str()));
    if any_hint {
        candidate.add(0.5, "keyword hint match");
    } else {
        candidate.add(-0.5, "no keyword hint match");
    }
}
