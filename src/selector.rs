//! Budgeted selector (spec §4.10): enforces auto-include precedence, the dynamic
//! percentile cut-off, the mode-dependent file cap, and token-budget packing.
use crate::config::SelectorConfig;
use crate::types::{Mode, SelectedFile, SelectionDebug, SelectionResult, TopScore};
use crate::types::{FileCandidate, ScoringMethod};

/// Selects a budget-bounded subset of already-scored `candidates`.
///
/// `candidates` need not be pre-sorted; this function sorts the non-auto-include
/// remainder by descending score (stable, so input order breaks ties per spec §8
/// property 4).
pub fn select(
    mut candidates: Vec<FileCandidate>,
    token_budget: u32,
    mode: Mode,
    scoring_method: ScoringMethod,
    cfg: &SelectorConfig,
) -> SelectionResult {
    let total_candidates = candidates.len();

    // Stable partition: auto-includes keep their input order and always make it in.
    let mut auto_includes: Vec<FileCandidate> = Vec::new();
    let mut rest: Vec<FileCandidate> = Vec::new();
    // `drain` in place while preserving relative order of each partition.
    let drained = std::mem::take(&mut candidates);
    for c in drained {
        if c.is_auto_include {
            auto_includes.push(c);
        } else {
            rest.push(c);
        }
    }

    let auto_includes_count = auto_includes.len();
    let mut used_tokens: u32 = 0;
    let mut selected: Vec<FileCandidate> = Vec::with_capacity(auto_includes.len() + rest.len());
    for c in auto_includes {
        used_tokens = used_tokens.saturating_add(c.tokens);
        selected.push(c);
    }

    let max_files = cfg.max_files(mode);

    // Dynamic percentile threshold over the remaining (non-auto-include) scores.
    let mut sorted_scores: Vec<f64> = rest.iter().map(|c| c.score).collect();
    sorted_scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let percentile_cut = if sorted_scores.is_empty() {
        0.0
    } else {
        let pct = cfg.percentile(mode);
        let idx = ((sorted_scores.len() as f64 * pct).floor() as isize)
            .clamp(0, sorted_scores.len() as isize - 1) as usize;
        sorted_scores[idx]
    };
    let min_score = percentile_cut.max(cfg.min_score_floor);

    // Descending-score order; stable sort keeps input order among ties.
    rest.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut excluded_count = 0usize;
    for mut c in rest {
        if selected.len() >= max_files {
            break;
        }
        if c.score < min_score {
            c.reasons.push(format!(
                "filtered: below threshold (score {:.3} < {:.3})",
                c.score, min_score
            ));
            excluded_count += 1;
            continue;
        }
        // Budget overflow stops the packer outright (spec: "stop", not "skip") —
        // later, lower-scored candidates are not probed for a smaller fit.
        if used_tokens.saturating_add(c.tokens) > token_budget {
            c.reasons.push("filtered: exceeds token budget".to_string());
            excluded_count += 1;
            break;
        }
        used_tokens = used_tokens.saturating_add(c.tokens);
        selected.push(c);
    }

    let selected_count = selected.len();
    let top_scores: Vec<TopScore> = selected
        .iter()
        .take(10)
        .map(|c| TopScore {
            path: c.path.clone(),
            score: c.score,
            reasons: c.reasons.clone(),
        })
        .collect();

    let selected_files = selected
        .into_iter()
        .map(|c| SelectedFile {
            path: c.path,
            content: c.content,
            force: c.force,
        })
        .collect();

    SelectionResult {
        selected_files,
        debug: SelectionDebug {
            total_candidates,
            selected_count,
            token_usage: used_tokens,
            token_budget,
            scoring_method,
            top_scores,
            auto_includes_count,
            excluded_count,
        },
    }
}
