//! Tunable constants for the selection pipeline (spec §9c: treat thresholds as
//! configuration, not magic numbers).
use std::time::Duration;

use crate::types::Mode;

/// Configuration for a [`crate::engine::SmartContextEngine`].
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Maximum files selected in conservative mode.
    pub max_files_conservative: usize,
    /// Maximum files selected in balanced mode.
    pub max_files_balanced: usize,
    /// Percentile used for the dynamic cut-off in conservative mode.
    pub percentile_conservative: f64,
    /// Percentile used for the dynamic cut-off in balanced mode.
    pub percentile_balanced: f64,
    /// Absolute score floor, applied regardless of percentile.
    pub min_score_floor: f64,
    /// Additive boost applied to auto-include candidates.
    pub auto_include_boost: f64,
    /// Fixed token reservation subtracted from a model's max tokens when no
    /// explicit budget is supplied.
    pub token_reservation: u32,
    /// Fallback model max-token count when `ModelMeta::max_tokens` returns `None`.
    pub fallback_model_max_tokens: u32,
    /// Floor applied to the derived token budget.
    pub min_derived_budget: u32,
    /// Maximum age of a cache entry before `cleanup` evicts it.
    pub max_cache_age: Duration,
    /// Upper bound on concurrent in-flight embedding calls.
    pub embed_concurrency: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_files_conservative: 8,
            max_files_balanced: 20,
            percentile_conservative: 0.85,
            percentile_balanced: 0.70,
            min_score_floor: 0.15,
            auto_include_boost: 10.0,
            token_reservation: 8_000,
            fallback_model_max_tokens: 32_000,
            min_derived_budget: 10_000,
            max_cache_age: Duration::from_secs(7 * 24 * 60 * 60),
            embed_concurrency: 8,
        }
    }
}

impl SelectorConfig {
    pub fn max_files(&self, mode: Mode) -> usize {
        match mode {
            Mode::Off => usize::MAX,
            Mode::Conservative => self.max_files_conservative,
            Mode::Balanced => self.max_files_balanced,
        }
    }

    pub fn percentile(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Off => 0.0,
            Mode::Conservative => self.percentile_conservative,
            Mode::Balanced => self.percentile_balanced,
        }
    }
}
