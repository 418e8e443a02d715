//! Smart Context Engine (spec §4.11): the single public `select` entry point that
//! orchestrates every stage — harvesting, scoring, heuristic/keyword adjustment,
//! and budgeted selection — and emits a full debug trace with each call.
use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::config::SelectorConfig;
use crate::embedding::cache::EmbeddingCache;
use crate::embedding::EmbeddingScorer;
use crate::error::ContextError;
use crate::heuristic;
use crate::keyword;
use crate::query::build_query;
use crate::selector;
use crate::tfidf::TfIdfScorer;
use crate::tokenizer::{extract_keywords, tokenize};
use crate::types::{
    ChatContext, Clock, Embedder, FileScanner, Filesystem, Mode, ModelMeta, PromptContext,
    RealFilesystem, ScoringMethod, SelectedFile, SelectionDebug, SelectionResult, SystemClock,
    TokenEstimator,
};

/// Everything a single `select` call needs from the host application.
pub struct SelectOptions<'a> {
    pub app_path: &'a Path,
    pub chat_context: &'a ChatContext,
    pub prompt_context: &'a PromptContext,
    pub mode: Mode,
    pub model: &'a str,
    /// Explicit token budget. When `None`, derived from `model` via [`ModelMeta`].
    pub token_budget: Option<u32>,
}

/// Ties together the host-supplied collaborators for one or more `select` calls.
pub struct SmartContextEngine<'a> {
    scanner: &'a dyn FileScanner,
    estimator: &'a dyn TokenEstimator,
    model_meta: &'a dyn ModelMeta,
    embedder: Option<&'a dyn Embedder>,
    cache: &'a EmbeddingCache,
    clock: &'a dyn Clock,
    filesystem: &'a dyn Filesystem,
    config: SelectorConfig,
}

static DEFAULT_CLOCK: SystemClock = SystemClock;
static DEFAULT_FILESYSTEM: RealFilesystem = RealFilesystem;

impl<'a> SmartContextEngine<'a> {
    /// Constructs the engine and, per spec §4.4, kicks off construction-time cache
    /// eviction (`cleanup(max_cache_age)`) as a detached background task. Must be
    /// called from within a Tokio runtime.
    pub fn new(
        scanner: &'a dyn FileScanner,
        estimator: &'a dyn TokenEstimator,
        model_meta: &'a dyn ModelMeta,
        cache: &'a EmbeddingCache,
    ) -> Self {
        let engine = Self {
            scanner,
            estimator,
            model_meta,
            embedder: None,
            cache,
            clock: &DEFAULT_CLOCK,
            filesystem: &DEFAULT_FILESYSTEM,
            config: SelectorConfig::default(),
        };
        engine.spawn_cache_eviction();
        engine
    }

    fn spawn_cache_eviction(&self) {
        let cache = self.cache.clone();
        let max_age = self.config.max_cache_age;
        tokio::spawn(async move {
            cache.cleanup(max_age).await;
        });
    }

    pub fn with_embedder(mut self, embedder: &'a dyn Embedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_filesystem(mut self, filesystem: &'a dyn Filesystem) -> Self {
        self.filesystem = filesystem;
        self
    }

    /// Replaces the config. Note this runs after construction, so a
    /// `max_cache_age` override here does not affect the eviction sweep already
    /// spawned in `new`.
    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs one selection (spec §4.11). `mode = Off` is a pure pass-through: every
    /// scanned file is returned, unscored, with `scoringMethod = "traditional"`.
    #[instrument(skip(self, options), fields(mode = ?options.mode, model = options.model))]
    pub async fn select(&self, options: SelectOptions<'_>) -> SelectionResult {
        let files = self.scanner.extract(options.app_path, options.chat_context);

        if matches!(options.mode, Mode::Off) {
            let token_usage: u32 = files
                .iter()
                .map(|f| self.estimator.estimate(&f.content))
                .sum();
            let selected_files: Vec<SelectedFile> = files
                .into_iter()
                .map(|f| SelectedFile {
                    path: f.path,
                    content: f.content,
                    force: f.force,
                })
                .collect();
            let total = selected_files.len();
            return SelectionResult {
                selected_files,
                debug: SelectionDebug {
                    total_candidates: total,
                    selected_count: total,
                    token_usage,
                    token_budget: token_usage,
                    scoring_method: ScoringMethod::Traditional,
                    top_scores: Vec::new(),
                    auto_includes_count: 0,
                    excluded_count: 0,
                },
            };
        }

        let token_budget = options.token_budget.unwrap_or_else(|| {
            let max_tokens = self
                .model_meta
                .max_tokens(options.model)
                .unwrap_or(self.config.fallback_model_max_tokens);
            max_tokens
                .saturating_sub(self.config.token_reservation)
                .max(self.config.min_derived_budget)
        });

        let auto_include_paths: HashSet<_> = options
            .chat_context
            .smart_context_auto_includes
            .iter()
            .cloned()
            .collect();

        let mut candidates =
            crate::candidate::prepare(files, &auto_include_paths, self.filesystem, self.estimator);

        let query = build_query(options.prompt_context);
        let query_keywords = extract_keywords(&query);

        let scoring_method = self.apply_base_scores(&query, &mut candidates).await;

        let now_ms = self.clock.now_ms();
        for candidate in &mut candidates {
            heuristic::apply(candidate, &query_keywords, now_ms, &self.config);
            keyword::apply(candidate, &query_keywords);
        }

        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        debug!(scoring_method = scoring_method.as_str(), token_budget, "running budgeted selection");
        selector::select(candidates, token_budget, options.mode, scoring_method, &self.config)
    }

    /// Scores every candidate by embedding similarity if an embedder is configured
    /// and the query embeds successfully; otherwise (or on query-embedding failure)
    /// falls back to TF-IDF over the full candidate corpus for the whole call.
    async fn apply_base_scores(
        &self,
        query: &str,
        candidates: &mut [crate::types::FileCandidate],
    ) -> ScoringMethod {
        if let Some(embedder) = self.embedder {
            let scorer = EmbeddingScorer::new(embedder, self.cache, self.config.embed_concurrency);
            match scorer.embed_query(query).await {
                Ok(query_vector) => {
                    scorer.score_all(&query_vector, candidates).await;
                    return ScoringMethod::Embeddings;
                }
                Err(e) => {
                    warn!(error = %e, "query embedding failed; falling back to tf-idf for this call");
                }
            }
        } else {
            let err = ContextError::EmbeddingUnavailable;
            debug!(error = %err, "falling back to tf-idf for this call");
        }

        let documents: Vec<(&str, &str)> = candidates
            .iter()
            .map(|c| (c.path.to_str().unwrap_or_default(), c.content.as_str()))
            .collect();
        let tfidf = TfIdfScorer::build(documents);
        let query_tokens = tokenize(query);
        for candidate in candidates.iter_mut() {
            let path = candidate.path.to_str().unwrap_or_default();
            let score = tfidf.score(path, &query_tokens);
            candidate.add(score, format!("tf-idf score: {:.3}", score));
        }
        ScoringMethod::TfIdf
    }
}
