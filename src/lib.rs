//! smart-context-selector — relevance scoring and budgeted file selection for
//! local AI coding assistants.
//!
//! This crate implements the "which files go in the prompt" problem: given a
//! codebase scan, a chat transcript, and a token budget, it scores every
//! candidate file and packs the highest-scoring subset into the budget.
//!
//! Scoring path
//! - Dense: cosine similarity against a query embedding, backed by a durable,
//!   content-addressed on-disk cache ([`embedding::cache::EmbeddingCache`]).
//! - Sparse fallback: an in-memory TF-IDF index ([`tfidf::TfIdfScorer`]), used
//!   whenever no [`types::Embedder`] is configured or the query embedding call
//!   fails.
//! - Both paths feed into the same additive heuristic ([`heuristic`]) and
//!   keyword post-adjustment ([`keyword`]) passes before budgeted selection.
//!
//! Error handling
//! - [`error::ContextError`] enumerates the failure modes the pipeline can hit,
//!   but almost none of them are fatal: embedding/cache failures degrade to a
//!   fallback path or a per-file score of zero rather than aborting a `select`
//!   call. See the module doc on [`error`] for the exact degrade-to behavior of
//!   each variant.
//!
//! Configuration
//! - See [`config::SelectorConfig`] for the tunable constants (file caps,
//!   percentile cut-offs, score floor, token reservations, cache age).
//!
//! Observability
//! - The engine and its scorers are `#[tracing::instrument]`-ed; per-file
//!   degrade events are logged at `debug`/`warn`.
//!
//! Host integration
//! - The host application supplies [`types::FileScanner`], [`types::TokenEstimator`],
//!   [`types::ModelMeta`], and optionally [`types::Embedder`], [`types::Clock`], and
//!   [`types::Filesystem`]. The crate treats all of these as opaque collaborators.
//!
//! Quickstart
//! ```no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//! use smart_context_selector::{ChatContext, PromptContext, Mode, SmartContextEngine};
//! use smart_context_selector::embedding::cache::EmbeddingCache;
//!
//! # fn doc_example(
//! #     scanner: &dyn smart_context_selector::FileScanner,
//! #     estimator: &dyn smart_context_selector::TokenEstimator,
//! #     model_meta: &dyn smart_context_selector::ModelMeta,
//! # ) {
//! let cache = EmbeddingCache::new("/tmp/smart-context-cache");
//! let engine = SmartContextEngine::new(scanner, estimator, model_meta, &cache);
//! # }
//! ```
#[cfg(not(test))]
static TRACER_INIT: std::sync::Once = std::sync::Once::new();

/// Installs a minimal, target-less `fmt` tracing subscriber exactly once. A no-op
/// under `#[cfg(test)]`, where the test harness configures tracing itself; calling
/// this from a host application that already installed its own global subscriber is
/// harmless, `try_init` simply returns an error we discard.
#[cfg(not(test))]
pub fn ensure_tracer_initialized() {
    TRACER_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_target(false).try_init();
    });
}

#[cfg(test)]
pub fn ensure_tracer_initialized() {}

pub mod candidate;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod keyword;
pub mod query;
pub mod selector;
pub mod tfidf;
pub mod tokenizer;
pub mod types;

pub use config::SelectorConfig;
pub use engine::{SelectOptions, SmartContextEngine};
pub use error::ContextError;
pub use query::build_query;
pub use types::{
    ChatContext, Clock, CodebaseFile, Embedder, FileCandidate, FileScanner, Filesystem, Message,
    Mode, ModelMeta, PromptContext, RealFilesystem, Role, ScoringMethod, SelectedFile,
    SelectionDebug, SelectionResult, SystemClock, TokenEstimator, TopScore,
};
