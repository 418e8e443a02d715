//! Embedding-backed scoring (spec §4.3, §4.5): cosine similarity against a fixed
//! query vector, backed by the durable [`cache::EmbeddingCache`], with bounded
//! concurrent fan-out over candidates.
pub mod cache;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::error::ContextError;
use crate::types::{Embedder, FileCandidate};
use cache::EmbeddingCache;

/// Cosine similarity. Returns `0.0` if either vector has zero magnitude or the
/// dimensions differ (spec §4.3, Glossary).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Scores candidates by embedding similarity against the query, using the cache to
/// avoid recomputing vectors for unchanged files.
pub struct EmbeddingScorer<'a> {
    embedder: &'a dyn Embedder,
    cache: &'a EmbeddingCache,
    concurrency: usize,
}

impl<'a> EmbeddingScorer<'a> {
    pub fn new(embedder: &'a dyn Embedder, cache: &'a EmbeddingCache, concurrency: usize) -> Self {
        Self {
            embedder,
            cache,
            concurrency: concurrency.max(1),
        }
    }

    /// Embeds the query. A failure here is `EmbeddingQueryFailed`, which the caller
    /// uses to abort the embedding path entirely and fall back to TF-IDF for the
    /// whole call (spec §4.3, §7).
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, ContextError> {
        self.embedder
            .embed(query)
            .await
            .map_err(ContextError::EmbeddingQueryFailed)
    }

    /// Scores every candidate against `query_vector`, mutating `score`/`reasons` in
    /// place. Per-file embedding failures are logged and that candidate simply
    /// retains score `0` from this pass (spec §4.3, §4.5, §7); they do not abort the
    /// batch.
    #[instrument(skip(self, query_vector, candidates), fields(count = candidates.len()))]
    pub async fn score_all(&self, query_vector: &[f32], candidates: &mut [FileCandidate]) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(candidates.len());

        for idx in 0..candidates.len() {
            let path = candidates[idx].path.clone();
            let content = candidates[idx].content.clone();
            let mtime = candidates[idx].mtime_ms;
            let permit = semaphore.clone().acquire_owned();
            handles.push(async move {
                let _permit = permit.await.expect("semaphore not closed");
                (idx, self.resolve_vector(&path, &content, mtime).await)
            });
        }

        let results = futures::future::join_all(handles).await;
        for (idx, outcome) in results {
            let candidate = &mut candidates[idx];
            match outcome {
                Ok(vector) => {
                    let sim = cosine_similarity(query_vector, &vector);
                    candidate.add(sim, format!("embedding similarity: {:.3}", sim));
                }
                Err(e) => {
                    debug!(path = %candidate.path.display(), error = %e, "per-file embedding failed; skipping embedding contribution");
                }
            }
        }
    }

    async fn resolve_vector(
        &self,
        path: &Path,
        content: &str,
        mtime: Option<u64>,
    ) -> Result<Vec<f32>, ContextError> {
        if let Some(mtime) = mtime {
            if let Some(cached) = self.cache.get(path, content, mtime).await {
                return Ok(cached);
            }
        }

        let vector = self.embedder.embed(content).await.map_err(|e| {
            ContextError::EmbeddingDocumentFailed {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        if let Some(mtime) = mtime {
            self.cache.set(path, content, mtime, vector.clone()).await;
        }

        Ok(vector)
    }
}
