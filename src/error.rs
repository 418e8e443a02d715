//! Error taxonomy for the context selector.
//!
//! Per spec: nothing in here is fatal to a `select` call. `select` itself never
//! returns an `Err` of this type; every variant is constructed, logged, and degraded
//! around at the point it occurs:
//! - `EmbeddingUnavailable` is constructed and logged when no embedder is
//!   configured, immediately before falling back to the TF-IDF path.
//! - `EmbeddingQueryFailed` triggers the same TF-IDF fallback, but for a failed
//!   call rather than a missing embedder.
//! - `EmbeddingDocumentFailed` leaves a single candidate's embedding contribution
//!   at zero without aborting the rest of the batch.
//! - `CacheIoError` is constructed and logged wherever the cache's read/write path
//!   hits an I/O or (de)serialization failure; the cache simply behaves as a miss
//!   or no-op in response.
//! - `StatMissing` is constructed and logged when a candidate's filesystem mtime
//!   can't be resolved; recency scoring and cache lookup are skipped for that file.
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// No embedder is configured for this call. Not fatal: triggers the TF-IDF path.
    #[error("embedding backend unavailable")]
    EmbeddingUnavailable,

    /// The query embedding call failed. Recovered by falling back to TF-IDF for the
    /// whole call.
    #[error("query embedding failed: {0}")]
    EmbeddingQueryFailed(String),

    /// A single document's embedding call failed. The candidate keeps its heuristic
    /// and keyword adjustments but scores 0 from the embedding path.
    #[error("embedding failed for {path}: {source}")]
    EmbeddingDocumentFailed { path: PathBuf, source: String },

    /// Cache read/write/stat failure. Swallowed by callers; treated as a miss on
    /// reads and a no-op on writes.
    #[error("cache io error at {path}: {source}")]
    CacheIoError {
        path: PathBuf,
        #[source]
        source: CacheIoSource,
    },

    /// Filesystem stat of a candidate failed. Recency scoring and cache lookup are
    /// skipped for that file.
    #[error("stat missing for {0}")]
    StatMissing(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum CacheIoSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}
