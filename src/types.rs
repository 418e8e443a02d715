//! Data model (spec §3) and provider interfaces (spec §6) the engine requires from
//! its host application.
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// A file handed to the selector by the host's file scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebaseFile {
    /// Workspace-relative path.
    pub path: PathBuf,
    /// UTF-8 file content.
    pub content: String,
    /// Always-include flag set upstream by the scanner (e.g. pinned files).
    pub force: bool,
}

/// Chat-session context supplied by the host application.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// Workspace-relative, glob-normalized paths the user has pinned into context.
    pub smart_context_auto_includes: Vec<PathBuf>,
    /// Paths already excluded upstream (informational; the selector does not
    /// re-apply exclusion, the scanner is assumed to have already done so).
    pub exclude_paths: HashSet<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single turn in the running chat transcript.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The current prompt plus recent transcript, used to build the scoring query.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    pub user_prompt: String,
    pub recent_messages: Vec<Message>,
}

/// Selection mode (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Off,
    Conservative,
    Balanced,
}

/// A candidate file as it flows through scoring (spec §3 `FileCandidate`).
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub content: String,
    pub force: bool,
    pub is_auto_include: bool,
    pub tokens: u32,
    pub score: f64,
    pub reasons: Vec<String>,
    /// Filesystem mtime in milliseconds since the epoch, when known.
    pub mtime_ms: Option<u64>,
}

impl FileCandidate {
    pub fn add(&mut self, delta: f64, reason: impl Into<String>) {
        self.score += delta;
        self.reasons.push(reason.into());
    }
}

/// Which base scorer ran for a given `select` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMethod {
    Embeddings,
    TfIdf,
    Traditional,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::Embeddings => "embeddings",
            ScoringMethod::TfIdf => "tf-idf",
            ScoringMethod::Traditional => "traditional",
        }
    }
}

/// One entry of the top-10 debug trace.
#[derive(Debug, Clone)]
pub struct TopScore {
    pub path: PathBuf,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Structured debug/observability trace returned alongside every selection.
#[derive(Debug, Clone)]
pub struct SelectionDebug {
    pub total_candidates: usize,
    pub selected_count: usize,
    pub token_usage: u32,
    pub token_budget: u32,
    pub scoring_method: ScoringMethod,
    pub top_scores: Vec<TopScore>,
    pub auto_includes_count: usize,
    pub excluded_count: usize,
}

/// A single selected file, ready for the downstream prompt assembler.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub content: String,
    pub force: bool,
}

/// The result of a `select` call (spec §3 `SelectionResult`).
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub selected_files: Vec<SelectedFile>,
    pub debug: SelectionDebug,
}

// --- Provider interfaces (spec §6) ---------------------------------------------

/// Produces candidate files honoring upstream include/exclude/auto-include and size
/// caps. The core treats this as an opaque collaborator.
pub trait FileScanner: Send + Sync {
    fn extract(&self, app_path: &Path, chat_context: &ChatContext) -> Vec<CodebaseFile>;
}

/// Opaque, deterministic token estimator.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> u32;
}

/// Reports a model's maximum context size, if known.
pub trait ModelMeta: Send + Sync {
    fn max_tokens(&self, model: &str) -> Option<u32>;
}

/// Wall-clock source, injectable for deterministic recency/eviction tests.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Resolves a candidate's filesystem mtime (spec §6 `Filesystem.stat`), injectable
/// for deterministic tests. A `None` return means the stat failed or is unknown;
/// callers treat that as `ContextError::StatMissing` and skip recency scoring and
/// cache lookup for that file.
pub trait Filesystem: Send + Sync {
    fn mtime_ms(&self, path: &Path) -> Option<u64>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn mtime_ms(&self, path: &Path) -> Option<u64> {
        std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
    }
}

/// Produces a fixed-dimension embedding vector for arbitrary text. May be absent
/// (the engine falls back to TF-IDF in that case).
pub trait Embedder: Send + Sync + std::fmt::Debug {
    fn dimensions(&self) -> usize;

    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, String>>;
}

/// Serialized on-disk shape of an embedding cache entry (spec §6 persisted layout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingEntryOnDisk {
    pub embedding: Vec<f32>,
    pub hash: String,
    pub mtime: u64,
}
