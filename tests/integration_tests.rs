//! End-to-end scenarios exercising the full selection pipeline through the public
//! [`SmartContextEngine`] API, using stub collaborators in place of a real host
//! application.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use smart_context_selector::embedding::cache::EmbeddingCache;
use smart_context_selector::{
    ChatContext, Clock, CodebaseFile, Embedder, FileScanner, Filesystem, Message, Mode, ModelMeta,
    PromptContext, Role, ScoringMethod, SelectOptions, SmartContextEngine, TokenEstimator,
};

struct StubScanner(Vec<CodebaseFile>);
impl FileScanner for StubScanner {
    fn extract(&self, _app_path: &Path, _chat_context: &ChatContext) -> Vec<CodebaseFile> {
        self.0.clone()
    }
}

struct LenEstimator;
impl TokenEstimator for LenEstimator {
    fn estimate(&self, text: &str) -> u32 {
        text.len() as u32
    }
}

struct FixedModelMeta(Option<u32>);
impl ModelMeta for FixedModelMeta {
    fn max_tokens(&self, _model: &str) -> Option<u32> {
        self.0
    }
}

struct FixedClock(u64);
impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

struct StubFilesystem(HashMap<PathBuf, u64>);
impl Filesystem for StubFilesystem {
    fn mtime_ms(&self, path: &Path) -> Option<u64> {
        self.0.get(path).copied()
    }
}

#[derive(Debug)]
struct FailingEmbedder;
impl Embedder for FailingEmbedder {
    fn dimensions(&self) -> usize {
        4
    }
    fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, String>> {
        Box::pin(async { Err("backend unreachable".to_string()) })
    }
}

/// An embedder whose vector is a deterministic, content-derived one-hot-ish
/// encoding so that similarity ordering is predictable in tests.
#[derive(Debug)]
struct KeywordEmbedder;
impl Embedder for KeywordEmbedder {
    fn dimensions(&self) -> usize {
        3
    }
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, String>> {
        let lower = text.to_lowercase();
        let v = vec![
            if lower.contains("theme") { 1.0 } else { 0.0 },
            if lower.contains("chart") { 1.0 } else { 0.0 },
            1.0,
        ];
        Box::pin(async move { Ok(v) })
    }
}

fn file(path: &str, content: &str) -> CodebaseFile {
    CodebaseFile {
        path: PathBuf::from(path),
        content: content.to_string(),
        force: false,
    }
}

fn prompt_with(text: &str) -> PromptContext {
    PromptContext {
        user_prompt: text.to_string(),
        recent_messages: vec![Message {
            role: Role::User,
            content: text.to_string(),
        }],
    }
}

#[tokio::test]
async fn balanced_mode_favors_theme_files_over_chart_and_docs() {
    let files = vec![
        file("src/components/ThemeToggle.tsx", "export const ThemeToggle toggle dark theme"),
        file("src/components/chart/BarChart.tsx", "export const BarChart chart rendering"),
        file("README.md", "project documentation overview"),
    ];
    let scanner = StubScanner(files);
    let estimator = LenEstimator;
    let model_meta = FixedModelMeta(Some(32_000));
    let dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(dir.path());
    let engine = SmartContextEngine::new(&scanner, &estimator, &model_meta, &cache);

    let chat_ctx = ChatContext::default();
    let prompt_ctx = prompt_with("add a dark mode theme toggle");
    let result = engine
        .select(SelectOptions {
            app_path: Path::new("."),
            chat_context: &chat_ctx,
            prompt_context: &prompt_ctx,
            mode: Mode::Balanced,
            model: "gpt",
            token_budget: Some(10_000),
        })
        .await;

    let selected_paths: Vec<_> = result
        .selected_files
        .iter()
        .map(|f| f.path.clone())
        .collect();
    assert!(selected_paths.contains(&PathBuf::from("src/components/ThemeToggle.tsx")));
    assert!(!selected_paths.contains(&PathBuf::from("src/components/chart/BarChart.tsx")));
    assert!(!selected_paths.contains(&PathBuf::from("README.md")));
}

#[tokio::test]
async fn conservative_mode_caps_at_eight_files_out_of_thirty_candidates() {
    let mut files = Vec::new();
    for i in 0..30 {
        files.push(file(&format!("src/file{i}.rs"), "module parser tokens content"));
    }
    let scanner = StubScanner(files);
    let estimator = LenEstimator;
    let model_meta = FixedModelMeta(Some(32_000));
    let dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(dir.path());
    let engine = SmartContextEngine::new(&scanner, &estimator, &model_meta, &cache);

    let chat_ctx = ChatContext::default();
    let prompt_ctx = prompt_with("parser module tokens");
    let result = engine
        .select(SelectOptions {
            app_path: Path::new("."),
            chat_context: &chat_ctx,
            prompt_context: &prompt_ctx,
            mode: Mode::Conservative,
            model: "gpt",
            token_budget: Some(1_000_000),
        })
        .await;

    assert_eq!(result.debug.total_candidates, 30);
    assert!(result.selected_files.len() <= 8);
}

#[tokio::test]
async fn auto_include_bypasses_a_low_relevance_score() {
    let files = vec![
        file("src/secrets.env", "UNRELATED_KEY=value"),
        file("src/relevant.rs", "theme toggle dark mode"),
    ];
    let scanner = StubScanner(files);
    let estimator = LenEstimator;
    let model_meta = FixedModelMeta(Some(32_000));
    let dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(dir.path());
    let engine = SmartContextEngine::new(&scanner, &estimator, &model_meta, &cache);

    let mut chat_ctx = ChatContext::default();
    chat_ctx
        .smart_context_auto_includes
        .push(PathBuf::from("src/secrets.env"));
    let prompt_ctx = prompt_with("add a dark mode theme toggle");
    let result = engine
        .select(SelectOptions {
            app_path: Path::new("."),
            chat_context: &chat_ctx,
            prompt_context: &prompt_ctx,
            mode: Mode::Balanced,
            model: "gpt",
            token_budget: Some(10_000),
        })
        .await;

    let pinned = result
        .selected_files
        .iter()
        .find(|f| f.path == PathBuf::from("src/secrets.env"));
    assert!(pinned.is_some());
    let debug_entry = result
        .debug
        .top_scores
        .iter()
        .find(|t| t.path == PathBuf::from("src/secrets.env"));
    assert!(debug_entry.is_some());
    assert!(debug_entry
        .unwrap()
        .reasons
        .iter()
        .any(|r| r.contains("auto-include")));
}

#[tokio::test]
async fn embedding_query_failure_falls_back_to_tf_idf_for_the_whole_call() {
    let files = vec![
        file("parser.rs", "parser module tokens"),
        file("unrelated.rs", "completely different content"),
    ];
    let scanner = StubScanner(files);
    let estimator = LenEstimator;
    let model_meta = FixedModelMeta(Some(32_000));
    let dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(dir.path());
    let embedder = FailingEmbedder;
    let engine =
        SmartContextEngine::new(&scanner, &estimator, &model_meta, &cache).with_embedder(&embedder);

    let chat_ctx = ChatContext::default();
    let prompt_ctx = prompt_with("parser module");
    let result = engine
        .select(SelectOptions {
            app_path: Path::new("."),
            chat_context: &chat_ctx,
            prompt_context: &prompt_ctx,
            mode: Mode::Balanced,
            model: "gpt",
            token_budget: Some(10_000),
        })
        .await;

    assert_eq!(result.debug.scoring_method, ScoringMethod::TfIdf);
}

#[tokio::test]
async fn stale_cache_entry_is_evicted_and_the_embedder_is_re_invoked() {
    let dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(dir.path());
    let path = PathBuf::from("a.rs");
    let content = "fn a() {}";
    cache.set(&path, content, 1_000, vec![9.0, 9.0, 9.0]).await;

    // Different mtime than what was cached: the cache must treat this as stale and
    // miss, forcing the embedder (not the stale vector) to answer.
    let got = cache.get(&path, content, 2_000).await;
    assert_eq!(got, None);

    let files = vec![file("a.rs", content)];
    let scanner = StubScanner(files);
    let estimator = LenEstimator;
    let model_meta = FixedModelMeta(Some(32_000));
    let embedder = KeywordEmbedder;
    let mut stub_mtimes = HashMap::new();
    stub_mtimes.insert(PathBuf::from("a.rs"), 2_000u64);
    let stub_fs = StubFilesystem(stub_mtimes);
    let engine = SmartContextEngine::new(&scanner, &estimator, &model_meta, &cache)
        .with_embedder(&embedder)
        .with_filesystem(&stub_fs);

    let chat_ctx = ChatContext::default();
    let prompt_ctx = prompt_with("theme");
    let result = engine
        .select(SelectOptions {
            app_path: Path::new("."),
            chat_context: &chat_ctx,
            prompt_context: &prompt_ctx,
            mode: Mode::Balanced,
            model: "gpt",
            token_budget: Some(10_000),
        })
        .await;

    assert_eq!(result.debug.scoring_method, ScoringMethod::Embeddings);
    let refreshed = cache.get(&path, content, 2_000).await;
    assert_eq!(refreshed, Some(vec![0.0, 0.0, 1.0]));
}

#[tokio::test]
async fn off_mode_returns_every_file_unscored() {
    let files = vec![
        file("a.rs", "12345"),
        file("b.rs", "67"),
    ];
    let scanner = StubScanner(files);
    let estimator = LenEstimator;
    let model_meta = FixedModelMeta(Some(32_000));
    let dir = tempfile::tempdir().unwrap();
    let cache = EmbeddingCache::new(dir.path());
    let clock = FixedClock(0);
    let engine = SmartContextEngine::new(&scanner, &estimator, &model_meta, &cache).with_clock(&clock);

    let chat_ctx = ChatContext::default();
    let prompt_ctx = prompt_with("anything");
    let result = engine
        .select(SelectOptions {
            app_path: Path::new("."),
            chat_context: &chat_ctx,
            prompt_context: &prompt_ctx,
            mode: Mode::Off,
            model: "gpt",
            token_budget: None,
        })
        .await;

    assert_eq!(result.selected_files.len(), 2);
    assert_eq!(result.debug.token_usage, 7);
    assert_eq!(result.debug.token_budget, 7);
    assert_eq!(result.debug.scoring_method, ScoringMethod::Traditional);
    assert!(result.debug.top_scores.is_empty());
}
