//! Durable, content-addressed embedding cache (spec §4.4).
//!
//! Key: `SHA-256(path‖content)` rendered as hex, file name `<key>.json`. Writes are
//! best-effort and atomic (temp file + rename) so a cancellation mid-write leaves the
//! cache consistent (complete-and-valid or absent).
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{CacheIoSource, ContextError};
use crate::types::EmbeddingEntryOnDisk;

/// Computes the content-addressed cache key for `path‖content`.
pub fn cache_key(path: &Path, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// On-disk, content-addressed store for embedding vectors.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    root: PathBuf,
}

impl EmbeddingCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Ensures the cache directory exists. Best-effort: failures are logged and
    /// swallowed, the cache simply behaves as always-miss thereafter.
    pub async fn ensure_dir(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.root).await {
            warn!(path = %self.root.display(), error = %e, "failed to create embedding cache directory");
        }
    }

    /// Reads a cached vector for `(path, content, mtime)`. Returns `None` on any
    /// miss, parse failure, or staleness (stored mtime differs from `mtime`), and in
    /// the staleness/corruption case deletes the stale file best-effort.
    pub async fn get(&self, path: &Path, content: &str, mtime: u64) -> Option<Vec<f32>> {
        let key = cache_key(path, content);
        let entry_path = self.entry_path(&key);

        let raw = match tokio::fs::read(&entry_path).await {
            Ok(bytes) => bytes,
            Err(_) => return None,
        };

        let parsed: EmbeddingEntryOnDisk = match serde_json::from_slice(&raw) {
            Ok(v) => v,
            Err(e) => {
                let err = ContextError::CacheIoError {
                    path: entry_path.clone(),
                    source: CacheIoSource::Serde(e),
                };
                warn!(error = %err, "corrupt embedding cache entry; evicting");
                self.delete_best_effort(&entry_path).await;
                return None;
            }
        };

        if parsed.mtime != mtime || parsed.hash != key {
            self.delete_best_effort(&entry_path).await;
            return None;
        }

        Some(parsed.embedding)
    }

    /// Writes a vector to the cache, keyed by `(path, content)`, stamped with
    /// `mtime`. Best-effort: write failures are logged and swallowed. The write is
    /// atomic: a temp file is written in the cache directory and renamed into
    /// place, so readers never observe a partially-written entry.
    pub async fn set(&self, path: &Path, content: &str, mtime: u64, vector: Vec<f32>) {
        let key = cache_key(path, content);
        let entry_path = self.entry_path(&key);
        let on_disk = EmbeddingEntryOnDisk {
            embedding: vector,
            hash: key,
            mtime,
        };

        let body = match serde_json::to_vec(&on_disk) {
            Ok(b) => b,
            Err(e) => {
                let err = ContextError::CacheIoError {
                    path: entry_path.clone(),
                    source: CacheIoSource::Serde(e),
                };
                warn!(error = %err, "failed to serialize embedding cache entry");
                return;
            }
        };

        if let Err(e) = self.ensure_dir_sync_once().await {
            let err = ContextError::CacheIoError {
                path: self.root.clone(),
                source: CacheIoSource::Io(e),
            };
            warn!(error = %err, "failed to create embedding cache directory");
            return;
        }

        let root = self.root.clone();
        let path_for_err = entry_path.clone();
        let write_result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = tempfile::NamedTempFile::new_in(&root)?;
            use std::io::Write;
            tmp.write_all(&body)?;
            tmp.persist(entry_path).map_err(|e| e.error)?;
            Ok(())
        })
        .await;

        match write_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let err = ContextError::CacheIoError {
                    path: path_for_err,
                    source: CacheIoSource::Io(e),
                };
                warn!(error = %err, "failed to write embedding cache entry");
            }
            Err(e) => warn!(error = %e, "embedding cache write task panicked"),
        }
    }

    async fn ensure_dir_sync_once(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    async fn delete_best_effort(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to evict stale embedding cache entry");
            }
        }
    }

    /// Deletes entries whose filesystem mtime is older than `max_age`. Runs
    /// asynchronously; individual errors are swallowed.
    pub async fn cleanup(&self, max_age: Duration) {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(d) => d,
            Err(_) => return,
        };

        let cutoff = SystemTime::now().checked_sub(max_age);
        while let Ok(Some(entry)) = dir.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(m) => m,
                Err(_) => continue,
            };
            if let Some(cutoff) = cutoff {
                if modified < cutoff {
                    self.delete_best_effort(&path).await;
                }
            }
        }
    }
}
