use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::corpus::{load_corpus, KnowledgeCorpus, DEFAULT_DOCUMENTS};

/// How the store refreshes its corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusMode {
    /// Re-read every document on each request.
    Reload,
    /// Keep the last corpus until a document changes on disk.
    Cached,
}

impl CorpusMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reload" => Some(Self::Reload),
            "cached" | "cache" => Some(Self::Cached),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorpusMode::Reload => "reload",
            CorpusMode::Cached => "cached",
        }
    }
}

/// Size and modification time of a document; `None` when it cannot be read.
type Fingerprint = Option<(u64, Option<SystemTime>)>;

struct CachedCorpus {
    corpus: Arc<KnowledgeCorpus>,
    fingerprints: Vec<Fingerprint>,
    loaded_at: DateTime<Utc>,
}

/// Serves knowledge corpora to request handlers.
pub struct CorpusStore {
    directory: PathBuf,
    documents: Vec<String>,
    mode: CorpusMode,
    cache: RwLock<Option<CachedCorpus>>,
}

impl CorpusStore {
    pub fn new(directory: impl Into<PathBuf>, documents: Vec<String>, mode: CorpusMode) -> Self {
        Self {
            directory: directory.into(),
            documents,
            mode,
            cache: RwLock::new(None),
        }
    }

    pub fn with_default_documents(directory: impl Into<PathBuf>, mode: CorpusMode) -> Self {
        let documents = DEFAULT_DOCUMENTS.iter().map(|name| name.to_string()).collect();
        Self::new(directory, documents, mode)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn mode(&self) -> CorpusMode {
        self.mode
    }

    /// Current corpus. In cached mode the documents are fingerprinted on every
    /// call and reloaded when any of them changed.
    pub fn snapshot(&self) -> Arc<KnowledgeCorpus> {
        let fingerprints = match self.mode {
            CorpusMode::Reload => Vec::new(),
            CorpusMode::Cached => {
                let current = self.fingerprints();
                let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
                if let Some(cached) = cache.as_ref() {
                    if cached.fingerprints == current {
                        return Arc::clone(&cached.corpus);
                    }
                }
                current
            }
        };

        let corpus = Arc::new(load_corpus(&self.directory, &self.documents));
        if self.mode == CorpusMode::Cached {
            info!(
                directory = %self.directory.display(),
                documents = corpus.documents().len(),
                "knowledge corpus refreshed"
            );
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedCorpus {
            corpus: Arc::clone(&corpus),
            fingerprints,
            loaded_at: Utc::now(),
        });

        corpus
    }

    pub fn status(&self) -> CorpusStatus {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        CorpusStatus {
            mode: self.mode,
            directory: self.directory.display().to_string(),
            configured: self.documents.clone(),
            loaded: cache
                .as_ref()
                .map(|cached| cached.corpus.documents().to_vec())
                .unwrap_or_default(),
            loaded_at: cache.as_ref().map(|cached| cached.loaded_at),
        }
    }

    fn fingerprints(&self) -> Vec<Fingerprint> {
        self.documents
            .iter()
            .map(|name| {
                fs::metadata(self.directory.join(name))
                    .ok()
                    .map(|meta| (meta.len(), meta.modified().ok()))
            })
            .collect()
    }
}

/// Snapshot of the store reported by the knowledge endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStatus {
    pub mode: CorpusMode,
    pub directory: String,
    pub configured: Vec<String>,
    pub loaded: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
}
