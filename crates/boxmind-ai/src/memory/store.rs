//! TF-IDF long-term memory store.
//!
//! Chunks live in a bounded deque (oldest first) persisted as a JSON array in
//! `memory.json`. The IDF table is rebuilt lazily: inserts and loads mark it
//! dirty, `search` rebuilds it before scoring.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SubsecRound, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::chunk::{ChunkKind, MemoryChunk};
use super::tfidf::{IdfTable, cosine_similarity, term_frequency};
use crate::error::Result;
use crate::text_utils::head_chars;
use crate::tokenizer::tokenize;

/// Memory file name inside a session workspace.
pub const MEMORY_FILE: &str = "memory.json";
/// Maximum number of chunks retained; older chunks are evicted first.
pub const MAX_CHUNKS: usize = 200;
/// Chunk content is cut to this many characters before tokenizing.
pub const MAX_CONTENT_CHARS: usize = 2000;
/// Content yielding fewer tokens than this is rejected.
pub const MIN_CHUNK_TOKENS: usize = 3;
/// Number of most recent chunks checked for near-duplicates.
pub const DEDUP_WINDOW: usize = 30;
/// TF cosine similarity above which a candidate is a near-duplicate.
pub const DEDUP_THRESHOLD: f64 = 0.9;
/// Scores at or below this are not returned by search.
pub const MIN_RELEVANCE: f64 = 0.01;
/// Default number of search results.
pub const DEFAULT_TOP_K: usize = 8;

const CHUNK_ID_LEN: usize = 8;

/// A search hit with its cosine score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: MemoryChunk,
    pub score: f64,
}

/// Persistent TF-IDF index over chunks of retired conversation.
#[derive(Debug)]
pub struct MemoryStore {
    path: PathBuf,
    chunks: VecDeque<MemoryChunk>,
    idf: IdfTable,
    idf_dirty: bool,
}

impl MemoryStore {
    /// Create an empty store backed by `path`. Nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            chunks: VecDeque::with_capacity(MAX_CHUNKS + 1),
            idf: IdfTable::default(),
            idf_dirty: true,
        }
    }

    /// Create a store for `dir/memory.json` and load it.
    pub fn open_in(dir: impl AsRef<Path>) -> Self {
        let mut store = Self::new(dir.as_ref().join(MEMORY_FILE));
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunks, oldest first.
    pub fn chunks(&self) -> impl Iterator<Item = &MemoryChunk> {
        self.chunks.iter()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Replace the in-memory chunks with the file contents.
    ///
    /// A missing or unparsable file leaves the store empty.
    pub fn load(&mut self) {
        self.chunks.clear();
        self.idf_dirty = true;

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Failed to read memory file, starting empty");
                return;
            }
        };

        match serde_json::from_str::<Vec<MemoryChunk>>(&raw) {
            Ok(chunks) => {
                self.chunks.extend(chunks);
                self.evict_overflow();
                tracing::debug!(chunks = self.chunks.len(), "Loaded memory store");
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Memory file is corrupt, starting empty");
            }
        }
    }

    /// Write every chunk to the memory file.
    ///
    /// Writes `memory.json.tmp` first and renames it over the target.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.chunks)?;
        write_atomic(&self.path, &json)
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Store a chunk. Returns `false` when the content carries fewer than
    /// three tokens or nearly duplicates one of the last 30 chunks.
    pub fn add_chunk(
        &mut self,
        kind: ChunkKind,
        source: impl Into<String>,
        label: impl Into<String>,
        content: &str,
    ) -> bool {
        let content = head_chars(content, MAX_CONTENT_CHARS);
        let tokens = tokenize(content);
        if tokens.len() < MIN_CHUNK_TOKENS {
            return false;
        }

        let candidate = term_frequency(&tokens);
        let duplicate = self
            .chunks
            .iter()
            .rev()
            .take(DEDUP_WINDOW)
            .any(|existing| {
                cosine_similarity(&candidate, &term_frequency(&existing.tokens)) > DEDUP_THRESHOLD
            });
        if duplicate {
            return false;
        }

        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(CHUNK_ID_LEN);

        self.chunks.push_back(MemoryChunk {
            id,
            timestamp: Utc::now().trunc_subsecs(3),
            kind,
            source: source.into(),
            label: label.into(),
            content: content.to_string(),
            tokens,
        });
        self.idf_dirty = true;
        self.evict_overflow();
        true
    }

    fn evict_overflow(&mut self) {
        while self.chunks.len() > MAX_CHUNKS {
            self.chunks.pop_front();
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Recompute IDF weights over the current chunks if they changed.
    pub fn rebuild_idf(&mut self) {
        if !self.idf_dirty {
            return;
        }
        self.idf = IdfTable::build(self.chunks.iter().map(|c| c.tokens.as_slice()));
        self.idf_dirty = false;
    }

    /// Top `top_k` chunks by TF-IDF cosine similarity to `query`.
    pub fn search(&mut self, query: &str, top_k: usize) -> Vec<MemoryChunk> {
        self.search_scored(query, top_k)
            .into_iter()
            .map(|hit| hit.chunk)
            .collect()
    }

    /// Like [`search`](Self::search) but keeps the scores.
    ///
    /// Equal scores rank the more recently inserted chunk first.
    pub fn search_scored(&mut self, query: &str, top_k: usize) -> Vec<ScoredChunk> {
        if self.chunks.is_empty() || top_k == 0 {
            return Vec::new();
        }

        self.rebuild_idf();

        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }
        let query_vec = self.idf.vector(&query_tokens);

        // Newest first so the stable sort below breaks ties by recency.
        let mut scored: Vec<(f64, &MemoryChunk)> = self
            .chunks
            .iter()
            .rev()
            .filter_map(|chunk| {
                let score = cosine_similarity(&query_vec, &self.idf.vector(&chunk.tokens));
                (score > MIN_RELEVANCE).then_some((score, chunk))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(score, chunk)| ScoredChunk {
                chunk: chunk.clone(),
                score,
            })
            .collect()
    }
}

/// Write `contents` next to `path` as `<name>.tmp`, then rename over `path`.
///
/// Readers never observe a partially written file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| MEMORY_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}
