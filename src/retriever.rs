//! Token-overlap chunk retrieval.
//!
//! Candidates come from a substring lookup on the raw query, are filtered
//! by document language, and ranked by how many query tokens each chunk
//! contains. Store failures are logged and yield no chunks, so callers
//! cannot tell "nothing relevant" from "store unreachable".

use crate::store::{Chunk, ChunkStore};
use crate::text::{self, Charset};
use std::sync::Arc;

/// Retrieval options.
#[derive(Debug, Clone)]
pub struct RetrieverOptions {
    /// Candidates requested from the store.
    pub candidate_limit: usize,
    /// Maximum number of chunks returned.
    pub top_k: usize,
    /// Characters retained when tokenizing the query.
    pub charset: Charset,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self {
            candidate_limit: 6,
            top_k: 6,
            charset: Charset::default(),
        }
    }
}

/// A chunk with its token-overlap score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: usize,
}

/// Chunk retriever over a [`ChunkStore`].
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn ChunkStore>,
    options: RetrieverOptions,
}

impl Retriever {
    /// Create a retriever with default options.
    pub fn new(store: Arc<dyn ChunkStore>) -> Self {
        Self::with_options(store, RetrieverOptions::default())
    }

    /// Create with custom options.
    pub fn with_options(store: Arc<dyn ChunkStore>, options: RetrieverOptions) -> Self {
        Self { store, options }
    }

    /// Top chunks for `query`, restricted to documents in `language` when given.
    pub async fn search(&self, query: &str, language: Option<&str>) -> Vec<ScoredChunk> {
        let tokens = text::query_tokens(query, self.options.charset);

        let candidates = match self
            .store
            .find_chunks(query, self.options.candidate_limit)
            .await
        {
            Ok(chunks) => chunks,
            Err(e) => {
                tracing::warn!(error = %e, "chunk search failed, continuing without context");
                return Vec::new();
            }
        };

        let candidates = filter_language(candidates, language);
        let mut results = rank(candidates, &tokens);
        results.truncate(self.options.top_k);

        tracing::debug!(
            query,
            tokens = ?tokens,
            returned = results.len(),
            "retrieved chunks"
        );
        results
    }
}

/// Keep only chunks whose document language equals `language` exactly.
fn filter_language(chunks: Vec<Chunk>, language: Option<&str>) -> Vec<Chunk> {
    match language {
        Some(lang) if !lang.is_empty() => chunks
            .into_iter()
            .filter(|c| c.language() == Some(lang))
            .collect(),
        _ => chunks,
    }
}

/// Score chunks by token containment and sort best-first. Ties keep their
/// input order.
pub fn rank(chunks: Vec<Chunk>, tokens: &[String]) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = chunks
        .into_iter()
        .map(|chunk| {
            let content = chunk.content.to_lowercase();
            let score = tokens
                .iter()
                .filter(|t| content.contains(t.to_lowercase().as_str()))
                .count();
            ScoredChunk { chunk, score }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
