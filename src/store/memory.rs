//! In-memory store, for offline runs and tests.

use super::{Chunk, ChunkStore, NormalizationSink, NormalizedInquiry};
use crate::error::{EvalError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;

/// A fixed chunk table plus a log of inserted normalized inquiries.
#[derive(Debug, Default)]
pub struct MemoryStore {
    chunks: Vec<Chunk>,
    inserted: Mutex<Vec<NormalizedInquiry>>,
}

impl MemoryStore {
    /// Create a store over the given chunks, kept in the given order.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks,
            inserted: Mutex::new(Vec::new()),
        }
    }

    /// Load chunks from a JSON array in the same shape the REST API returns.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;
        let chunks: Vec<Chunk> = serde_json::from_str(&content)
            .map_err(|e| EvalError::Serialization(e.to_string()))?;
        Ok(Self::new(chunks))
    }

    /// Records received by the sink so far.
    pub fn inserted(&self) -> Vec<NormalizedInquiry> {
        self.inserted
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn find_chunks(&self, pattern: &str, limit: usize) -> Result<Vec<Chunk>> {
        let needle = pattern.to_lowercase();
        Ok(self
            .chunks
            .iter()
            .filter(|c| c.content.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NormalizationSink for MemoryStore {
    async fn insert_normalized(&self, record: &NormalizedInquiry) -> Result<Option<Value>> {
        let mut rows = self
            .inserted
            .lock()
            .map_err(|_| EvalError::Store("memory store lock poisoned".to_string()))?;
        rows.push(record.clone());

        let mut row = serde_json::to_value(record)?;
        if let Value::Object(map) = &mut row {
            map.insert("id".to_string(), Value::from(rows.len()));
        }
        Ok(Some(row))
    }
}
