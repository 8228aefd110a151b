//! Content store access.
//!
//! The evaluation only ever needs two things from the store: a bounded
//! substring lookup over chunk text and an insert-only sink for normalized
//! inquiries. Both are traits so the retriever and responders can run
//! against Supabase or an in-memory table.

mod memory;
mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use crate::error::Result;
use crate::inquiry::Language;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Parent document of a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A unit of retrievable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub chunk_index: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default)]
    pub metadata: Value,
    #[serde(rename = "rag_documents", default)]
    pub document: Option<SourceDocument>,
}

impl Chunk {
    /// Language of the parent document, if known.
    pub fn language(&self) -> Option<&str> {
        self.document.as_ref().and_then(|d| d.lang.as_deref())
    }
}

/// Record written to the normalization sink for each grounded response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInquiry {
    pub source_type: String,
    pub language: Language,
    pub raw_message: String,
    pub constraints: Map<String, Value>,
    pub treatment_slug: Option<String>,
    pub objective: Option<String>,
}

impl NormalizedInquiry {
    /// Record for an inquiry handled by the AI agent, with no extracted
    /// constraints.
    pub fn from_agent(raw_message: impl Into<String>, language: Language) -> Self {
        Self {
            source_type: "ai_agent".to_string(),
            language,
            raw_message: raw_message.into(),
            constraints: Map::new(),
            treatment_slug: None,
            objective: None,
        }
    }
}

/// Read side of the content store.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Chunks whose content contains `pattern` (case-insensitive), in store
    /// order, at most `limit`.
    async fn find_chunks(&self, pattern: &str, limit: usize) -> Result<Vec<Chunk>>;
}

/// Insert-only sink for normalized inquiries.
#[async_trait]
pub trait NormalizationSink: Send + Sync {
    /// Insert `record`, returning the stored row when the backend echoes it.
    async fn insert_normalized(&self, record: &NormalizedInquiry) -> Result<Option<Value>>;
}

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_from_value(Value::deserialize(deserializer)?))
}

fn required_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("chunk id must not be null"))
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
