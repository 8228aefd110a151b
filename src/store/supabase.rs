//! Supabase (PostgREST) backend.

use super::{Chunk, ChunkStore, NormalizationSink, NormalizedInquiry};
use crate::config::StoreConfig;
use crate::error::{EvalError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

/// Embedded select for chunks joined to their parent document.
const CHUNK_SELECT: &str =
    "id,document_id,chunk_index,content,metadata,rag_documents(id,source_type,source_id,lang,title)";

/// Content store reached through the Supabase REST API.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    config: StoreConfig,
}

impl SupabaseStore {
    /// Create a store client with the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// REST endpoint for a table.
    fn table_url(&self, table: &str) -> String {
        let base = self.config.url.trim_end_matches('/');
        format!("{}/rest/v1/{}", base, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.service_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.service_key),
            )
    }

    async fn read_body(table: &str, response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EvalError::Store(format!(
                "{} request failed ({}): {}",
                table, status, body
            )));
        }
        Ok(body)
    }
}

#[async_trait]
impl ChunkStore for SupabaseStore {
    async fn find_chunks(&self, pattern: &str, limit: usize) -> Result<Vec<Chunk>> {
        let table = &self.config.chunks_table;
        tracing::debug!(table = %table, pattern, limit, "querying chunks");

        let request = self.client.get(self.table_url(table)).query(&[
            ("select", CHUNK_SELECT.to_string()),
            ("content", format!("ilike.*{}*", pattern)),
            ("limit", limit.to_string()),
        ]);

        let response = self.authorize(request).send().await?;
        let body = Self::read_body(table, response).await?;

        serde_json::from_str(&body)
            .map_err(|e| EvalError::Store(format!("unexpected {} payload: {}", table, e)))
    }
}

#[async_trait]
impl NormalizationSink for SupabaseStore {
    async fn insert_normalized(&self, record: &NormalizedInquiry) -> Result<Option<Value>> {
        let table = &self.config.normalized_table;

        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(record);

        let response = self.authorize(request).send().await?;
        let body = Self::read_body(table, response).await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        let rows: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| EvalError::Store(format!("unexpected {} payload: {}", table, e)))?;
        Ok(rows.into_iter().next())
    }
}
