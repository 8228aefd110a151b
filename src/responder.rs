//! Baseline and grounded response producers.
//!
//! Both producers always hand back a string: a failed generation call is
//! logged and replaced by an `[ERROR: ...]` marker so the scorers still
//! have something to look at.

use crate::context::build_context;
use crate::error::EvalError;
use crate::inquiry::Language;
use crate::llm::{Prompts, TextGenerator};
use crate::retriever::Retriever;
use crate::store::{NormalizationSink, NormalizedInquiry};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Text embedded in a response field when generation failed.
pub fn error_marker(err: &EvalError) -> String {
    format!("[ERROR: {}]", err)
}

/// Whether a response is a substituted error marker.
pub fn is_error_marker(response: &str) -> bool {
    response.starts_with("[ERROR: ") && response.ends_with(']')
}

/// Plain LLM strategy: the inquiry and a fixed system prompt.
#[derive(Clone)]
pub struct BaselineResponder {
    generator: Arc<dyn TextGenerator>,
}

impl BaselineResponder {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Response text for `inquiry`. The language hint is unused; the baseline
    /// sees only the raw text.
    pub async fn produce(&self, inquiry: &str, _language: &str) -> String {
        match self.generator.generate(Prompts::concierge(), inquiry).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "baseline generation failed");
                error_marker(&e)
            }
        }
    }
}

/// Output of the grounded strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedResponse {
    pub text: String,
    /// Context shown to the model; empty when retrieval found nothing.
    pub context: String,
    /// Row echoed by the normalization sink, or an empty object.
    pub normalized: Value,
}

/// Retrieval-augmented strategy with inquiry normalization.
#[derive(Clone)]
pub struct GroundedResponder {
    generator: Arc<dyn TextGenerator>,
    retriever: Retriever,
    sink: Arc<dyn NormalizationSink>,
}

impl GroundedResponder {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        retriever: Retriever,
        sink: Arc<dyn NormalizationSink>,
    ) -> Self {
        Self {
            generator,
            retriever,
            sink,
        }
    }

    /// Normalize, retrieve, then generate with the retrieved context.
    pub async fn produce(&self, inquiry: &str, language: &str) -> GroundedResponse {
        let normalized = self.normalize(inquiry, language).await;

        let chunks = self.retriever.search(inquiry, Some(language)).await;
        let context = build_context(chunks.iter().map(|c| &c.chunk));

        let system = Prompts::grounded_concierge(&context);
        let text = match self.generator.generate(&system, inquiry).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "grounded generation failed");
                error_marker(&e)
            }
        };

        GroundedResponse {
            text,
            context,
            normalized,
        }
    }

    async fn normalize(&self, inquiry: &str, language: &str) -> Value {
        let record = NormalizedInquiry::from_agent(inquiry, Language::detect(language));
        match self.sink.insert_normalized(&record).await {
            Ok(Some(row)) => row,
            Ok(None) => empty_payload(),
            Err(e) => {
                tracing::warn!(error = %e, "normalization insert failed");
                empty_payload()
            }
        }
    }
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}
