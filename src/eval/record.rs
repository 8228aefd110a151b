//! Per-inquiry evaluation records.

use crate::inquiry::{Inquiry, Language};
use crate::responder::GroundedResponse;
use crate::scoring::{grounding, intent_match};
use crate::text::Charset;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three boolean outcomes for one inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub intent_match_baseline: bool,
    pub intent_match_rag: bool,
    pub grounding_rag: bool,
}

impl Scores {
    /// Score both responses for an inquiry.
    pub fn compute(
        inquiry: &str,
        language: Language,
        baseline_response: &str,
        rag_response: &str,
        rag_context: &str,
        charset: Charset,
    ) -> Self {
        Self {
            intent_match_baseline: intent_match(inquiry, baseline_response, language.code()),
            intent_match_rag: intent_match(inquiry, rag_response, language.code()),
            grounding_rag: grounding(rag_response, rag_context, charset),
        }
    }
}

/// One row of evaluation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub inquiry_id: u32,
    pub inquiry: String,
    pub language: Language,
    pub baseline_response: String,
    pub rag_response: String,
    pub rag_context: String,
    pub intent_match_baseline: bool,
    pub intent_match_rag: bool,
    pub grounding_rag: bool,
    /// Opaque payload echoed by the normalization sink.
    pub normalized_data: Value,
}

impl EvaluationRecord {
    /// Assemble a record from both responses and their scores.
    pub fn new(
        inquiry: &Inquiry,
        baseline_response: String,
        grounded: GroundedResponse,
        scores: Scores,
    ) -> Self {
        Self {
            inquiry_id: inquiry.id,
            inquiry: inquiry.text.clone(),
            language: inquiry.language,
            baseline_response,
            rag_response: grounded.text,
            rag_context: grounded.context,
            intent_match_baseline: scores.intent_match_baseline,
            intent_match_rag: scores.intent_match_rag,
            grounding_rag: scores.grounding_rag,
            normalized_data: grounded.normalized,
        }
    }

    /// Stored outcomes.
    pub fn scores(&self) -> Scores {
        Scores {
            intent_match_baseline: self.intent_match_baseline,
            intent_match_rag: self.intent_match_rag,
            grounding_rag: self.grounding_rag,
        }
    }

    /// Outcomes recomputed from the stored strings.
    pub fn rescore(&self, charset: Charset) -> Scores {
        Scores::compute(
            &self.inquiry,
            self.language,
            &self.baseline_response,
            &self.rag_response,
            &self.rag_context,
            charset,
        )
    }
}
