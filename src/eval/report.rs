//! CSV output and summary statistics.
//!
//! Records keep real booleans; the `"true"`/`"false"` literals and the
//! JSON-encoded `normalized_data` column exist only in this file's
//! encode/decode pair.

use super::record::EvaluationRecord;
use crate::error::{EvalError, Result};
use crate::inquiry::Language;
use crate::responder::is_error_marker;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Output columns, in order.
pub const CSV_COLUMNS: [&str; 10] = [
    "inquiry_id",
    "inquiry",
    "language",
    "baseline_response",
    "rag_response",
    "rag_context",
    "intent_match_baseline",
    "intent_match_rag",
    "grounding_rag",
    "normalized_data",
];

/// Wire form of a record.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    inquiry_id: u32,
    inquiry: String,
    language: String,
    baseline_response: String,
    rag_response: String,
    rag_context: String,
    intent_match_baseline: String,
    intent_match_rag: String,
    grounding_rag: String,
    normalized_data: String,
}

pub fn encode_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// `"true"` in any case is true; everything else is false.
pub fn decode_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl From<&EvaluationRecord> for CsvRow {
    fn from(r: &EvaluationRecord) -> Self {
        let normalized = match &r.normalized_data {
            Value::Null => "{}".to_string(),
            other => other.to_string(),
        };
        Self {
            inquiry_id: r.inquiry_id,
            inquiry: r.inquiry.clone(),
            language: r.language.code().to_string(),
            baseline_response: r.baseline_response.clone(),
            rag_response: r.rag_response.clone(),
            rag_context: r.rag_context.clone(),
            intent_match_baseline: encode_bool(r.intent_match_baseline).to_string(),
            intent_match_rag: encode_bool(r.intent_match_rag).to_string(),
            grounding_rag: encode_bool(r.grounding_rag).to_string(),
            normalized_data: normalized,
        }
    }
}

impl TryFrom<CsvRow> for EvaluationRecord {
    type Error = EvalError;

    fn try_from(row: CsvRow) -> Result<Self> {
        let language: Language = row.language.parse().map_err(EvalError::Csv)?;
        let normalized_data = serde_json::from_str(&row.normalized_data)
            .unwrap_or_else(|_| Value::Object(Map::new()));
        Ok(Self {
            inquiry_id: row.inquiry_id,
            inquiry: row.inquiry,
            language,
            baseline_response: row.baseline_response,
            rag_response: row.rag_response,
            rag_context: row.rag_context,
            intent_match_baseline: decode_bool(&row.intent_match_baseline),
            intent_match_rag: decode_bool(&row.intent_match_rag),
            grounding_rag: decode_bool(&row.grounding_rag),
            normalized_data,
        })
    }
}

/// Write records to `path`, header first. An empty slice still produces
/// the header row.
pub fn write_csv(records: &[EvaluationRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| EvalError::io(parent, e))?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush().map_err(|e| EvalError::io(path, e))?;

    Ok(())
}

/// Read records previously written by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<Vec<EvaluationRecord>> {
    if !path.exists() {
        return Err(EvalError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "results file not found"),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    reader
        .deserialize::<CsvRow>()
        .map(|row| EvaluationRecord::try_from(row?))
        .collect()
}

/// Default output file name, e.g. `evaluation_2026-01-25T05-36-29.csv`.
pub fn timestamped_path(prefix: &str, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}.csv",
        prefix,
        now.format("%Y-%m-%dT%H-%M-%S")
    ))
}

/// Aggregate outcome counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total: usize,
    pub intent_match_baseline: usize,
    pub intent_match_rag: usize,
    pub grounding_rag: usize,
}

impl Summary {
    /// Count outcomes across records.
    pub fn from_records(records: &[EvaluationRecord]) -> Self {
        records.iter().fold(
            Summary {
                total: records.len(),
                ..Default::default()
            },
            |mut s, r| {
                s.intent_match_baseline += usize::from(r.intent_match_baseline);
                s.intent_match_rag += usize::from(r.intent_match_rag);
                s.grounding_rag += usize::from(r.grounding_rag);
                s
            },
        )
    }

    /// `count` as a percentage of the total; 0 for an empty run.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total > 0 {
            count as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }

    fn line(&self, label: &str, count: usize) -> String {
        format!(
            "  {}: {}/{} ({:.1}%)",
            label,
            count,
            self.total,
            self.percent(count)
        )
    }

    /// Human-readable statistics block.
    pub fn render(&self, title: &str) -> String {
        let rule = "=".repeat(60);
        [
            rule.clone(),
            title.to_string(),
            rule.clone(),
            format!("Total Inquiries: {}", self.total),
            String::new(),
            "Intent Match:".to_string(),
            self.line("Baseline LLM", self.intent_match_baseline),
            self.line("RAG + Normalize", self.intent_match_rag),
            String::new(),
            "Grounding (RAG):".to_string(),
            self.line("RAG Response Grounded", self.grounding_rag),
            rule,
        ]
        .join("\n")
    }

    /// Print statistics to stdout.
    pub fn print(&self, title: &str) {
        println!("\n{}", self.render(title));
    }
}

/// Short preview of the first `n` records.
pub fn render_sample(records: &[EvaluationRecord], n: usize) -> String {
    records
        .iter()
        .take(n)
        .map(|r| {
            let preview: String = r
                .inquiry
                .chars()
                .take(50)
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect();
            format!(
                "#{:<4} {} {:<52} intent(baseline)={} intent(rag)={} grounding={}",
                r.inquiry_id,
                r.language,
                preview,
                encode_bool(r.intent_match_baseline),
                encode_bool(r.intent_match_rag),
                encode_bool(r.grounding_rag)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Records where either response is a substituted generation error.
pub fn count_failures(records: &[EvaluationRecord]) -> usize {
    records
        .iter()
        .filter(|r| is_error_marker(&r.baseline_response) || is_error_marker(&r.rag_response))
        .count()
}
