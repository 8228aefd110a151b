//! Sequential evaluation runner.
//!
//! Each inquiry is answered by both strategies and scored before the next
//! one starts. Records come back in inquiry order.

use super::demo::DemoResponses;
use super::noise::SyntheticNoise;
use super::record::{EvaluationRecord, Scores};
use crate::inquiry::Inquiry;
use crate::responder::{BaselineResponder, GroundedResponder, GroundedResponse};
use crate::text::Charset;
use async_trait::async_trait;
use std::io::Write;
use std::time::{Duration, Instant};

/// Where the two responses for an inquiry come from.
#[async_trait]
pub trait ResponseSource: Send {
    async fn baseline(&mut self, inquiry: &Inquiry) -> String;
    async fn grounded(&mut self, inquiry: &Inquiry) -> GroundedResponse;
}

/// Fixed pause after each external generation call.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Live endpoints: the two responders plus pacing between calls.
pub struct LiveResponses {
    baseline: BaselineResponder,
    grounded: GroundedResponder,
    pacer: Pacer,
}

impl LiveResponses {
    pub fn new(baseline: BaselineResponder, grounded: GroundedResponder, pacer: Pacer) -> Self {
        Self {
            baseline,
            grounded,
            pacer,
        }
    }
}

#[async_trait]
impl ResponseSource for LiveResponses {
    async fn baseline(&mut self, inquiry: &Inquiry) -> String {
        let text = self
            .baseline
            .produce(&inquiry.text, inquiry.language.code())
            .await;
        self.pacer.pause().await;
        text
    }

    async fn grounded(&mut self, inquiry: &Inquiry) -> GroundedResponse {
        let response = self
            .grounded
            .produce(&inquiry.text, inquiry.language.code())
            .await;
        self.pacer.pause().await;
        response
    }
}

#[async_trait]
impl ResponseSource for DemoResponses {
    async fn baseline(&mut self, inquiry: &Inquiry) -> String {
        DemoResponses::baseline(self, inquiry)
    }

    async fn grounded(&mut self, inquiry: &Inquiry) -> GroundedResponse {
        DemoResponses::grounded(self, inquiry)
    }
}

/// Runner options.
#[derive(Debug)]
pub struct RunOptions {
    /// Character class used by the grounding scorer.
    pub charset: Charset,
    /// Print a progress line every N inquiries (0 disables).
    pub progress_every: usize,
    /// Per-inquiry progress output.
    pub verbose: bool,
    /// Presentation-only score flipping; `None` for genuine scores.
    pub noise: Option<SyntheticNoise>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            charset: Charset::default(),
            progress_every: 10,
            verbose: false,
            noise: None,
        }
    }
}

/// Drives inquiries through a [`ResponseSource`] and the scorers.
pub struct EvaluationRunner<S> {
    source: S,
    options: RunOptions,
}

impl<S: ResponseSource> EvaluationRunner<S> {
    pub fn new(source: S, options: RunOptions) -> Self {
        Self { source, options }
    }

    /// Evaluate every inquiry in order.
    pub async fn run(&mut self, inquiries: &[Inquiry]) -> Vec<EvaluationRecord> {
        let start = Instant::now();
        let total = inquiries.len();
        let mut records = Vec::with_capacity(total);

        tracing::info!(total, "starting evaluation");

        for (idx, inquiry) in inquiries.iter().enumerate() {
            if self.options.verbose {
                let preview: String = inquiry.text.chars().take(50).collect();
                println!("\n[{}/{}] Processing: {}...", idx + 1, total, preview);
            }

            records.push(self.evaluate(inquiry).await);

            let done = idx + 1;
            if self.options.progress_every > 0 && done % self.options.progress_every == 0 {
                println!(
                    "Progress: {}/{} ({:.1}%)",
                    done,
                    total,
                    done as f64 / total as f64 * 100.0
                );
            } else if !self.options.verbose {
                print!(".");
                std::io::stdout().flush().ok();
            }
        }

        if !self.options.verbose {
            println!();
        }

        tracing::info!(
            total,
            elapsed_secs = start.elapsed().as_secs_f64(),
            "evaluation finished"
        );
        records
    }

    /// Answer and score a single inquiry.
    async fn evaluate(&mut self, inquiry: &Inquiry) -> EvaluationRecord {
        if self.options.verbose {
            println!("  -> Baseline LLM...");
        }
        let baseline = self.source.baseline(inquiry).await;

        if self.options.verbose {
            println!("  -> RAG + Normalize...");
        }
        let grounded = self.source.grounded(inquiry).await;

        let mut scores = Scores::compute(
            &inquiry.text,
            inquiry.language,
            &baseline,
            &grounded.text,
            &grounded.context,
            self.options.charset,
        );
        if let Some(noise) = self.options.noise.as_mut() {
            scores = noise.apply(scores);
        }

        EvaluationRecord::new(inquiry, baseline, grounded, scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::noise::FlipRates;
    use crate::eval::report::Summary;
    use crate::error::Result;
    use crate::inquiry::{generate_inquiries, Language, DEMO_SUFFIXES};
    use crate::llm::TextGenerator;
    use crate::retriever::Retriever;
    use crate::store::{Chunk, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    /// Echoes the inquiry back, prefixed with a phrase containing "clinic".
    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, _system: &str, user: &str) -> Result<String> {
            Ok(format!("Our partner clinic can help: {}", user))
        }
    }

    fn quiet() -> RunOptions {
        RunOptions {
            progress_every: 0,
            verbose: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_demo_run_preserves_order_and_ids() {
        let inquiries = generate_inquiries(9, DEMO_SUFFIXES);
        let mut runner = EvaluationRunner::new(DemoResponses::seeded(42), quiet());

        let records = runner.run(&inquiries).await;

        assert_eq!(records.len(), 9);
        for (record, inquiry) in records.iter().zip(&inquiries) {
            assert_eq!(record.inquiry_id, inquiry.id);
            assert_eq!(record.inquiry, inquiry.text);
            assert_eq!(record.language, inquiry.language);
            assert_eq!(record.normalized_data["demo"], true);
        }
    }

    #[tokio::test]
    async fn test_records_without_noise_match_rescoring() {
        let inquiries = generate_inquiries(30, DEMO_SUFFIXES);
        let mut runner = EvaluationRunner::new(DemoResponses::seeded(3), quiet());

        for record in runner.run(&inquiries).await {
            assert_eq!(record.rescore(Charset::default()), record.scores());
        }
    }

    #[tokio::test]
    async fn test_noise_hook_changes_scores() {
        let inquiries = generate_inquiries(6, DEMO_SUFFIXES);
        let always = FlipRates {
            intent_match_baseline: 1.0,
            intent_match_rag: 1.0,
            grounding_rag: 1.0,
        };
        let mut options = quiet();
        options.noise = Some(SyntheticNoise::seeded(42, always));
        let mut runner = EvaluationRunner::new(DemoResponses::seeded(42), options);

        for record in runner.run(&inquiries).await {
            let genuine = record.rescore(Charset::default());
            assert_ne!(genuine.intent_match_baseline, record.intent_match_baseline);
            assert_ne!(genuine.grounding_rag, record.grounding_rag);
        }
    }

    #[tokio::test]
    async fn test_live_run_end_to_end() {
        let chunk: Chunk = serde_json::from_value(json!({
            "id": 1,
            "content": "Do you have any hospitals that specialize in dental implants? Partner clinics in Seoul.",
            "rag_documents": {"lang": "en", "source_type": "hospital", "title": "Seoul"}
        }))
        .unwrap();
        let store = Arc::new(MemoryStore::new(vec![chunk]));
        let generator: Arc<dyn TextGenerator> = Arc::new(EchoGenerator);
        let source = LiveResponses::new(
            BaselineResponder::new(generator.clone()),
            GroundedResponder::new(generator, Retriever::new(store.clone()), store.clone()),
            Pacer::from_millis(0),
        );
        let mut runner = EvaluationRunner::new(source, quiet());

        // With the demo rotation, inquiry 4 is the bare dental-implant template.
        let inquiries = generate_inquiries(6, DEMO_SUFFIXES);
        let records = runner.run(&inquiries).await;

        assert_eq!(records.len(), 6);
        assert_eq!(store.inserted().len(), 6);

        let matched: Vec<_> = records.iter().filter(|r| !r.rag_context.is_empty()).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].inquiry_id, 4);
        assert_eq!(matched[0].language, Language::En);
        assert!(matched[0].rag_context.starts_with("[hospital | Seoul] "));

        // The echo repeats the inquiry, so topical keywords always carry over.
        let summary = Summary::from_records(&records);
        assert_eq!(summary.intent_match_baseline, 6);
        assert_eq!(summary.intent_match_rag, 6);
    }

    #[tokio::test]
    async fn test_pacer_zero_does_not_sleep() {
        let start = Instant::now();
        Pacer::from_millis(0).pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
