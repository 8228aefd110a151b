//! Concierge Eval - baseline vs. retrieval-augmented response evaluation.
//!
//! Generates synthetic English, Japanese and Korean inquiries for a
//! medical-tourism concierge, answers each one twice, and scores both
//! answers with two cheap heuristics.
//!
//! # Overview
//!
//! 1. The **baseline** sends the raw inquiry to an LLM with a fixed system prompt
//! 2. The **grounded** responder logs a normalized copy of the inquiry, retrieves
//!    chunks from the content store, and adds them to the prompt as context
//! 3. **Intent match** checks that topical keywords in the inquiry reappear in
//!    the answer; **grounding** checks that the answer reuses the context's
//!    vocabulary
//! 4. Records go to a CSV and are summarized as percentages
//!
//! # Quick Start
//!
//! ```no_run
//! use concierge_eval::{
//!     config::Config,
//!     eval::{EvaluationRunner, LiveResponses, Pacer, RunOptions, Summary},
//!     inquiry::{generate_inquiries, LIVE_SUFFIXES},
//!     llm::generator_for,
//!     responder::{BaselineResponder, GroundedResponder},
//!     retriever::Retriever,
//!     store::SupabaseStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     config.validate()?;
//!
//!     let generator = generator_for(&config.llm);
//!     let store = Arc::new(SupabaseStore::new(config.store.clone()));
//!     let source = LiveResponses::new(
//!         BaselineResponder::new(generator.clone()),
//!         GroundedResponder::new(generator, Retriever::new(store.clone()), store),
//!         Pacer::from_millis(config.run.request_delay_ms),
//!     );
//!
//!     let inquiries = generate_inquiries(30, LIVE_SUFFIXES);
//!     let records = EvaluationRunner::new(source, RunOptions::default())
//!         .run(&inquiries)
//!         .await;
//!
//!     Summary::from_records(&records).print("Evaluation Statistics");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod eval;
pub mod inquiry;
pub mod llm;
pub mod logging;
pub mod merge;
pub mod responder;
pub mod retriever;
pub mod scoring;
pub mod store;
pub mod text;

// Re-export commonly used types
pub use config::Config;
pub use error::{EvalError, Result};
pub use eval::{EvaluationRecord, Summary};
pub use inquiry::{generate_inquiries, Inquiry, Language};
pub use llm::TextGenerator;
pub use responder::{BaselineResponder, GroundedResponder};
pub use retriever::Retriever;
