//! Evaluation harness comparing a plain LLM against the retrieval-augmented
//! responder.
//!
//! - `record`: per-inquiry outcomes
//! - `runner`: sequential driver over live or demo responses
//! - `report`: CSV persistence and summary statistics
//! - `demo`: canned responses for credential-free runs
//! - `noise`: presentation-only score flipping for demo output

pub mod demo;
pub mod noise;
pub mod record;
pub mod report;
pub mod runner;

pub use demo::DemoResponses;
pub use noise::{FlipRates, SyntheticNoise};
pub use record::{EvaluationRecord, Scores};
pub use report::{
    count_failures, read_csv, render_sample, timestamped_path, write_csv, Summary,
};
pub use runner::{EvaluationRunner, LiveResponses, Pacer, ResponseSource, RunOptions};
