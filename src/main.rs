//! Concierge evaluation CLI
//!
//! Compares a plain LLM concierge against the retrieval-augmented one on
//! synthetic multilingual inquiries.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use concierge_eval::{
    config::{Config, Provider},
    eval::{
        count_failures, read_csv, render_sample, timestamped_path, write_csv, DemoResponses,
        EvaluationRecord, EvaluationRunner, FlipRates, LiveResponses, Pacer, RunOptions, Summary,
        SyntheticNoise,
    },
    inquiry::{generate_inquiries, DEMO_SUFFIXES, LIVE_SUFFIXES},
    llm::{generator_for, Prompts},
    logging::init_logging,
    responder::{BaselineResponder, GroundedResponder},
    retriever::{Retriever, RetrieverOptions},
    store::SupabaseStore,
    text::Charset,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Baseline vs. retrieval-augmented concierge evaluation
#[derive(Parser)]
#[command(name = "concierge-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug-level diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the evaluation against the live LLM and content store
    Run(RunArgs),

    /// Run the evaluation offline with canned responses
    Demo(DemoArgs),

    /// Recompute statistics from a results CSV
    Stats {
        /// Path to a CSV written by `run` or `demo`
        csv: PathBuf,

        /// Number of sample rows to show
        #[arg(long, default_value_t = 3)]
        sample: usize,
    },

    /// Test LLM connection
    Test {
        /// Path to a YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of inquiries (default from config, 200)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Output CSV path (default: evaluation_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pause after each generation call, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Tokenize with Latin and Hangul only
    #[arg(long)]
    legacy_charset: bool,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct DemoArgs {
    /// Number of inquiries
    #[arg(short = 'n', long, default_value_t = 200)]
    count: usize,

    /// Seed for canned response selection
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Randomly flip a small share of scores (presentation only)
    #[arg(long)]
    synthetic_noise: bool,

    /// Tokenize with Latin and Hangul only
    #[arg(long)]
    legacy_charset: bool,

    /// Output CSV path (default: evaluation_demo_<timestamp>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Run(args) => cmd_run(args, cli.verbose).await,
        Commands::Demo(args) => cmd_demo(args, cli.verbose).await,
        Commands::Stats { csv, sample } => cmd_stats(&csv, sample),
        Commands::Test { config } => cmd_test(config.as_deref()).await,
    }
}

fn charset_for(legacy: bool, configured: Charset) -> Charset {
    if legacy { Charset::Legacy } else { configured }
}

async fn cmd_run(args: RunArgs, verbose: bool) -> Result<()> {
    println!("Loading configuration...");
    let mut config =
        Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(count) = args.count {
        config.run.inquiry_count = count;
    }
    if let Some(delay) = args.delay_ms {
        config.run.request_delay_ms = delay;
    }
    config.run.charset = charset_for(args.legacy_charset, config.run.charset);
    config.validate().context("Invalid configuration")?;

    println!(
        "Using {} model: {}",
        config.llm.provider,
        config.llm.model()
    );

    let inquiries = generate_inquiries(config.run.inquiry_count, LIVE_SUFFIXES);
    println!("Generated {} inquiries", inquiries.len());

    let generator = generator_for(&config.llm);
    let store = Arc::new(SupabaseStore::new(config.store.clone()));
    let retriever = Retriever::with_options(
        store.clone(),
        RetrieverOptions {
            candidate_limit: config.run.candidate_limit,
            top_k: config.run.top_k,
            charset: config.run.charset,
        },
    );
    let source = LiveResponses::new(
        BaselineResponder::new(generator.clone()),
        GroundedResponder::new(generator, retriever, store),
        Pacer::from_millis(config.run.request_delay_ms),
    );

    let mut runner = EvaluationRunner::new(
        source,
        RunOptions {
            charset: config.run.charset,
            verbose,
            ..Default::default()
        },
    );

    println!("\nRunning evaluation...");
    let start = Instant::now();
    let records = runner.run(&inquiries).await;
    println!("Finished in {:.2?}", start.elapsed());

    let output = args
        .output
        .unwrap_or_else(|| timestamped_path("evaluation", Local::now()));
    finish(&records, &output, "Evaluation Statistics")
}

async fn cmd_demo(args: DemoArgs, verbose: bool) -> Result<()> {
    println!("Running demo evaluation (canned responses, no network)...");
    if args.synthetic_noise {
        println!("SYNTHETIC NOISE ENABLED: some scores are randomly flipped.");
    }

    let inquiries = generate_inquiries(args.count, DEMO_SUFFIXES);
    let charset = charset_for(args.legacy_charset, Charset::default());
    let noise = args
        .synthetic_noise
        .then(|| SyntheticNoise::seeded(args.seed, FlipRates::default()));

    let mut runner = EvaluationRunner::new(
        DemoResponses::seeded(args.seed),
        RunOptions {
            charset,
            verbose,
            noise,
            ..Default::default()
        },
    );
    let records = runner.run(&inquiries).await;

    let output = args
        .output
        .unwrap_or_else(|| timestamped_path("evaluation_demo", Local::now()));
    finish(&records, &output, "Evaluation Statistics (Demo)")
}

/// Write the CSV, then print statistics and a short sample.
fn finish(records: &[EvaluationRecord], output: &Path, title: &str) -> Result<()> {
    write_csv(records, output).context("Failed to write results")?;
    println!("\nResults saved to: {}", output.display());

    Summary::from_records(records).print(title);
    let failures = count_failures(records);
    if failures > 0 {
        println!(
            "\nWarning: {} of {} records contain a generation error marker",
            failures,
            records.len()
        );
    }
    if !records.is_empty() {
        println!("\nSample results:");
        println!("{}", render_sample(records, 3));
    }
    Ok(())
}

fn cmd_stats(csv: &Path, sample: usize) -> Result<()> {
    let records = read_csv(csv)
        .with_context(|| format!("Failed to read results from '{}'", csv.display()))?;

    println!("Loaded {} records from {}", records.len(), csv.display());
    Summary::from_records(&records).print("Evaluation Statistics");

    if sample > 0 && !records.is_empty() {
        println!("\nFirst {} rows:", sample.min(records.len()));
        println!("{}", render_sample(&records, sample));
    }
    Ok(())
}

async fn cmd_test(config_path: Option<&Path>) -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load(config_path).context("Failed to load configuration")?;
    let (api_base, api_key) = match config.llm.provider {
        Provider::OpenAi => (&config.llm.openai.api_base, &config.llm.openai.api_key),
        Provider::Google => (&config.llm.google.api_base, &config.llm.google.api_key),
    };
    let masked: String = api_key.chars().take(8).collect();

    println!("Configuration:");
    println!("  Provider:  {}", config.llm.provider);
    println!("  API Base:  {}", api_base);
    println!("  Model:     {}", config.llm.model());
    println!("  API Key:   {}...", masked);
    println!();

    if let Err(e) = config.validate_llm() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let generator = generator_for(&config.llm);

    println!("Sending test request...");
    match generator.generate(Prompts::concierge(), Prompts::ping()).await {
        Ok(reply) => {
            println!("Connection successful!");
            println!("  Reply: {}", reply.trim());
        }
        Err(e) => {
            println!("Connection failed: {}", e);
        }
    }

    Ok(())
}
