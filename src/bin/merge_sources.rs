//! Merge a project's source files into one text file for review.
//!
//! Usage:
//!   merge-sources [ROOT] [-o OUTPUT] [--ext ts --ext tsx ...]

use anyhow::{Context, Result};
use clap::Parser;
use concierge_eval::logging::init_logging;
use concierge_eval::merge::{merge_sources, MergeOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "merge-sources")]
#[command(about = "Flatten a source tree into a single text file", long_about = None)]
struct Cli {
    /// Project root to walk
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "project_context.txt")]
    output: PathBuf,

    /// Extensions whose contents are merged (repeatable; replaces the defaults)
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut options = MergeOptions::default();
    if !cli.extensions.is_empty() {
        options = options.with_extensions(&cli.extensions);
    }

    let stats = merge_sources(&cli.root, &cli.output, &options).with_context(|| {
        format!(
            "Failed to merge '{}' into '{}'",
            cli.root.display(),
            cli.output.display()
        )
    })?;

    println!(
        "Done! Listed {} files, merged {} ({} unreadable) into '{}'.",
        stats.listed,
        stats.merged,
        stats.unreadable,
        cli.output.display()
    );
    Ok(())
}
