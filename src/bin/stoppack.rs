//! Command-line front end for package transformations.
//!
//! # Usage
//!
//! Inspect a source package:
//! ```sh
//! stoppack analyze programma.zip
//! ```
//!
//! Build a publication package next to the source (`programma-publicatie.zip`):
//! ```sh
//! stoppack publish programma.zip
//! ```
//!
//! Replay a withdrawal for a fixed date, without compression or report:
//! ```sh
//! stoppack withdraw programma.zip -o out/intrekking.zip --date 2025-06-02 --stored --no-report
//! ```
//!
//! Log output is controlled with `RUST_LOG` (for example `RUST_LOG=stoppack=debug`).

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use chrono::NaiveDate;
use std::path::PathBuf;
use stoppack::common::{Clock, FixedClock, SystemClock};
use stoppack::config::{Compression, TransformOptions};
use stoppack::scenario::Scenario;
use stoppack::{report, transform};
use tracing_subscriber::EnvFilter;

/// Transform regulation packages into delivery packages
#[derive(Parser, Debug)]
#[command(name = "stoppack", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print what the analyzer finds in a source package
    Analyze {
        /// Source package
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Build a publication package
    Publish(TransformArgs),
    /// Build a validation package
    Validate(TransformArgs),
    /// Build a withdrawal package
    Withdraw(TransformArgs),
    /// Build a hand-over package
    HandOver(TransformArgs),
}

#[derive(Args, Debug)]
struct TransformArgs {
    /// Source package
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output package; defaults to `{stem}-{scenario}.zip` next to the input
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Use this date (YYYY-MM-DD) instead of today
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Store entries without compression
    #[arg(long)]
    stored: bool,

    /// Do not write the report next to the output
    #[arg(long)]
    no_report: bool,
}

impl TransformArgs {
    fn options(&self) -> TransformOptions {
        let compression = if self.stored {
            Compression::Stored
        } else {
            Compression::Deflated
        };
        TransformOptions::new()
            .with_compression(compression)
            .with_report(!self.no_report)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze { input } => analyze(input),
        Command::Publish(args) => execute(Scenario::Publication, args),
        Command::Validate(args) => execute(Scenario::Validation, args),
        Command::Withdraw(args) => execute(Scenario::Withdrawal, args),
        Command::HandOver(args) => execute(Scenario::HandOver, args),
    }
}

fn analyze(input: PathBuf) -> anyhow::Result<()> {
    let analysis = transform::inspect(&input)
        .with_context(|| format!("cannot analyze {}", input.display()))?;
    let mut out = String::new();
    report::render_analysis(&mut out, &analysis);
    print!("{out}");
    Ok(())
}

fn execute(scenario: Scenario, args: TransformArgs) -> anyhow::Result<()> {
    let fixed;
    let clock: &dyn Clock = match args.date {
        Some(date) => {
            fixed = FixedClock::at_date(date);
            &fixed
        },
        None => &SystemClock,
    };

    let outcome = transform::run(
        &args.input,
        args.output.as_deref(),
        scenario,
        &args.options(),
        &clock,
    )
    .with_context(|| format!("{scenario} of {} failed", args.input.display()))?;

    if let Some(output) = &outcome.output_path {
        println!("{}", output.display());
    }
    if let Some(report) = &outcome.report_path {
        println!("{}", report.display());
    }
    Ok(())
}
