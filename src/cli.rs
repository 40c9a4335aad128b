//! Command-line interface for stepmark.
//!
//! Bootstrapping layer only: argument parsing, output formatting, and
//! wiring the demo workloads to the simulated host. The runner core knows
//! nothing about any of this.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::client::{NullClient, ReportClient, TracingClient};
use crate::runner::{BenchmarkRunner, RunnerConfig};
use crate::sandbox::Viewport;
use crate::score::DEFAULT_CORRECTION_FACTOR;
use crate::workloads;

/// Benchmark orchestration engine for sandboxed interaction workloads.
#[derive(Parser)]
#[command(name = "stepmark")]
#[command(about = "Run scripted interaction benchmarks against sandboxed applications")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run the demo workloads and print the summary.
    Run(RunArgs),

    /// List the demo suites and their test steps.
    List,
}

/// Arguments for `stepmark run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Only run suites whose name is listed (repeatable). Runs all suites
    /// when omitted.
    #[arg(long = "suite")]
    pub suites: Vec<String>,

    /// Correction factor dividing the score.
    #[arg(long, default_value_t = DEFAULT_CORRECTION_FACTOR)]
    pub correction_factor: f64,

    /// Host viewport as WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
    pub viewport: Viewport,

    /// Emit the full run report as JSON instead of a text summary.
    #[arg(long)]
    pub json: bool,
}

fn parse_viewport(raw: &str) -> Result<Viewport, String> {
    let (width, height) = raw
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let width = width.parse().map_err(|_| format!("invalid width '{width}'"))?;
    let height = height.parse().map_err(|_| format!("invalid height '{height}'"))?;
    Ok(Viewport::new(width, height))
}

/// Parses command-line arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Executes the parsed CLI command.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run_benchmarks(args).await,
        Commands::List => {
            for suite in workloads::demo_suites() {
                println!("{} ({})", suite.name, suite.url);
                for test in &suite.tests {
                    println!("  {}", test.name);
                }
            }
            Ok(())
        }
    }
}

async fn run_benchmarks(args: RunArgs) -> anyhow::Result<()> {
    let mut suites = workloads::demo_suites();
    if !args.suites.is_empty() {
        suites.retain(|s| args.suites.iter().any(|name| name == &s.name));
        anyhow::ensure!(!suites.is_empty(), "no suite matches the requested names");
    }

    let host = workloads::demo_host(args.viewport);
    let client: Arc<dyn ReportClient> = if args.json {
        Arc::new(NullClient)
    } else {
        Arc::new(TracingClient)
    };

    info!(suites = suites.len(), "benchmark run requested");
    let config = RunnerConfig::new().with_correction_factor(args.correction_factor);
    let mut runner = BenchmarkRunner::new(suites, Box::new(host), client).with_config(config);
    let report = runner.run_all().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for suite in &report.suites {
            println!("{:<24} {:>10.2} ms", suite.suite_name, suite.total_ms);
            for m in &suite.measurements {
                println!(
                    "  {:<22} sync {:>8.2} ms  async {:>8.2} ms",
                    m.test_name, m.sync_ms, m.async_ms
                );
            }
        }
        let s = &report.summary;
        println!();
        println!("total   {:>12.2} ms", s.total);
        println!("mean    {:>12.2} ms", s.mean);
        println!("geomean {:>12.2}", s.geomean);
        println!("score   {:>12.2}", s.score);
    }

    Ok(())
}
