//! SqlInsight CLI — analyze a captured trace file.
//!
//! Reads a JSON-serialized trace, applies the call-stack filter to each
//! execution, runs the SELECT analysis and the slow-query scan, and prints
//! the resulting diagnostic events as JSON lines. Exit code 0 means a
//! clean trace, 3 means at least one diagnostic fired.

use anyhow::{Context, Result};
use clap::Parser;
use sqlinsight::config::AnalysisConfig;
use sqlinsight::report::{NPlusOneEvent, RequestContext, SlowQueryEvent};
use sqlinsight::select_analysis::analyze;
use sqlinsight::slow_queries::find_slow_executions;
use sqlinsight::stack_filter::StackFilter;
use sqlinsight::Trace;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sqlinsight", about = "Per-request SQL trace analysis")]
struct Args {
    /// JSON trace file (one serialized Trace).
    #[arg(long)]
    trace: PathBuf,

    /// Optional analysis config file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request URL to attach to emitted events.
    #[arg(long, default_value = "")]
    url: String,

    /// Request method to attach to emitted events.
    #[arg(long, default_value = "GET")]
    method: String,

    /// Operation name to attach to emitted events.
    #[arg(long)]
    operation: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(found_diagnostics) => {
            if found_diagnostics {
                std::process::exit(3);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let content = std::fs::read_to_string(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let mut trace: Trace =
        serde_json::from_str(&content).context("parsing trace JSON")?;

    // Traces from raw capture layers still carry unfiltered stacks; the
    // filter is idempotent on already-reduced ones.
    let filter = StackFilter::new(&config);
    for event in &mut trace.events {
        event.call_stack = filter.filter(&event.call_stack);
    }

    let context = RequestContext {
        url: args.url,
        method: args.method,
        operation_name: args.operation,
    };

    let analysis = analyze(&trace);
    info!(
        select_count = analysis.select_count,
        duplicate_exact_count = analysis.duplicate_exact_count,
        "trace analyzed"
    );

    let mut found = false;
    if let Some(event) = NPlusOneEvent::from_analysis(&analysis, &context) {
        println!("{}", serde_json::to_string(&event)?);
        found = true;
    }

    let slow = find_slow_executions(&trace, config.slow_query_threshold);
    if let Some(event) = SlowQueryEvent::from_report(&slow, &context) {
        println!("{}", serde_json::to_string(&event)?);
        found = true;
    }

    Ok(found)
}
