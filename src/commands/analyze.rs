//! Analyze command implementation.
//!
//! Runs the lifecycle trace analysis over a saved log file, for re-analyzing
//! old runs or output captured outside this tool.

use crate::aggregator::{analyze_traces, build_traces, print_summary};
use crate::output::write_report;
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// Arguments for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Log file holding lifecycle events (and any amount of other text)
    pub file: PathBuf,

    /// Where to write the report JSON (optional)
    pub report: Option<PathBuf>,
}

/// Execute the analyze command
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    let lines = BufReader::new(file).lines().map_while(Result::ok);
    let traces = build_traces(lines);

    info!(
        "Collected traces for {} transactions from {}",
        traces.len(),
        args.file.display()
    );

    let report = analyze_traces(&traces);
    print_summary(&report);

    if let Some(report_path) = &args.report {
        write_report(&report, report_path).context("failed to write report")?;
        info!("Report written to: {}", report_path.display());
    }

    Ok(())
}
