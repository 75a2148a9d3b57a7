//! Send-batch command implementation.
//!
//! The send-batch command:
//! 1. Collects pre-built transaction byte files
//! 2. Submits them via the toolkit at a target rate against all relays
//! 3. Folds the toolkit's stderr into per-transaction lifecycle traces
//! 4. Prints the latency analysis and optionally writes the report JSON

use crate::aggregator::{analyze_traces, build_traces, print_summary};
use crate::output::write_report;
use crate::toolkit::ToolkitClient;
use crate::utils::config::BenchConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the send-batch command
#[derive(Debug, Clone)]
pub struct SendBatchArgs {
    /// Directory holding tx_*.mn files from a ring run
    pub tx_dir: PathBuf,

    /// Target submission rate (tx/s)
    pub rate: u32,

    /// Where to write the report JSON (optional)
    pub report: Option<PathBuf>,
}

/// Collect transaction byte files from a directory, in name order
pub fn collect_tx_files(dir: &PathBuf) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("tx_") && name.ends_with(".mn"))
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Execute the send-batch command
pub fn execute_send_batch(config: &BenchConfig, args: &SendBatchArgs) -> Result<()> {
    let start_time = Instant::now();

    let files = collect_tx_files(&args.tx_dir)?;
    anyhow::ensure!(
        !files.is_empty(),
        "no transaction files matching tx_*.mn in {}",
        args.tx_dir.display()
    );

    info!("Found {} transaction files to submit", files.len());

    let toolkit = ToolkitClient::new(&config.toolkit_cmd);
    let dest_urls = config.relay_urls();

    // The toolkit writes its own scratch state; keep it out of the repo
    let scratch = tempfile::tempdir().context("failed to create scratch directory")?;

    info!(
        "Submitting at {} tx/s against {} relays...",
        args.rate,
        dest_urls.len()
    );

    let exec_start = Instant::now();
    let stderr = toolkit
        .send_batch(&files, &dest_urls, args.rate, Some(scratch.path()))
        .context("batch submission failed")?;
    info!(
        "Submission finished in {:.2}s",
        exec_start.elapsed().as_secs_f64()
    );

    let traces = build_traces(stderr.lines());
    debug!("collected traces for {} transactions", traces.len());

    let report = analyze_traces(&traces);
    print_summary(&report);

    if let Some(report_path) = &args.report {
        write_report(&report, report_path).context("failed to write report")?;
        info!("Report written to: {}", report_path.display());
    }

    info!(
        "Batch submission completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_tx_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["tx_2.mn", "tx_1.mn", "notes.txt", "tx_3.json"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let files = collect_tx_files(&dir.path().to_path_buf()).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["tx_1.mn", "tx_2.mn"]);
    }

    #[test]
    fn test_collect_tx_files_missing_dir_is_error() {
        let dir = PathBuf::from("/definitely/not/here");
        assert!(collect_tx_files(&dir).is_err());
    }
}
