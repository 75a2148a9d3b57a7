//! Download-logs command implementation.
//!
//! The download-logs command:
//! 1. Resolves the service URL, auth headers and node list
//! 2. Creates a timestamped output directory and records the run parameters
//! 3. Fetches every node's logs for the time range, one file per node
//!
//! Nodes fan out on the worker pool; each node's fetch is a sequential
//! paginated stream with its own output file, so workers share nothing. A
//! failed node is reported without aborting the others.

use crate::loki::{fetch_lines, LokiClient};
use crate::utils::config::{load_secrets, BenchConfig, Secrets, DEFAULT_LOKI_URL};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{info, warn};
use rayon::prelude::*;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments for the download-logs command
#[derive(Debug, Clone)]
pub struct DownloadLogsArgs {
    /// Start of the time range (ISO 8601)
    pub from_time: String,

    /// End of the time range (ISO 8601)
    pub to_time: String,

    /// Specific nodes to fetch; empty means nodes-file or the default list
    pub nodes: Vec<String>,

    /// File with one node name per line
    pub nodes_file: Option<PathBuf>,

    /// Stream label to filter by
    pub label: String,

    /// Service URL; falls back to the secrets file, then the default
    pub url: Option<String>,

    /// Extra headers as "Key: Value"
    pub headers: Vec<String>,

    /// Secrets file with service URL and bearer token
    pub secrets: Option<PathBuf>,

    /// Base output directory; a timestamped subdirectory is created per run
    pub output_dir: PathBuf,

    /// Page size for range queries
    pub limit: usize,
}

/// Parse an ISO 8601 time string into nanoseconds since the epoch
///
/// Accepts an explicit offset (or `Z`); a naive timestamp is taken as UTC.
pub fn parse_time_to_ns(value: &str) -> Result<i64> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed
            .timestamp_nanos_opt()
            .context("timestamp out of nanosecond range");
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("invalid ISO 8601 time: {value}"))?;

    naive
        .and_utc()
        .timestamp_nanos_opt()
        .context("timestamp out of nanosecond range")
}

/// Split "Key: Value" header arguments, warning on malformed ones
pub fn parse_header_args(headers: &[String]) -> Vec<(String, String)> {
    let mut parsed = Vec::new();
    for header in headers {
        match header.split_once(':') {
            Some((key, value)) => {
                parsed.push((key.trim().to_string(), value.trim().to_string()));
            }
            None => warn!("ignoring invalid header format '{header}'"),
        }
    }
    parsed
}

/// Resolve the node list: explicit nodes, then nodes file, then defaults
fn resolve_nodes(config: &BenchConfig, args: &DownloadLogsArgs) -> Result<Vec<String>> {
    if !args.nodes.is_empty() {
        return Ok(args.nodes.clone());
    }

    if let Some(nodes_file) = &args.nodes_file {
        let raw = std::fs::read_to_string(nodes_file)
            .with_context(|| format!("failed to read {}", nodes_file.display()))?;
        let nodes: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if nodes.is_empty() {
            bail!("nodes file {} is empty", nodes_file.display());
        }
        return Ok(nodes);
    }

    info!(
        "No nodes specified, using default list: {}",
        config.nodes.join(", ")
    );
    Ok(config.nodes.clone())
}

/// Fetch one node's logs into its output file, returning the line count
fn download_node_logs(
    client: &LokiClient,
    label: &str,
    node: &str,
    start_ns: i64,
    end_ns: i64,
    limit: usize,
    output_path: &Path,
) -> Result<usize> {
    let query = format!("{{{label}=\"{node}\"}}");

    let file = File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut count = 0usize;
    for entry in fetch_lines(client, &query, start_ns, end_ns, limit) {
        let entry = entry.with_context(|| format!("log fetch failed for node {node}"))?;
        writeln!(writer, "{}", entry.line)?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

/// Execute the download-logs command
pub fn execute_download_logs(config: &BenchConfig, args: &DownloadLogsArgs) -> Result<()> {
    let secrets = match &args.secrets {
        Some(path) => load_secrets(path)
            .with_context(|| format!("failed to load secrets from {}", path.display()))?,
        None => Secrets::default(),
    };

    // Command line overrides the secrets file
    let url = args
        .url
        .clone()
        .or_else(|| secrets.grafana.as_ref().and_then(|g| g.url.clone()))
        .unwrap_or_else(|| DEFAULT_LOKI_URL.to_string());

    let mut headers = Vec::new();
    if let Some(token) = secrets.grafana.as_ref().and_then(|g| g.token.as_ref()) {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
    headers.extend(parse_header_args(&args.headers));

    let start_ns = parse_time_to_ns(&args.from_time)?;
    let end_ns = parse_time_to_ns(&args.to_time)?;
    anyhow::ensure!(start_ns <= end_ns, "start time is after end time");

    let nodes = resolve_nodes(config, args)?;

    let run_timestamp = Utc::now().format("%Y_%m_%d_%H_%M_%S").to_string();
    let output_dir = args.output_dir.join(&run_timestamp);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    info!("Output directory: {}", output_dir.display());

    let run_details = json!({
        "run_timestamp": run_timestamp,
        "start_time": args.from_time,
        "end_time": args.to_time,
        "nodes": nodes,
        "url": url,
        "label": args.label,
        "output_dir": output_dir.display().to_string(),
    });
    crate::output::write_json(&run_details, output_dir.join("log_run_details.json"))
        .context("failed to save run details")?;

    info!("Downloading logs from {url}");
    info!("Time range: {} to {}", args.from_time, args.to_time);

    let client = LokiClient::new(url, headers).context("failed to build HTTP client")?;

    let results: Vec<(String, Result<usize>)> = nodes
        .par_iter()
        .map(|node| {
            info!("Processing node: {node}...");
            let output_path = output_dir.join(format!("{node}.txt"));
            let result = download_node_logs(
                &client,
                &args.label,
                node,
                start_ns,
                end_ns,
                args.limit,
                &output_path,
            );
            if let Ok(count) = &result {
                info!("Saved {} lines to {}", count, output_path.display());
            }
            (node.clone(), result)
        })
        .collect();

    let mut failed = 0usize;
    for (node, result) in &results {
        if let Err(err) = result {
            warn!("node {node} failed: {err:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed}/{} nodes failed", results.len());
    }

    info!("Downloaded logs for {} nodes", results.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_with_zulu_offset() {
        let ns = parse_time_to_ns("2023-01-01T12:00:00Z").unwrap();
        assert_eq!(ns, 1_672_574_400_000_000_000);
    }

    #[test]
    fn test_parse_time_naive_is_utc() {
        let explicit = parse_time_to_ns("2023-01-01T12:00:00Z").unwrap();
        let naive = parse_time_to_ns("2023-01-01T12:00:00").unwrap();
        assert_eq!(explicit, naive);
    }

    #[test]
    fn test_parse_time_with_offset() {
        let utc = parse_time_to_ns("2023-01-01T12:00:00Z").unwrap();
        let offset = parse_time_to_ns("2023-01-01T13:00:00+01:00").unwrap();
        assert_eq!(utc, offset);
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time_to_ns("yesterday").is_err());
    }

    #[test]
    fn test_parse_header_args() {
        let headers = parse_header_args(&[
            "X-Scope-OrgID: bench".to_string(),
            "invalid-header".to_string(),
        ]);
        assert_eq!(headers, vec![("X-Scope-OrgID".to_string(), "bench".to_string())]);
    }
}
