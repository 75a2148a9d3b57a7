//! Ring command implementation.
//!
//! Moves funds around a ring of test wallets: seed i pays seed i+1 and the
//! last seed wraps back to the first, so every wallet both sends and
//! receives one transfer. Transfers either go straight to a relay or are
//! saved as byte files for a later batch submission.
//!
//! Workers run on a bounded thread pool. Each worker gets its own scratch
//! directory with a private copy of the toolkit database, since the toolkit
//! locks its state file.

use crate::commands::fund::jittered_amount;
use crate::toolkit::{seed_for_index, SingleTx, ToolkitClient, TxDestination};
use crate::utils::config::{BenchConfig, RING_BASE_AMOUNT, TOOLKIT_DB};
use crate::utils::error::ToolkitError;
use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the ring command
#[derive(Debug, Clone)]
pub struct RingArgs {
    /// First seed index in the ring
    pub start: u64,

    /// Last seed index in the ring (inclusive)
    pub end: u64,

    /// Submit directly instead of saving transaction files
    pub submit: bool,

    /// Directory receiving transaction byte files (save mode)
    pub tx_dir: PathBuf,

    /// Toolkit state database copied into each worker's scratch directory
    pub db_path: PathBuf,
}

/// The seed index that `index` pays in the ring
pub fn ring_target(index: u64, start: u64, end: u64) -> u64 {
    if index < end {
        index + 1
    } else {
        start
    }
}

/// Relay indices to try for a source index, round-robin from its home relay
///
/// Every relay appears exactly once, starting at `index % count` so
/// concurrent workers spread their first attempts across the relay set.
pub fn relay_rotation(index: u64, count: usize) -> Vec<usize> {
    let offset = (index % count as u64) as usize;
    (0..count).map(|i| (offset + i) % count).collect()
}

/// Execute the ring command
pub fn execute_ring(config: &BenchConfig, args: &RingArgs) -> Result<()> {
    anyhow::ensure!(args.start <= args.end, "start index must not exceed end index");
    anyhow::ensure!(!config.relays.is_empty(), "relay list is empty");

    let start_time = Instant::now();
    let count = (args.end - args.start + 1) as usize;

    if !args.submit {
        // Stale files from a previous run must not leak into the next batch
        if args.tx_dir.exists() {
            std::fs::remove_dir_all(&args.tx_dir)
                .with_context(|| format!("failed to clear {}", args.tx_dir.display()))?;
        }
        std::fs::create_dir_all(&args.tx_dir)
            .with_context(|| format!("failed to create {}", args.tx_dir.display()))?;
    }

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(count);

    info!(
        "Starting ring transfers ({} -> ... -> {} -> {}) on {} workers...",
        args.start, args.end, args.start, workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to build worker pool")?;

    pool.install(|| {
        (args.start..=args.end)
            .into_par_iter()
            .try_for_each(|index| process_transfer(config, args, index))
    })?;

    info!(
        "All {} ring transfers {} in {:.2}s",
        count,
        if args.submit { "sent" } else { "saved" },
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Handle the transfer for one index in the ring
fn process_transfer(config: &BenchConfig, args: &RingArgs, index: u64) -> Result<()> {
    let toolkit = ToolkitClient::new(&config.toolkit_cmd);
    let target = ring_target(index, args.start, args.end);
    let amount = jittered_amount(RING_BASE_AMOUNT);

    info!("Processing: seed {index} -> seed {target} (amount {amount})...");

    let scratch = tempfile::tempdir().context("failed to create scratch directory")?;

    // Private DB copy; the toolkit locks its state file
    if args.db_path.exists() {
        std::fs::copy(&args.db_path, scratch.path().join(TOOLKIT_DB))
            .with_context(|| format!("failed to copy {}", args.db_path.display()))?;
    }

    let dest_address = toolkit
        .show_address(
            &config.network.name,
            &seed_for_index(target),
            Some(scratch.path()),
        )
        .with_context(|| format!("failed to derive address for seed index {target}"))?;

    send_with_retry(
        &toolkit,
        config,
        args,
        index,
        &dest_address,
        amount,
        scratch.path(),
    )
    .with_context(|| format!("transfer from seed {index} failed on every relay"))?;

    info!(
        "Seed {index} -> seed {target} {} ({amount})",
        if args.submit { "sent" } else { "saved" }
    );

    Ok(())
}

/// Try the transfer against every relay, starting at the source's home relay
fn send_with_retry(
    toolkit: &ToolkitClient,
    config: &BenchConfig,
    args: &RingArgs,
    index: u64,
    dest_address: &str,
    amount: u64,
    scratch: &Path,
) -> Result<(), ToolkitError> {
    let relays = config.relay_urls();
    let rotation = relay_rotation(index, relays.len());
    let last_attempt = rotation.len() - 1;

    for (attempt, relay_idx) in rotation.into_iter().enumerate() {
        let node_url = &relays[relay_idx];

        let destination = if args.submit {
            TxDestination::Node(node_url.clone())
        } else {
            let filename = format!("tx_{}_{}.mn", Utc::now().timestamp(), index);
            TxDestination::ByteFile(std::path::absolute(args.tx_dir.join(filename))?)
        };

        let tx = SingleTx {
            source_seed: seed_for_index(index),
            src_url: node_url.clone(),
            amount,
            token_type: config.token_type.clone(),
            dest_address: dest_address.to_string(),
            destination,
        };

        match toolkit.single_tx(&tx, Some(scratch)) {
            Ok(()) => {
                if attempt > 0 {
                    info!("retry succeeded on {node_url}");
                }
                return Ok(());
            }
            Err(err) if attempt < last_attempt => {
                warn!("failed on {node_url}: {err}; trying next relay");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_target_advances() {
        assert_eq!(ring_target(20, 20, 25), 21);
        assert_eq!(ring_target(24, 20, 25), 25);
    }

    #[test]
    fn test_ring_target_wraps_at_end() {
        assert_eq!(ring_target(25, 20, 25), 20);
    }

    #[test]
    fn test_relay_rotation_starts_at_home_relay() {
        assert_eq!(relay_rotation(3, 5), vec![3, 4, 0, 1, 2]);
        assert_eq!(relay_rotation(7, 5), vec![2, 3, 4, 0, 1]);
    }

    #[test]
    fn test_relay_rotation_visits_every_relay_once() {
        let mut rotation = relay_rotation(42, 10);
        rotation.sort_unstable();
        assert_eq!(rotation, (0..10).collect::<Vec<_>>());
    }
}
