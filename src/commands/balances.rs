//! Balances command implementation.
//!
//! Sums UTXO values for every seed in the range. A seed whose balance
//! cannot be read counts as zero so one flaky wallet does not hide the
//! rest of the sweep.

use crate::toolkit::{seed_for_index, ToolkitClient};
use crate::utils::config::BenchConfig;
use anyhow::Result;
use log::{info, warn};
use std::time::Instant;

/// Arguments for the balances command
#[derive(Debug, Clone)]
pub struct BalancesArgs {
    /// First seed index to query
    pub start: u64,

    /// Last seed index to query (inclusive)
    pub end: u64,

    /// Node serving wallet state
    pub node_url: String,
}

/// Execute the balances command
///
/// Returns the total balance across all queried seeds.
pub fn execute_balances(config: &BenchConfig, args: &BalancesArgs) -> Result<u64> {
    anyhow::ensure!(args.start <= args.end, "start index must not exceed end index");

    let start_time = Instant::now();
    let toolkit = ToolkitClient::new(&config.toolkit_cmd);

    info!(
        "Checking balances for seeds {}-{} on {}...",
        args.start, args.end, args.node_url
    );

    let mut total: u64 = 0;
    for index in args.start..=args.end {
        let balance = match toolkit.wallet_balance(&seed_for_index(index), &args.node_url) {
            Ok(balance) => balance,
            Err(err) => {
                warn!("failed to read balance for seed {index}: {err}");
                0
            }
        };

        println!("Seed {index}: {balance}");
        total += balance;
    }

    println!("\nTotal Balance: {total}");
    info!(
        "Balance sweep completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(total)
}
