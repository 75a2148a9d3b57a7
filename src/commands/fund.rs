//! Fund-wallets command implementation.
//!
//! Two phases:
//! 1. Derive the address for every seed index in the range
//! 2. Fund each address from the funding seed
//!
//! Transfers run sequentially with a settle pause between them: they all
//! spend from one account, and the next transfer needs the previous one's
//! state change propagated.

use crate::toolkit::{seed_for_index, SingleTx, ToolkitClient, TxDestination};
use crate::utils::config::{BenchConfig, AMOUNT_JITTER, SETTLE_DELAY};
use anyhow::{Context, Result};
use log::info;
use rand::Rng;

/// Arguments for the fund-wallets command
#[derive(Debug, Clone)]
pub struct FundArgs {
    /// First seed index to fund
    pub start: u64,

    /// Last seed index to fund (inclusive)
    pub end: u64,

    /// Node accepting the funding transfers
    pub node_url: String,

    /// Seed index paying for the transfers
    pub funding_index: u64,

    /// Base funding amount; actual amounts are jittered
    pub base_amount: u64,
}

/// Amount with +/- jitter so no two transfers look identical on chain
pub fn jittered_amount(base: u64) -> u64 {
    let jitter = rand::thread_rng().gen_range(-AMOUNT_JITTER..=AMOUNT_JITTER);
    base.saturating_add_signed(jitter)
}

/// Execute the fund-wallets command
pub fn execute_fund(config: &BenchConfig, args: &FundArgs) -> Result<()> {
    anyhow::ensure!(args.start <= args.end, "start index must not exceed end index");

    let toolkit = ToolkitClient::new(&config.toolkit_cmd);
    let funding_seed = seed_for_index(args.funding_index);
    let wallet_count = args.end - args.start + 1;

    info!(
        "Step 1/2: Deriving addresses for seeds {}-{}...",
        args.start, args.end
    );

    let mut addresses = Vec::with_capacity(wallet_count as usize);
    for index in args.start..=args.end {
        let address = toolkit
            .show_address(&config.network.name, &seed_for_index(index), None)
            .with_context(|| format!("failed to derive address for seed index {index}"))?;

        info!("Seed {index}: {address}");
        addresses.push(address);
    }

    info!("Step 2/2: Funding {} wallets...", wallet_count);

    for (i, address) in addresses.iter().enumerate() {
        info!("Funding wallet {}/{} ({address})...", i + 1, wallet_count);

        let tx = SingleTx {
            source_seed: funding_seed.clone(),
            src_url: args.node_url.clone(),
            amount: jittered_amount(args.base_amount),
            token_type: config.token_type.clone(),
            dest_address: address.clone(),
            destination: TxDestination::Node(args.node_url.clone()),
        };

        toolkit
            .single_tx(&tx, None)
            .with_context(|| format!("failed to fund {address}"))?;

        // Let the funding account's transaction settle before reusing it
        if i + 1 < addresses.len() {
            std::thread::sleep(SETTLE_DELAY);
        }
    }

    info!("All {} wallets funded", wallet_count);
    Ok(())
}
