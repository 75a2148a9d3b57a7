//! Generate-batch command implementation.
//!
//! Produces N transaction files with linearly increasing amounts, used to
//! probe block size limits. The first failure aborts the run: later files
//! depend on nothing, but a broken toolkit setup would fail them all anyway.

use crate::toolkit::{SingleTx, ToolkitClient, TxDestination};
use crate::utils::config::BenchConfig;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the generate-batch command
#[derive(Debug, Clone)]
pub struct GenerateBatchArgs {
    /// Number of transaction files to produce
    pub count: u32,

    /// Node serving chain state for transaction construction
    pub node_url: String,

    /// Seed index funding the transfers
    pub source_index: u64,

    /// Destination address for every transfer
    pub dest_address: String,

    /// Directory receiving tx_<i>.json files
    pub output_dir: PathBuf,

    /// First file's amount; each following file adds the same amount again
    pub base_amount: u64,
}

/// Execute the generate-batch command
pub fn execute_generate_batch(config: &BenchConfig, args: &GenerateBatchArgs) -> Result<()> {
    let toolkit = ToolkitClient::new(&config.toolkit_cmd);
    let source_seed = crate::toolkit::seed_for_index(args.source_index);

    info!("Generating {} transaction files...", args.count);

    for i in 1..=args.count {
        let amount = args.base_amount * u64::from(i);
        let filename = args.output_dir.join(format!("tx_{i}.json"));

        info!(
            "[{}/{}] Generating {} with amount {}...",
            i,
            args.count,
            filename.display(),
            amount
        );

        let tx = SingleTx {
            source_seed: source_seed.clone(),
            src_url: args.node_url.clone(),
            amount,
            token_type: config.token_type.clone(),
            dest_address: args.dest_address.clone(),
            destination: TxDestination::File(filename.clone()),
        };

        toolkit
            .single_tx(&tx, None)
            .with_context(|| format!("failed to generate {}", filename.display()))?;
    }

    info!("All {} transactions generated", args.count);
    Ok(())
}
