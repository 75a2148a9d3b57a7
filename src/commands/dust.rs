//! Register-dust command implementation.
//!
//! Registers a dust address for every seed in the range, paying fees from
//! the funding seed. A failed registration is reported and the sweep moves
//! on; only a missing toolkit binary aborts the run.

use crate::toolkit::{seed_for_index, ToolkitClient};
use crate::utils::config::{BenchConfig, SETTLE_DELAY};
use crate::utils::error::ToolkitError;
use anyhow::Result;
use log::{info, warn};

/// Arguments for the register-dust command
#[derive(Debug, Clone)]
pub struct DustArgs {
    /// First seed index to register
    pub start: u64,

    /// Last seed index to register (inclusive)
    pub end: u64,

    /// Node accepting the registrations
    pub node_url: String,

    /// Seed index paying the registration fees
    pub funding_index: u64,
}

/// Execute the register-dust command
///
/// Returns the number of successful registrations.
pub fn execute_dust(config: &BenchConfig, args: &DustArgs) -> Result<usize> {
    anyhow::ensure!(args.start <= args.end, "start index must not exceed end index");

    let toolkit = ToolkitClient::new(&config.toolkit_cmd);
    let funding_seed = seed_for_index(args.funding_index);
    let total = args.end - args.start + 1;
    let mut registered = 0usize;

    info!(
        "Registering dust addresses for seeds {}-{}...",
        args.start, args.end
    );

    for index in args.start..=args.end {
        info!(
            "[{}/{}] Registering dust for seed {}...",
            index - args.start + 1,
            total,
            index
        );

        match toolkit.register_dust_address(
            &args.node_url,
            &seed_for_index(index),
            &funding_seed,
        ) {
            Ok(()) => {
                registered += 1;
            }
            Err(err @ ToolkitError::NotFound(_)) => return Err(err.into()),
            Err(err) => {
                warn!("failed to register seed {index}: {err}");
            }
        }

        // Let the funding account's previous transaction settle; prevents
        // nonce errors on the next registration
        std::thread::sleep(SETTLE_DELAY);
    }

    info!("Registered {registered}/{total} dust addresses");
    Ok(registered)
}
