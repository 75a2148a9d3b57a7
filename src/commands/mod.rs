//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform one operator task.

pub mod analyze;
pub mod balances;
pub mod download_logs;
pub mod dust;
pub mod fund;
pub mod generate_batch;
pub mod ring;
pub mod send_batch;

// Re-export main command functions
pub use analyze::{execute_analyze, AnalyzeArgs};
pub use balances::{execute_balances, BalancesArgs};
pub use download_logs::{execute_download_logs, DownloadLogsArgs};
pub use dust::{execute_dust, DustArgs};
pub use fund::{execute_fund, FundArgs};
pub use generate_batch::{execute_generate_batch, GenerateBatchArgs};
pub use ring::{execute_ring, RingArgs};
pub use send_batch::{execute_send_batch, SendBatchArgs};
