//! txbench CLI
//!
//! Benchmarking suite for a blockchain node's transaction pipeline.
//! Generates, funds and submits transactions via the external node toolkit
//! and collects logs and latency statistics for analysis.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use txbench_suite::commands::{
    execute_analyze, execute_balances, execute_download_logs, execute_dust, execute_fund,
    execute_generate_batch, execute_ring, execute_send_batch, AnalyzeArgs, BalancesArgs,
    DownloadLogsArgs, DustArgs, FundArgs, GenerateBatchArgs, RingArgs, SendBatchArgs,
};
use txbench_suite::utils::config::{
    BenchConfig, DEFAULT_PAGE_LIMIT, DEFAULT_SEND_RATE, DEFAULT_TOOLKIT_CMD, FUNDING_SEED_INDEX,
    FUND_BASE_AMOUNT,
};

/// txbench - transaction pipeline benchmarking for blockchain nodes
#[derive(Parser, Debug)]
#[command(name = "txbench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// External toolkit binary to delegate to
    #[arg(long, global = true, default_value = DEFAULT_TOOLKIT_CMD)]
    toolkit: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate transaction files with linearly increasing amounts
    GenerateBatch {
        /// Number of files to generate
        #[arg(short, long, default_value = "5")]
        count: u32,

        /// Node serving chain state
        #[arg(long)]
        node_url: Option<String>,

        /// Seed index funding the transfers
        #[arg(long, default_value_t = FUNDING_SEED_INDEX)]
        source_index: u64,

        /// Destination address for every transfer
        #[arg(long)]
        dest_address: String,

        /// Directory receiving the files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Amount of the first file; each following file adds this again
        #[arg(long, default_value = "1000000")]
        base_amount: u64,
    },

    /// Derive and fund a range of test wallets
    FundWallets {
        /// First seed index
        #[arg(long, default_value = "40")]
        start: u64,

        /// Last seed index (inclusive)
        #[arg(long, default_value = "99")]
        end: u64,

        /// Node accepting the transfers
        #[arg(long)]
        node_url: Option<String>,

        /// Seed index paying for the transfers
        #[arg(long, default_value_t = FUNDING_SEED_INDEX)]
        funding_index: u64,

        /// Base funding amount
        #[arg(long, default_value_t = FUND_BASE_AMOUNT)]
        base_amount: u64,
    },

    /// Register dust addresses for a range of seeds
    RegisterDust {
        /// First seed index
        #[arg(long, default_value = "40")]
        start: u64,

        /// Last seed index (inclusive)
        #[arg(long, default_value = "99")]
        end: u64,

        /// Node accepting the registrations
        #[arg(long)]
        node_url: Option<String>,

        /// Seed index paying the fees
        #[arg(long, default_value_t = FUNDING_SEED_INDEX)]
        funding_index: u64,
    },

    /// Sum UTXO balances for a range of seeds
    Balances {
        /// First seed index
        #[arg(long, default_value = "20")]
        start: u64,

        /// Last seed index (inclusive)
        #[arg(long, default_value = "25")]
        end: u64,

        /// Node serving wallet state
        #[arg(long)]
        node_url: Option<String>,
    },

    /// Run ring transfers across a seed range (i pays i+1, last wraps)
    Ring {
        /// First seed index
        #[arg(long, default_value = "20")]
        start: u64,

        /// Last seed index (inclusive)
        #[arg(long, default_value = "25")]
        end: u64,

        /// Submit directly instead of saving transaction files
        #[arg(long)]
        submit: bool,

        /// Directory receiving transaction byte files (save mode)
        #[arg(long, default_value = "txs")]
        tx_dir: PathBuf,

        /// Toolkit state database copied into each worker
        #[arg(long, default_value = "toolkit.db")]
        db_path: PathBuf,
    },

    /// Submit saved transaction files and analyze lifecycle traces
    SendBatch {
        /// Directory holding tx_*.mn files
        #[arg(long, default_value = "txs")]
        tx_dir: PathBuf,

        /// Target submission rate (tx/s)
        #[arg(short, long, default_value_t = DEFAULT_SEND_RATE)]
        rate: u32,

        /// Output path for the report JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Analyze lifecycle traces from a saved log file
    Analyze {
        /// Log file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Output path for the report JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Download node logs from the aggregation service
    DownloadLogs {
        /// Start time (ISO 8601)
        #[arg(long = "from-time")]
        from_time: String,

        /// End time (ISO 8601)
        #[arg(long = "to-time")]
        to_time: String,

        /// Specific node name (can be used multiple times)
        #[arg(long = "node", conflicts_with = "nodes_file")]
        nodes: Vec<String>,

        /// File containing list of nodes (one per line)
        #[arg(long)]
        nodes_file: Option<PathBuf>,

        /// Stream label to filter by
        #[arg(long, default_value = "host")]
        label: String,

        /// Service URL (overrides the secrets file)
        #[arg(long)]
        url: Option<String>,

        /// Custom header 'Key: Value' (can be used multiple times)
        #[arg(long = "header")]
        headers: Vec<String>,

        /// Secrets file with service URL and bearer token
        #[arg(long)]
        secrets: Option<PathBuf>,

        /// Base output directory for log files
        #[arg(short, long, default_value = "logs")]
        output_dir: PathBuf,

        /// Page size for range queries
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = BenchConfig {
        toolkit_cmd: cli.toolkit.clone(),
        ..BenchConfig::default()
    };

    // Execute command
    match cli.command {
        Commands::GenerateBatch {
            count,
            node_url,
            source_index,
            dest_address,
            output_dir,
            base_amount,
        } => {
            let args = GenerateBatchArgs {
                count,
                node_url: node_url.unwrap_or_else(|| config.default_node_url()),
                source_index,
                dest_address,
                output_dir,
                base_amount,
            };
            execute_generate_batch(&config, &args)?;
        }

        Commands::FundWallets {
            start,
            end,
            node_url,
            funding_index,
            base_amount,
        } => {
            let args = FundArgs {
                start,
                end,
                node_url: node_url.unwrap_or_else(|| config.default_node_url()),
                funding_index,
                base_amount,
            };
            execute_fund(&config, &args)?;
        }

        Commands::RegisterDust {
            start,
            end,
            node_url,
            funding_index,
        } => {
            let args = DustArgs {
                start,
                end,
                node_url: node_url.unwrap_or_else(|| config.default_node_url()),
                funding_index,
            };
            execute_dust(&config, &args)?;
        }

        Commands::Balances { start, end, node_url } => {
            let args = BalancesArgs {
                start,
                end,
                node_url: node_url.unwrap_or_else(|| config.default_node_url()),
            };
            execute_balances(&config, &args)?;
        }

        Commands::Ring {
            start,
            end,
            submit,
            tx_dir,
            db_path,
        } => {
            let args = RingArgs {
                start,
                end,
                submit,
                tx_dir,
                db_path,
            };
            execute_ring(&config, &args)?;
        }

        Commands::SendBatch { tx_dir, rate, report } => {
            let args = SendBatchArgs { tx_dir, rate, report };
            execute_send_batch(&config, &args)?;
        }

        Commands::Analyze { file, report } => {
            let args = AnalyzeArgs { file, report };
            execute_analyze(&args)?;
        }

        Commands::DownloadLogs {
            from_time,
            to_time,
            nodes,
            nodes_file,
            label,
            url,
            headers,
            secrets,
            output_dir,
            limit,
        } => {
            let args = DownloadLogsArgs {
                from_time,
                to_time,
                nodes,
                nodes_file,
                label,
                url,
                headers,
                secrets,
                output_dir,
                limit,
            };
            execute_download_logs(&config, &args)?;
        }
    }

    Ok(())
}
