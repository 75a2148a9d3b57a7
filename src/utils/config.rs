//! Configuration and constants for the benchmarking suite.
//!
//! Everything that was tunable between benchmark runs lives in
//! [`BenchConfig`] and is passed explicitly into each operation instead of
//! being read from globals. Defaults reproduce the values used by the
//! standing benchmark environment.

use crate::utils::error::OutputError;
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Default timeout for log-query HTTP requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// External toolkit binary invoked for all signing/submission work
pub const DEFAULT_TOOLKIT_CMD: &str = "node-toolkit";

/// Default log aggregation endpoint
pub const DEFAULT_LOKI_URL: &str = "http://localhost:3100";

/// Default page size for log range queries
pub const DEFAULT_PAGE_LIMIT: usize = 5000;

/// Native token type identifier (32 zero bytes, hex)
pub const NATIVE_TOKEN_TYPE: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Seed paying fees for funding and dust registration
pub const FUNDING_SEED_INDEX: u64 = 1;

/// Base amount for ring transfers; actual amounts are jittered
pub const RING_BASE_AMOUNT: u64 = 1_000_000;

/// Base amount for wallet funding (covers many ring rounds)
pub const FUND_BASE_AMOUNT: u64 = 1_000_000_000_000;

/// Transfer amounts are randomized by +/- this much
pub const AMOUNT_JITTER: i64 = 100;

/// Pause between sequential transfers from one account, so the previous
/// transaction settles before the next one reuses the nonce
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Default target submission rate for batch sends (tx/s)
pub const DEFAULT_SEND_RATE: u32 = 30;

/// Local toolkit state database copied into each worker's scratch directory
pub const TOOLKIT_DB: &str = "toolkit.db";

/// How node names are turned into websocket endpoints
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name passed to the toolkit for address derivation
    pub name: String,

    /// Domain suffix appended to node names
    pub node_domain: String,

    /// Websocket port exposed by every node
    pub node_port: u16,
}

impl NetworkConfig {
    /// Websocket URL for a named node
    pub fn node_url(&self, name: &str) -> String {
        format!("ws://{}.{}:{}", name, self.node_domain, self.node_port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "devnet".to_string(),
            node_domain: "node.bench.local".to_string(),
            node_port: 9944,
        }
    }
}

/// Process-wide benchmark configuration, passed into each operation
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Path or name of the external toolkit binary
    pub toolkit_cmd: String,

    /// Endpoint construction rules
    pub network: NetworkConfig,

    /// Token type used for every transfer
    pub token_type: String,

    /// All nodes in the environment (used for log collection)
    pub nodes: Vec<String>,

    /// Relay nodes accepting transaction submissions
    pub relays: Vec<String>,
}

impl BenchConfig {
    /// Websocket URLs for all relay nodes
    pub fn relay_urls(&self) -> Vec<String> {
        self.relays
            .iter()
            .map(|name| self.network.node_url(name))
            .collect()
    }

    /// Default submission endpoint (first relay)
    pub fn default_node_url(&self) -> String {
        self.network.node_url(&self.relays[0])
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            toolkit_cmd: DEFAULT_TOOLKIT_CMD.to_string(),
            network: NetworkConfig::default(),
            token_type: NATIVE_TOKEN_TYPE.to_string(),
            nodes: [
                "alice", "bob", "charlie", "dave", "eve", "ferdie", "george",
                "henry", "iris", "jack", "kate", "leo", "mike", "nina",
                "oliver", "paul", "quinn", "rita", "sam", "tom",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            relays: [
                "ferdie", "george", "henry", "iris", "jack", "paul", "quinn",
                "rita", "sam", "tom",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Secrets file contents (log service endpoint and credentials)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub grafana: Option<GrafanaAuth>,
}

/// Log service connection details from the secrets file
#[derive(Debug, Clone, Deserialize)]
pub struct GrafanaAuth {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Load a secrets file, decrypting with `sops` when available.
///
/// Falls back to reading the file as plain JSON if `sops` is missing or
/// refuses the file, so unencrypted local configs keep working.
pub fn load_secrets(path: impl AsRef<Path>) -> Result<Secrets, OutputError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(OutputError::InvalidPath(format!(
            "secrets file not found: {}",
            path.display()
        )));
    }

    if let Ok(output) = Command::new("sops").arg("-d").arg(path).output() {
        if output.status.success() {
            let decrypted: Secrets = serde_json::from_slice(&output.stdout)?;
            return Ok(decrypted);
        }
    }

    let raw = std::fs::read_to_string(path)?;
    let secrets: Secrets = serde_json::from_str(&raw)?;
    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_url_format() {
        let network = NetworkConfig::default();
        assert_eq!(
            network.node_url("ferdie"),
            "ws://ferdie.node.bench.local:9944"
        );
    }

    #[test]
    fn test_default_lists() {
        let config = BenchConfig::default();
        assert_eq!(config.nodes.len(), 20);
        assert_eq!(config.relays.len(), 10);
        assert_eq!(config.relay_urls().len(), 10);
        assert!(config.default_node_url().starts_with("ws://ferdie."));
    }
}
