//! Subprocess client for the external node toolkit.
//!
//! All cryptographic and protocol work (transaction construction, signing,
//! submission) happens inside the toolkit binary; this module only builds
//! argument lists, captures output and decodes the JSON the toolkit prints.

use crate::utils::error::ToolkitError;
use log::debug;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Zero-padded 64-character decimal seed for a wallet index
pub fn seed_for_index(index: u64) -> String {
    format!("{index:064}")
}

/// Extract the JSON document from toolkit output that may carry a
/// human-readable preamble: everything from the first line starting with
/// `{` onward.
pub fn json_payload(output: &str) -> Option<String> {
    let start = output
        .lines()
        .position(|line| line.trim_start().starts_with('{'))?;

    Some(output.lines().skip(start).collect::<Vec<_>>().join("\n"))
}

/// Captured output channels of one toolkit invocation
#[derive(Debug, Clone)]
pub struct ToolkitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Destination of a generated transaction
#[derive(Debug, Clone)]
pub enum TxDestination {
    /// Submit directly to a node
    Node(String),
    /// Serialize as JSON to a file
    File(PathBuf),
    /// Serialize as raw bytes to a file, for later batch submission
    ByteFile(PathBuf),
}

/// Parameters for one transfer
#[derive(Debug, Clone)]
pub struct SingleTx {
    pub source_seed: String,
    pub src_url: String,
    pub amount: u64,
    pub token_type: String,
    pub dest_address: String,
    pub destination: TxDestination,
}

#[derive(Deserialize)]
struct AddressOutput {
    unshielded: String,
}

#[derive(Deserialize)]
struct WalletOutput {
    #[serde(default)]
    utxos: Vec<Utxo>,
}

#[derive(Deserialize)]
struct Utxo {
    #[serde(default)]
    value: u64,
}

/// Client wrapping the external toolkit binary
#[derive(Debug, Clone)]
pub struct ToolkitClient {
    program: String,
}

impl ToolkitClient {
    /// Create a client for the given binary path or name
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the toolkit with the given arguments, capturing both channels
    ///
    /// A non-zero exit status is an error carrying everything the child
    /// printed. A missing binary gets its own error so callers can tell the
    /// operator to fix their PATH.
    pub fn run<I, S>(&self, args: I, cwd: Option<&Path>) -> Result<ToolkitOutput, ToolkitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().into_owned())
            .collect();

        debug!("running: {} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(&args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ToolkitError::NotFound(self.program.clone())
            } else {
                ToolkitError::Io(err)
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ToolkitError::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                stdout,
                stderr,
            });
        }

        Ok(ToolkitOutput { stdout, stderr })
    }

    /// Derive the unshielded address for a seed
    pub fn show_address(
        &self,
        network: &str,
        seed: &str,
        cwd: Option<&Path>,
    ) -> Result<String, ToolkitError> {
        let output = self.run(
            ["show-address", "--network", network, "--seed", seed],
            cwd,
        )?;

        let decoded: AddressOutput =
            serde_json::from_str(output.stdout.trim()).map_err(|err| {
                ToolkitError::BadOutput(format!("show-address did not print address JSON: {err}"))
            })?;

        Ok(decoded.unshielded)
    }

    /// Total unshielded balance for a seed, summed over its UTXOs
    ///
    /// The toolkit prints a human-readable preamble before the wallet JSON;
    /// everything before the first `{`-prefixed line is ignored.
    pub fn wallet_balance(&self, seed: &str, src_url: &str) -> Result<u64, ToolkitError> {
        let output = self.run(["show-wallet", "--seed", seed, "--src-url", src_url], None)?;

        let payload = json_payload(&output.stdout).ok_or_else(|| {
            ToolkitError::BadOutput("show-wallet printed no JSON object".to_string())
        })?;

        let wallet: WalletOutput = serde_json::from_str(&payload)
            .map_err(|err| ToolkitError::BadOutput(format!("show-wallet JSON: {err}")))?;

        Ok(wallet.utxos.iter().map(|utxo| utxo.value).sum())
    }

    /// Build one transfer and either submit it or save it to a file
    pub fn single_tx(&self, tx: &SingleTx, cwd: Option<&Path>) -> Result<(), ToolkitError> {
        let amount = tx.amount.to_string();

        let mut args: Vec<String> = vec![
            "generate-txs".into(),
            "single-tx".into(),
            "--source-seed".into(),
            tx.source_seed.clone(),
            "--src-url".into(),
            tx.src_url.clone(),
            "--unshielded-amount".into(),
            amount,
            "--unshielded-token-type".into(),
            tx.token_type.clone(),
            "--destination-address".into(),
            tx.dest_address.clone(),
        ];

        match &tx.destination {
            TxDestination::Node(url) => {
                args.push("--dest-url".into());
                args.push(url.clone());
            }
            TxDestination::File(path) => {
                args.push("--dest-file".into());
                args.push(path.display().to_string());
            }
            TxDestination::ByteFile(path) => {
                args.push("--to-bytes".into());
                args.push("--dest-file".into());
                args.push(path.display().to_string());
            }
        }

        self.run(&args, cwd)?;
        Ok(())
    }

    /// Register a dust address, paying fees from the funding seed
    pub fn register_dust_address(
        &self,
        node_url: &str,
        wallet_seed: &str,
        funding_seed: &str,
    ) -> Result<(), ToolkitError> {
        self.run(
            [
                "generate-txs",
                "--src-url",
                node_url,
                "--dest-url",
                node_url,
                "register-dust-address",
                "--wallet-seed",
                wallet_seed,
                "--funding-seed",
                funding_seed,
            ],
            None,
        )?;
        Ok(())
    }

    /// Submit pre-built transaction files at a target rate
    ///
    /// Returns the child's stderr: the toolkit reports lifecycle events
    /// there as JSON lines. Source files are made absolute because the
    /// child runs in its own working directory.
    pub fn send_batch(
        &self,
        tx_files: &[PathBuf],
        dest_urls: &[String],
        rate: u32,
        cwd: Option<&Path>,
    ) -> Result<String, ToolkitError> {
        let mut args: Vec<String> = vec![
            "generate-txs".into(),
            "send".into(),
            "--rate".into(),
            rate.to_string(),
        ];

        for file in tx_files {
            let absolute = std::path::absolute(file)?;
            args.push("--src-file".into());
            args.push(absolute.display().to_string());
        }

        for url in dest_urls {
            args.push("--dest-url".into());
            args.push(url.clone());
        }

        let output = self.run(&args, cwd)?;
        Ok(output.stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_for_index_is_zero_padded() {
        let seed = seed_for_index(7);
        assert_eq!(seed.len(), 64);
        assert!(seed.ends_with('7'));
        assert!(seed[..63].chars().all(|c| c == '0'));
    }

    #[test]
    fn test_seed_for_index_multi_digit() {
        let seed = seed_for_index(42);
        assert_eq!(seed.len(), 64);
        assert!(seed.ends_with("42"));
    }

    #[test]
    fn test_json_payload_skips_preamble() {
        let output = "Syncing wallet...\nDone.\n{\"utxos\": []}\n";
        assert_eq!(json_payload(output).unwrap(), "{\"utxos\": []}");
    }

    #[test]
    fn test_json_payload_multiline_document() {
        let output = "preamble\n{\n  \"utxos\": []\n}";
        assert_eq!(json_payload(output).unwrap(), "{\n  \"utxos\": []\n}");
    }

    #[test]
    fn test_json_payload_none_without_json() {
        assert!(json_payload("no json here\nat all").is_none());
    }

    #[test]
    fn test_missing_binary_reports_not_found() {
        let client = ToolkitClient::new("definitely-not-a-real-binary-xyz");
        let err = client.run(["--help"], None).unwrap_err();
        assert!(matches!(err, ToolkitError::NotFound(_)));
    }
}
