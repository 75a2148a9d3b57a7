//! Subprocess layer around the external node toolkit binary.

pub mod client;

// Re-export main types
pub use client::{
    json_payload, seed_for_index, SingleTx, ToolkitClient, ToolkitOutput, TxDestination,
};
