//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while invoking the external node toolkit
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("toolkit executable '{0}' not found; ensure it is in your PATH")]
    NotFound(String),

    #[error("command `{command}` failed\nstdout: {stdout}\nstderr: {stderr}")]
    CommandFailed {
        command: String,
        stdout: String,
        stderr: String,
    },

    #[error("toolkit I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected toolkit output: {0}")]
    BadOutput(String),
}

/// Errors that can occur while fetching logs from the aggregation service
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: reqwest::StatusCode, body: String },

    #[error("failed to decode query response: {detail} (body: {body})")]
    MalformedResponse { detail: String, body: String },

    #[error("log query failed with status: {0}")]
    QueryFailed(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
