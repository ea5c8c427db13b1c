use std::path::PathBuf;

use thiserror::Error;

/// Every way a fetch run can fail. All variants are fatal.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The node could not be reached or did not answer the liveness check.
    #[error("Failed to connect to Ethereum node at {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("ABI file {path:?} could not be read: {source}")]
    AbiNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ABI file {path:?} is not a valid contract ABI: {source}")]
    AbiParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    /// The requested event is not declared in the loaded ABI.
    #[error("Event '{name}' not found in contract ABI. Available events: {}", format_available(.available))]
    UnknownEvent { name: String, available: Vec<String> },

    #[error("Invalid block range: from_block {from} is after to_block {to}")]
    InvalidRange { from: u64, to: u64 },

    /// The node rejected the log query.
    #[error("Log query rejected by node: {0}")]
    Remote(String),

    /// A returned log does not match the event's ABI layout.
    #[error("Failed to decode log {tx}: {reason}")]
    Decode { tx: String, reason: String },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
