use alloy::json_abi::JsonAbi;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{FetchError, FetchResult};

/// Load a contract ABI from a JSON file.
///
/// The file holds the standard JSON array of descriptor objects. A missing
/// file and malformed content are reported separately.
pub async fn load_abi<P: AsRef<Path>>(path: P) -> FetchResult<JsonAbi> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::AbiNotFound {
            path: path.to_path_buf(),
            source,
        })?;

    let abi = parse_abi(&content).map_err(|source| FetchError::AbiParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded ABI from {:?}: {} functions, {} events",
        path,
        abi.functions().count(),
        abi.events().count()
    );
    debug!("ABI events: {}", event_names(&abi).join(", "));
    Ok(abi)
}

pub fn parse_abi(content: &str) -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(content)
}

/// Names of every event the ABI declares, sorted by name.
pub fn event_names(abi: &JsonAbi) -> Vec<String> {
    abi.events().map(|e| e.name.clone()).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// `RoleSet(address indexed role, address account)` plus a function and
    /// a second event.
    pub const ROLE_ABI: &str = r#"[
        {
            "type": "event",
            "name": "RoleSet",
            "anonymous": false,
            "inputs": [
                {"name": "role", "type": "address", "indexed": true, "internalType": "address"},
                {"name": "account", "type": "address", "indexed": false, "internalType": "address"}
            ]
        },
        {
            "type": "event",
            "name": "Paused",
            "anonymous": false,
            "inputs": [
                {"name": "by", "type": "address", "indexed": false, "internalType": "address"}
            ]
        },
        {
            "type": "function",
            "name": "setRole",
            "stateMutability": "nonpayable",
            "inputs": [
                {"name": "role", "type": "address", "internalType": "address"},
                {"name": "account", "type": "address", "internalType": "address"}
            ],
            "outputs": []
        }
    ]"#;

    /// Same shape, but without any `RoleSet` event.
    pub const TOKEN_ABI: &str = r#"[
        {
            "type": "event",
            "name": "Transfer",
            "anonymous": false,
            "inputs": [
                {"name": "from", "type": "address", "indexed": true},
                {"name": "to", "type": "address", "indexed": true},
                {"name": "value", "type": "uint256", "indexed": false}
            ]
        }
    ]"#;
}
