use alloy::{
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{Filter, Log},
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use reqwest::Url;

use crate::error::{FetchError, FetchResult};
use crate::ethereum::utils;

pub type HttpProvider = RootProvider<Http<Client>>;

/// The two node calls a fetch run needs.
///
/// Implemented for the HTTP provider; tests substitute a recording node.
/// Error strings must not carry the full RPC URL.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Where this source points, for diagnostics.
    fn endpoint(&self) -> String;

    async fn block_number(&self) -> Result<u64, String>;

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, String>;
}

/// HTTP-backed node client.
#[derive(Debug)]
pub struct RpcNode {
    provider: HttpProvider,
    endpoint: String,
}

#[async_trait]
impl LogSource for RpcNode {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    async fn block_number(&self) -> Result<u64, String> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| utils::redact_urls(&e.to_string()))
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, String> {
        self.provider
            .get_logs(filter)
            .await
            .map_err(|e| utils::redact_urls(&e.to_string()))
    }
}

/// Build an HTTP client for `rpc_url`. No request is made yet.
pub fn connect(rpc_url: &str) -> FetchResult<RpcNode> {
    let endpoint = utils::redact_rpc_url(rpc_url);
    let url: Url = rpc_url.parse().map_err(|e| FetchError::Connection {
        endpoint: endpoint.clone(),
        reason: format!("invalid RPC URL: {}", e),
    })?;

    let provider = ProviderBuilder::new().on_http(url);
    Ok(RpcNode { provider, endpoint })
}

/// Liveness check: the node must answer `eth_blockNumber`.
///
/// Returns the head block reported by the node.
pub async fn ensure_connected<S: LogSource + ?Sized>(source: &S) -> FetchResult<u64> {
    match source.block_number().await {
        Ok(head) => {
            tracing::info!(
                "Connected to Ethereum node at {} (head block {})",
                source.endpoint(),
                head
            );
            Ok(head)
        }
        Err(e) => {
            tracing::debug!(
                "Connection check failed for {}: {}",
                source.endpoint(),
                utils::redact_urls(&e)
            );
            Err(FetchError::Connection {
                endpoint: source.endpoint(),
                reason: utils::interpret_rpc_error(&e),
            })
        }
    }
}
