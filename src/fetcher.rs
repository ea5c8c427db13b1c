use std::io::Write;
use tracing::info;

use crate::{
    config::Config,
    error::FetchResult,
    ethereum::{
        abi::load_abi,
        contract::{query_events, ContractHandle},
        provider::{self, LogSource},
        EventFilter,
    },
    report,
};

/// Runs the connect → load ABI → bind → query → report sequence for one
/// configured contract and event.
#[derive(Debug, Clone)]
pub struct EventFetcher {
    config: Config,
}

impl EventFetcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn filter(&self) -> EventFilter {
        EventFilter::new(
            self.config.event_name.clone(),
            self.config.from_block,
            self.config.to_block,
        )
    }

    /// Connect over HTTP to the configured endpoint and run against it.
    pub async fn run_http<W: Write>(&self, out: &mut W) -> FetchResult<usize> {
        let node = provider::connect(&self.config.rpc_url)?;
        self.run(&node, out).await
    }

    /// Run every stage against `source`, writing the report to `out`.
    ///
    /// Stops at the first failure. Returns the number of entries reported.
    pub async fn run<S: LogSource + ?Sized, W: Write>(
        &self,
        source: &S,
        out: &mut W,
    ) -> FetchResult<usize> {
        provider::ensure_connected(source).await?;

        let abi = load_abi(&self.config.abi_path).await?;
        let contract = ContractHandle::from_parts(&self.config.contract_address, abi)?;

        let entries = query_events(source, &contract, &self.filter()).await?;
        report::write_entries(out, &entries)?;

        info!("Reported {} {} events", entries.len(), self.config.event_name);
        Ok(entries.len())
    }
}
