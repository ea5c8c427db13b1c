use alloy::{
    dyn_abi::EventExt,
    eips::BlockNumberOrTag,
    json_abi::{Event, JsonAbi},
    primitives::Address,
    rpc::types::{Filter, Log},
};
use std::collections::HashMap;
use tracing::{debug, info};

use super::{abi, provider::LogSource, utils, EventEntry, EventFilter};
use crate::error::{FetchError, FetchResult};

/// A deployed contract address bound to its ABI.
///
/// Events are resolved by name through a map built once at bind time. When
/// an event name is overloaded the first declared signature is used.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    address: Address,
    abi: JsonAbi,
    events: HashMap<String, Event>,
}

impl ContractHandle {
    pub fn bind(address: Address, abi: JsonAbi) -> Self {
        let mut events = HashMap::new();
        for event in abi.events() {
            events
                .entry(event.name.clone())
                .or_insert_with(|| event.clone());
        }

        Self {
            address,
            abi,
            events,
        }
    }

    /// Parse `address` and bind it to `abi`.
    pub fn from_parts(address: &str, abi: JsonAbi) -> FetchResult<Self> {
        let address = utils::validate_address(address)?;
        Ok(Self::bind(address, abi))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Look up an event descriptor by name.
    pub fn event(&self, name: &str) -> FetchResult<&Event> {
        self.events
            .get(name)
            .ok_or_else(|| FetchError::UnknownEvent {
                name: name.to_string(),
                available: abi::event_names(&self.abi),
            })
    }

    /// `eth_getLogs` filter for `event` emitted by this contract.
    ///
    /// `to_block` is handed to the node as-is, so `latest` is resolved
    /// remotely at query time.
    pub fn log_filter(&self, event: &Event, filter: &EventFilter) -> Filter {
        let mut log_filter = Filter::new()
            .address(self.address)
            .from_block(filter.from_block)
            .to_block(BlockNumberOrTag::from(filter.to_block));

        // anonymous events carry no signature topic
        if !event.anonymous {
            log_filter = log_filter.event_signature(event.selector());
        }

        log_filter
    }
}

/// Fetch every log of `filter.event_name` in the requested range with a
/// single `eth_getLogs` call and decode them against the ABI.
///
/// No query is issued when the event is unknown or the range is inverted.
pub async fn query_events<S: LogSource + ?Sized>(
    source: &S,
    contract: &ContractHandle,
    filter: &EventFilter,
) -> FetchResult<Vec<EventEntry>> {
    let event = contract.event(&filter.event_name)?;
    filter.validate()?;

    let log_filter = contract.log_filter(event, filter);
    info!(
        "Querying {} events from {:?} (blocks {}..={})",
        event.name, contract.address(), filter.from_block, filter.to_block
    );
    debug!("Log filter: {:?}", log_filter);

    let logs = source
        .logs(&log_filter)
        .await
        .map_err(|e| FetchError::Remote(utils::interpret_rpc_error(&e)))?;

    let entries = logs
        .iter()
        .map(|log| decode_entry(event, log))
        .collect::<FetchResult<Vec<_>>>()?;

    info!("Found {} {} events", entries.len(), event.name);
    Ok(entries)
}

/// Decode one log into an [`EventEntry`], restoring ABI input order across
/// indexed topics and the data section.
pub fn decode_entry(event: &Event, log: &Log) -> FetchResult<EventEntry> {
    let tx = log
        .transaction_hash
        .map(|h| format!("0x{:x}", h))
        .unwrap_or_else(|| "<pending>".to_string());

    let transaction_hash = log.transaction_hash.ok_or_else(|| FetchError::Decode {
        tx: tx.clone(),
        reason: "log has no transaction hash".to_string(),
    })?;
    let block_number = log.block_number.ok_or_else(|| FetchError::Decode {
        tx: tx.clone(),
        reason: "log has no block number".to_string(),
    })?;

    let decoded = event
        .decode_log(log.data(), true)
        .map_err(|e| FetchError::Decode {
            tx: tx.clone(),
            reason: format!("does not match {}: {}", event.signature(), e),
        })?;

    let mut indexed = decoded.indexed.into_iter();
    let mut body = decoded.body.into_iter();
    let mut args = Vec::with_capacity(event.inputs.len());

    for (i, input) in event.inputs.iter().enumerate() {
        let value = if input.indexed {
            indexed.next()
        } else {
            body.next()
        };
        let value = value.ok_or_else(|| FetchError::Decode {
            tx: tx.clone(),
            reason: format!("missing value for parameter #{}", i),
        })?;

        let name = if input.name.is_empty() {
            format!("arg{}", i)
        } else {
            input.name.clone()
        };
        args.push((name, value));
    }

    debug!("Decoded {} in block {} ({})", event.name, block_number, tx);

    Ok(EventEntry {
        event: event.name.clone(),
        args,
        transaction_hash,
        block_number,
        log_index: log.log_index,
    })
}

#[cfg(test)]
pub(crate) mod test_logs {
    use alloy::{
        json_abi::Event,
        primitives::{Address, B256, U256},
        rpc::types::Log,
    };
    use serde_json::json;

    /// A `RoleSet` log as a node would return it.
    pub fn role_set_log(
        event: &Event,
        contract: Address,
        block: u64,
        tx_hash: B256,
        role: Address,
        account: Address,
    ) -> Log {
        serde_json::from_value(json!({
            "address": contract,
            "topics": [event.selector(), role.into_word()],
            "data": account.into_word(),
            "blockHash": B256::repeat_byte(0x11),
            "blockNumber": format!("{:#x}", block),
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "logIndex": "0x0",
            "removed": false
        }))
        .unwrap()
    }

    /// A `Transfer(address indexed, address indexed, uint256)` log.
    pub fn transfer_log(
        event: &Event,
        contract: Address,
        block: u64,
        tx_hash: B256,
        value: u64,
    ) -> Log {
        serde_json::from_value(json!({
            "address": contract,
            "topics": [
                event.selector(),
                Address::repeat_byte(0x01).into_word(),
                Address::repeat_byte(0x02).into_word()
            ],
            "data": B256::from(U256::from(value).to_be_bytes::<32>()),
            "blockHash": B256::repeat_byte(0x22),
            "blockNumber": format!("{:#x}", block),
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "logIndex": "0x1",
            "removed": false
        }))
        .unwrap()
    }
}
