pub mod abi;
pub mod contract;
pub mod provider;
pub mod utils;

use alloy::{dyn_abi::DynSolValue, eips::BlockNumberOrTag, primitives::B256};
use serde::Deserialize;
use std::{fmt, str::FromStr};

use crate::error::FetchError;

/// Upper bound of a log query: a fixed block or whatever the node's head is
/// when the query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlockSpec")]
pub enum BlockSpec {
    Number(u64),
    Latest,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBlockSpec {
    Number(u64),
    Tag(String),
}

impl TryFrom<RawBlockSpec> for BlockSpec {
    type Error = FetchError;

    fn try_from(raw: RawBlockSpec) -> Result<Self, Self::Error> {
        match raw {
            RawBlockSpec::Number(n) => Ok(Self::Number(n)),
            RawBlockSpec::Tag(tag) => tag.parse(),
        }
    }
}

impl FromStr for BlockSpec {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        s.parse().map(Self::Number).map_err(|_| {
            FetchError::Config(format!(
                "to_block must be a block number or \"latest\", got '{}'",
                s
            ))
        })
    }
}

impl fmt::Display for BlockSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Latest => f.write_str("latest"),
        }
    }
}

impl From<BlockSpec> for BlockNumberOrTag {
    fn from(spec: BlockSpec) -> Self {
        match spec {
            BlockSpec::Number(n) => BlockNumberOrTag::Number(n),
            BlockSpec::Latest => BlockNumberOrTag::Latest,
        }
    }
}

/// What to query: one named event over an inclusive block range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub event_name: String,
    pub from_block: u64,
    pub to_block: BlockSpec,
}

impl EventFilter {
    pub fn new(event_name: impl Into<String>, from_block: u64, to_block: BlockSpec) -> Self {
        Self {
            event_name: event_name.into(),
            from_block,
            to_block,
        }
    }

    /// Reject numeric ranges that end before they start. `latest` is left
    /// for the node to resolve.
    pub fn validate(&self) -> Result<(), FetchError> {
        match self.to_block {
            BlockSpec::Number(to) if to < self.from_block => Err(FetchError::InvalidRange {
                from: self.from_block,
                to,
            }),
            _ => Ok(()),
        }
    }
}

/// One decoded log matching the queried event.
///
/// Argument values stay typed; rendering them is the reporter's job.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub event: String,
    /// Decoded arguments in ABI input order.
    pub args: Vec<(String, DynSolValue)>,
    pub transaction_hash: B256,
    pub block_number: u64,
    pub log_index: Option<u64>,
}
