//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

/// Supported blockchain networks
///
/// Serialized as the numeric chain id. New networks are additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
#[non_exhaustive]
pub enum ChainId {
    Ethereum,
    Polygon,
    Bsc,
    Arbitrum,
    Avalanche,
    Optimism,
    Fantom,
    Sonic,
}

impl ChainId {
    pub const ALL: [ChainId; 8] = [
        ChainId::Ethereum,
        ChainId::Polygon,
        ChainId::Bsc,
        ChainId::Arbitrum,
        ChainId::Avalanche,
        ChainId::Optimism,
        ChainId::Fantom,
        ChainId::Sonic,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::Polygon => 137,
            ChainId::Bsc => 56,
            ChainId::Arbitrum => 42161,
            ChainId::Avalanche => 43114,
            ChainId::Optimism => 10,
            ChainId::Fantom => 250,
            ChainId::Sonic => 64165,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ethereum",
            ChainId::Polygon => "polygon",
            ChainId::Bsc => "bsc",
            ChainId::Arbitrum => "arbitrum",
            ChainId::Avalanche => "avalanche",
            ChainId::Optimism => "optimism",
            ChainId::Fantom => "fantom",
            ChainId::Sonic => "sonic",
        }
    }

    /// Blockchain name as used by aggregator APIs (e.g. `ETH`, `POLYGON`)
    pub fn blockchain_name(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ETH",
            ChainId::Polygon => "POLYGON",
            ChainId::Bsc => "BSC",
            ChainId::Arbitrum => "ARBITRUM",
            ChainId::Avalanche => "AVALANCHE",
            ChainId::Optimism => "OPTIMISM",
            ChainId::Fantom => "FANTOM",
            ChainId::Sonic => "SONIC",
        }
    }
}

impl TryFrom<u64> for ChainId {
    type Error = CoreError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        ChainId::ALL
            .into_iter()
            .find(|chain| chain.chain_id() == id)
            .ok_or(CoreError::UnsupportedChain(id))
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> Self {
        chain.chain_id()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
