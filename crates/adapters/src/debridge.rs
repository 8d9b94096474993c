//! deBridge adapter
//!
//! deBridge has no quote endpoint in this setup. The adapter encodes the
//! `send` arguments for the deBridge gate locally and returns them as an
//! encoded route. The only cost it knows is the configured flat protocol
//! fee; without one it reports no quote rather than a free transfer.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolType};
use async_trait::async_trait;

use bridge_core::{
    parse_amount, AdapterError, AdapterResult, BridgeAdapter, GasCost, ProviderConfig, Quote,
    RoutePayload, RouteRequest,
};

sol! {
    struct SubmissionAutoParamsTo {
        uint256 executionFee;
        uint256 flags;
        bytes fallbackAddress;
        bytes data;
    }

    struct SendArgs {
        address tokenAddress;
        uint256 amount;
        uint256 chainIdTo;
        bytes receiver;
        SubmissionAutoParamsTo autoParams;
    }
}

#[derive(Debug)]
pub struct DeBridgeAdapter {
    config: ProviderConfig,
    fixed_fee: Option<U256>,
}

impl DeBridgeAdapter {
    pub fn new(config: ProviderConfig) -> AdapterResult<Self> {
        let fixed_fee = config
            .fixed_fee
            .as_deref()
            .map(parse_amount)
            .transpose()
            .map_err(|e| AdapterError::InvalidResponse {
                provider: config.id.clone(),
                message: format!("fixed_fee: {e}"),
            })?;

        Ok(Self { config, fixed_fee })
    }

    pub fn fixed_fee(&self) -> Option<U256> {
        self.fixed_fee
    }
}

/// ABI-encode the gate `send` arguments
///
/// Zero execution fee, no flags, and the receiver doubles as fallback.
pub fn encode_send_args(request: &RouteRequest) -> Bytes {
    let receiver = Bytes::copy_from_slice(request.receiver.as_slice());
    let args = SendArgs {
        tokenAddress: request.source_token,
        amount: request.amount,
        chainIdTo: U256::from(request.dest_chain.chain_id()),
        receiver: receiver.clone(),
        autoParams: SubmissionAutoParamsTo {
            executionFee: U256::ZERO,
            flags: U256::ZERO,
            fallbackAddress: receiver,
            data: Bytes::new(),
        },
    };

    Bytes::from(<SendArgs as SolType>::abi_encode(&args))
}

#[async_trait]
impl BridgeAdapter for DeBridgeAdapter {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch_quote(&self, request: &RouteRequest) -> AdapterResult<Quote> {
        let Some(fee) = self.fixed_fee else {
            return Err(AdapterError::Unsupported {
                provider: self.config.id.clone(),
                operation: "quote without a configured fixed_fee".to_string(),
            });
        };
        if request.receiver.is_zero() {
            return Err(AdapterError::NoRoute {
                provider: self.config.id.clone(),
            });
        }

        let payload = encode_send_args(request);
        Ok(Quote::new(&self.config.id, RoutePayload::Encoded(payload), request)
            .with_fee(fee)
            .with_gas(GasCost::Gwei(0))
            .with_estimated_time(self.config.estimated_time_seconds))
    }

    /// Encoding is local, so there is nothing remote to check
    async fn health_check(&self) -> bool {
        true
    }
}
