use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use alloy_sol_types::SolCall;
use async_trait::async_trait;
use dexarb_models::pool::{RawPoolState, TokenInfo};
use serde::Deserialize;
use tracing::debug;

use crate::abi::{self, IERC20Metadata, IUniswapV2Pair};
use crate::error::ChainError;

/// Source of raw pool state. Mockable for testing.
#[async_trait]
pub trait PoolReader: Send + Sync {
    async fn fetch_pool(&self, address: &str) -> Result<RawPoolState, ChainError>;
}

/// Reads Uniswap V2 style pair contracts with plain `eth_call` requests.
pub struct JsonRpcPoolReader {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl JsonRpcPoolReader {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            timeout: Duration::from_secs(10),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn call_payload(&self, to: &str, data: &str) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Execute one read-only call and return the decoded result bytes.
    async fn eth_call<C: SolCall>(&self, to: &str, call: C) -> Result<Vec<u8>, ChainError> {
        let payload = self.call_payload(to, &abi::calldata(&call));

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        if let Some(err) = response.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = response.result.ok_or(ChainError::EmptyResult)?;
        let bytes = abi::decode_hex(&result)?;
        if bytes.is_empty() {
            // Calls to an address without code return "0x".
            return Err(ChainError::EmptyResult);
        }
        Ok(bytes)
    }

    fn transport_error(&self, e: reqwest::Error) -> ChainError {
        if e.is_timeout() {
            ChainError::Timeout(self.timeout.as_secs())
        } else {
            ChainError::Transport(e.to_string())
        }
    }

    async fn token_info(&self, token: &str) -> Result<TokenInfo, ChainError> {
        let (decimals, symbol) = tokio::try_join!(
            self.eth_call(token, IERC20Metadata::decimalsCall {}),
            self.eth_call(token, IERC20Metadata::symbolCall {})
        )?;
        Ok(TokenInfo {
            symbol: abi::decode_symbol(&symbol)?,
            decimals: abi::decode_decimals(&decimals)?,
        })
    }
}

#[async_trait]
impl PoolReader for JsonRpcPoolReader {
    async fn fetch_pool(&self, address: &str) -> Result<RawPoolState, ChainError> {
        let start = Instant::now();

        let (reserves, token0, token1) = tokio::try_join!(
            self.eth_call(address, IUniswapV2Pair::getReservesCall {}),
            self.eth_call(address, IUniswapV2Pair::token0Call {}),
            self.eth_call(address, IUniswapV2Pair::token1Call {})
        )?;
        let (reserve0, reserve1) = abi::decode_reserves(&reserves)?;
        let token0 = abi::decode_address(&token0)?;
        let token1 = abi::decode_address(&token1)?;

        let (info0, info1) = tokio::try_join!(self.token_info(&token0), self.token_info(&token1))?;

        debug!(
            pool = address,
            symbol0 = %info0.symbol,
            symbol1 = %info1.symbol,
            reserve0 = %reserve0,
            reserve1 = %reserve1,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched pool state"
        );

        Ok(RawPoolState {
            pool_address: address.to_string(),
            reserve0,
            reserve1,
            token0: info0,
            token1: info1,
        })
    }
}
