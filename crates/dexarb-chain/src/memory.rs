use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use dexarb_models::pool::RawPoolState;

use crate::error::ChainError;
use crate::reader::PoolReader;

/// Pool reader over a fixed in-memory table, keyed by address
/// (case-insensitive). Unknown addresses fail with [`ChainError::UnknownPool`].
#[derive(Default)]
pub struct MemoryPoolReader {
    pools: RwLock<HashMap<String, RawPoolState>>,
}

impl MemoryPoolReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(self, state: RawPoolState) -> Self {
        self.insert(state);
        self
    }

    /// Insert or replace the state stored under `state.pool_address`.
    pub fn insert(&self, state: RawPoolState) {
        if let Ok(mut pools) = self.pools.write() {
            pools.insert(state.pool_address.to_lowercase(), state);
        }
    }

    pub fn remove(&self, address: &str) -> Option<RawPoolState> {
        self.pools.write().ok()?.remove(&address.to_lowercase())
    }
}

#[async_trait]
impl PoolReader for MemoryPoolReader {
    async fn fetch_pool(&self, address: &str) -> Result<RawPoolState, ChainError> {
        self.pools
            .read()
            .ok()
            .and_then(|pools| pools.get(&address.to_lowercase()).cloned())
            .ok_or_else(|| ChainError::UnknownPool(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexarb_models::pool::TokenInfo;

    fn state(address: &str, reserve0: u128) -> RawPoolState {
        RawPoolState {
            pool_address: address.to_string(),
            reserve0,
            reserve1: 1,
            token0: TokenInfo::new("USDC", 6),
            token1: TokenInfo::new("WETH", 18),
        }
    }

    #[tokio::test]
    async fn lookup_ignores_address_case() {
        let reader = MemoryPoolReader::new().with_pool(state("0xABCdef", 5));
        let found = reader.fetch_pool("0xabcDEF").await.unwrap();
        assert_eq!(found.reserve0, 5);
    }

    #[tokio::test]
    async fn insert_replaces() {
        let reader = MemoryPoolReader::new().with_pool(state("0xaa", 1));
        reader.insert(state("0xAA", 2));
        assert_eq!(reader.fetch_pool("0xaa").await.unwrap().reserve0, 2);
    }

    #[tokio::test]
    async fn unknown_pool() {
        let reader = MemoryPoolReader::new().with_pool(state("0xaa", 1));
        assert!(reader.remove("0xAA").is_some());
        let err = reader.fetch_pool("0xaa").await.unwrap_err();
        assert!(matches!(err, ChainError::UnknownPool(a) if a == "0xaa"));
    }
}
