use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An ERC-20 token as reported by the token contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: String,
    /// Power-of-ten scaling between a raw balance and human units (USDC = 6, WETH = 18).
    pub decimals: u32,
}

impl TokenInfo {
    pub fn new(symbol: &str, decimals: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            decimals,
        }
    }
}

/// Pool state exactly as read from the chain, in the pair contract's token0/token1 order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPoolState {
    pub pool_address: String,
    #[serde(with = "raw_amount")]
    pub reserve0: u128,
    #[serde(with = "raw_amount")]
    pub reserve1: u128,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
}

/// One liquidity pool's normalized state at query time.
///
/// Built fresh per evaluation from a [`RawPoolState`] snapshot and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolQuote {
    /// Human label for the venue (e.g. "Uniswap").
    pub venue: String,
    pub pool_address: String,
    pub base_token: TokenInfo,
    pub quote_token: TokenInfo,
    /// Raw integer balances ordered (base, quote). Serialized as decimal strings
    /// so JavaScript clients do not lose precision.
    #[serde(with = "raw_amount_pair")]
    pub reserves: [u128; 2],
    /// Quote units per one base unit.
    pub price: Decimal,
}

impl PoolQuote {
    /// "WETH/USDC" style label, base first.
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.base_token.symbol, self.quote_token.symbol)
    }
}

pub(crate) mod raw_amount {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}

pub(crate) mod raw_amount_pair {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &[u128; 2], serializer: S) -> Result<S::Ok, S::Error> {
        [value[0].to_string(), value[1].to_string()].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u128; 2], D::Error> {
        let [a, b] = <[String; 2]>::deserialize(deserializer)?;
        let parse = |s: &str| s.trim().parse::<u128>().map_err(serde::de::Error::custom);
        Ok([parse(&a)?, parse(&b)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_quote() -> PoolQuote {
        PoolQuote {
            venue: "Uniswap".to_string(),
            pool_address: "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc".to_string(),
            base_token: TokenInfo::new("WETH", 18),
            quote_token: TokenInfo::new("USDC", 6),
            reserves: [500_000_000_000_000_000, 1_000_000_000],
            price: dec!(2000),
        }
    }

    #[test]
    fn reserves_serialize_as_strings() {
        let json = serde_json::to_value(sample_quote()).unwrap();
        assert_eq!(
            json["reserves"],
            serde_json::json!(["500000000000000000", "1000000000"])
        );
        assert_eq!(json["price"], "2000");
    }

    #[test]
    fn roundtrip_pool_quote() {
        let quote = sample_quote();
        let json = serde_json::to_string(&quote).unwrap();
        let back: PoolQuote = serde_json::from_str(&json).unwrap();
        assert_eq!(quote, back);
    }

    #[test]
    fn raw_state_accepts_values_beyond_u64() {
        // uint112 reserves routinely exceed u64::MAX for 18-decimal tokens
        let json = r#"{
            "pool_address": "0xpool",
            "reserve0": "5192296858534827628530496329220095",
            "reserve1": "1",
            "token0": {"symbol": "WETH", "decimals": 18},
            "token1": {"symbol": "USDC", "decimals": 6}
        }"#;
        let raw: RawPoolState = serde_json::from_str(json).unwrap();
        assert_eq!(raw.reserve0, (1u128 << 112) - 1);
    }

    #[test]
    fn pair_label_is_base_first() {
        assert_eq!(sample_quote().pair_label(), "WETH/USDC");
    }
}
