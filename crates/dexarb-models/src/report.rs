use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisory::{AdvisoryResult, AdvisorySource};
use crate::pool::PoolQuote;
use crate::signal::ArbitrageSignal;

/// The two quote sources compared in one evaluation. Spread is measured relative to `pool_b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotePair {
    pub pool_a: PoolQuote,
    pub pool_b: PoolQuote,
}

/// Full output of one arbitrage evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArbitrageReport {
    pub id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub pools: QuotePair,
    pub signal: ArbitrageSignal,
    /// Percent-formatted spread, e.g. `"0.50%"`.
    pub spread: String,
    pub advice: AdvisoryResult,
    pub advice_source: AdvisorySource,
}

/// Current quotes for both pools with their signal, without an advisory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricesReport {
    pub fetched_at: DateTime<Utc>,
    #[serde(flatten)]
    pub pools: QuotePair,
    pub signal: ArbitrageSignal,
    pub spread: String,
}
