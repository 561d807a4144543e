//! Scripted generators and fixtures for exercising the advisory pipeline
//! without a network or a CLI.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dexarb_models::pool::{PoolQuote, TokenInfo};
use dexarb_models::signal::ArbitrageSignal;
use rust_decimal::Decimal;

use crate::error::GeneratorError;
use crate::generator::TextGenerator;

/// A well-formed advisory reply.
pub const VALID_REPLY: &str = r#"{"decision": "Execute Arbitrage", "reason": "Spread covers fees", "recommendation": "Buy low, sell high", "riskAnalysis": "Gas and slippage"}"#;

/// Replays a fixed list of replies in order, one per call, and records the
/// prompts it was given. Calls past the end of the script fail.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GeneratorError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call returns the same text.
    pub fn always(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string()); 8])
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| Err(GeneratorError::Unavailable("script exhausted".to_string())))
    }
}

/// Sleeps before answering; used to trip per-attempt timeouts.
pub struct SlowGenerator {
    pub delay: Duration,
    pub reply: String,
}

impl SlowGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            reply: VALID_REPLY.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    fn name(&self) -> &str {
        "slow"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

/// A WETH/USDC quote at `price` on `venue`.
pub fn quote(venue: &str, price: Decimal) -> PoolQuote {
    PoolQuote {
        venue: venue.to_string(),
        pool_address: format!("0x{}", venue.to_lowercase()),
        base_token: TokenInfo::new("WETH", 18),
        quote_token: TokenInfo::new("USDC", 6),
        reserves: [1_000_000_000_000_000_000, 2_000_000_000],
        price,
    }
}

/// A signal buying on Sushiswap and selling on Uniswap at the 0.5% threshold.
pub fn signal(spread_percent: Decimal) -> ArbitrageSignal {
    let threshold_percent = Decimal::new(5, 1);
    ArbitrageSignal {
        spread_percent,
        buy_side: Some("Sushiswap".to_string()),
        sell_side: Some("Uniswap".to_string()),
        has_opportunity: spread_percent.abs() > threshold_percent,
        threshold_percent,
    }
}
