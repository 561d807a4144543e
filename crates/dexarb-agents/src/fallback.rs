use dexarb_models::advisory::AdvisoryResult;
use dexarb_models::signal::ArbitrageSignal;
use rust_decimal::Decimal;

/// Spread (percent) above which the fallback recommends trading.
pub const DEFAULT_FALLBACK_THRESHOLD_PERCENT: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Deterministic advisor used when every generator attempt fails.
#[derive(Debug, Clone, Copy)]
pub struct FallbackAdvisor {
    threshold_percent: Decimal,
}

impl Default for FallbackAdvisor {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_THRESHOLD_PERCENT)
    }
}

impl FallbackAdvisor {
    pub fn new(threshold_percent: Decimal) -> Self {
        Self { threshold_percent }
    }

    pub fn threshold_percent(&self) -> Decimal {
        self.threshold_percent
    }

    /// Always produces a complete advisory from the signal alone.
    pub fn advise(&self, signal: &ArbitrageSignal) -> AdvisoryResult {
        let spread = signal.spread_display();

        if signal.spread_percent.abs() <= self.threshold_percent {
            return AdvisoryResult {
                decision: "No Trade Recommended".to_string(),
                reason: format!(
                    "Spread of {spread} is insufficient for profitable arbitrage after fees"
                ),
                recommendation: "Monitor for higher spreads above 1% before considering trades"
                    .to_string(),
                risk_analysis:
                    "No trading risk as position not recommended. Continue monitoring.".to_string(),
            };
        }

        let buy = signal.buy_side.as_deref().unwrap_or("the cheaper pool");
        let sell = signal.sell_side.as_deref().unwrap_or("the more expensive pool");
        AdvisoryResult {
            decision: format!("Execute Arbitrage: Buy on {buy}, Sell on {sell}"),
            reason: format!("Profitable spread of {spread} detected between exchanges"),
            recommendation: format!(
                "Buy on {buy} at the lower price and immediately sell on {sell}. \
                 Account for 0.6% total fees and gas costs."
            ),
            risk_analysis: "Medium risk due to price volatility, network congestion and slippage. \
                            Potential profit reduced by fees and gas costs."
                .to_string(),
        }
    }
}

/// [`FallbackAdvisor::advise`] with the default threshold.
pub fn fallback(signal: &ArbitrageSignal) -> AdvisoryResult {
    FallbackAdvisor::default().advise(signal)
}
