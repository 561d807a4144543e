use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places used when presenting a spread.
pub const SPREAD_DECIMAL_PLACES: u32 = 2;

/// Comparison of two pool prices for the same pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArbitrageSignal {
    /// `((price_a - price_b) / price_b) * 100` at full precision.
    /// Positive means pool A is priced above pool B.
    pub spread_percent: Decimal,
    /// Venue of the cheaper pool. `None` when the prices are equal.
    pub buy_side: Option<String>,
    /// Venue of the more expensive pool. `None` when the prices are equal.
    pub sell_side: Option<String>,
    /// `|spread_percent| > threshold_percent`, strict.
    pub has_opportunity: bool,
    pub threshold_percent: Decimal,
}

impl ArbitrageSignal {
    /// Spread rounded for presentation. Threshold checks never use this value.
    pub fn spread_rounded(&self) -> Decimal {
        self.spread_percent
            .round_dp_with_strategy(SPREAD_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Percent-formatted spread, e.g. `"0.50%"`.
    pub fn spread_display(&self) -> String {
        format!("{:.2}%", self.spread_rounded())
    }

    /// `(buy, sell)` venues when the prices differ.
    pub fn direction(&self) -> Option<(&str, &str)> {
        match (&self.buy_side, &self.sell_side) {
            (Some(buy), Some(sell)) => Some((buy.as_str(), sell.as_str())),
            _ => None,
        }
    }
}
