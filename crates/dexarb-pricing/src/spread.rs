use std::cmp::Ordering;

use dexarb_models::pool::PoolQuote;
use dexarb_models::signal::ArbitrageSignal;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::PricingError;

/// Default opportunity threshold, in percent.
pub const DEFAULT_THRESHOLD_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Compares two pool quotes with a fixed opportunity threshold.
#[derive(Debug, Clone, Copy)]
pub struct SpreadCalculator {
    threshold_percent: Decimal,
}

impl Default for SpreadCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_PERCENT)
    }
}

impl SpreadCalculator {
    pub fn new(threshold_percent: Decimal) -> Self {
        Self { threshold_percent }
    }

    pub fn threshold_percent(&self) -> Decimal {
        self.threshold_percent
    }

    pub fn compare(&self, a: &PoolQuote, b: &PoolQuote) -> Result<ArbitrageSignal, PricingError> {
        compare(a, b, self.threshold_percent)
    }
}

/// Spread of `a` relative to `b`: `((a - b) / b) * 100`.
///
/// `b` is always the denominator, so swapping the arguments flips the sign and
/// also changes the magnitude. Equal prices never signal an opportunity.
pub fn compare(
    a: &PoolQuote,
    b: &PoolQuote,
    threshold_percent: Decimal,
) -> Result<ArbitrageSignal, PricingError> {
    if b.price.is_zero() {
        return Err(PricingError::DivisionByZero {
            venue: b.venue.clone(),
            symbol: b.base_token.symbol.clone(),
        });
    }

    let spread_percent = (a.price - b.price)
        .checked_div(b.price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| PricingError::Overflow(format!("spread of {} over {}", a.price, b.price)))?;

    let (buy_side, sell_side) = match a.price.cmp(&b.price) {
        Ordering::Greater => (Some(b.venue.clone()), Some(a.venue.clone())),
        Ordering::Less => (Some(a.venue.clone()), Some(b.venue.clone())),
        Ordering::Equal => (None, None),
    };

    let has_opportunity = buy_side.is_some() && spread_percent.abs() > threshold_percent;

    debug!(
        a = %a.venue,
        b = %b.venue,
        %spread_percent,
        has_opportunity,
        "Compared pools"
    );

    Ok(ArbitrageSignal {
        spread_percent,
        buy_side,
        sell_side,
        has_opportunity,
        threshold_percent,
    })
}
