use dexarb_models::config::PairsConfig;
use dexarb_models::pool::{PoolQuote, RawPoolState, TokenInfo};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::PricingError;

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;
/// Largest scale a `Decimal` can hold.
const MAX_SCALE: u32 = 28;

/// Convert a raw integer balance to human units without going through floating point.
///
/// The value is `raw / 10^decimals`, represented exactly when it fits. Balances
/// wider than 96 bits (or scales beyond 28) shed their least significant digits
/// one at a time, so at most the 29th significant digit onward is lost.
pub fn scale_reserve(raw: u128, decimals: u32) -> Result<Decimal, PricingError> {
    let mut mantissa = raw;
    let mut scale = decimals;

    while scale > MAX_SCALE || mantissa > MAX_MANTISSA {
        if scale == 0 {
            return Err(PricingError::ReserveOverflow { raw, decimals });
        }
        mantissa /= 10;
        scale -= 1;
    }

    let mantissa = i128::try_from(mantissa)
        .map_err(|_| PricingError::ReserveOverflow { raw, decimals })?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| PricingError::ReserveOverflow { raw, decimals })
}

/// Turns raw pool snapshots into [`PoolQuote`]s priced in quote-per-base.
///
/// Orientation comes from symbol lists: the stable-asset side of a pair is
/// always the quote, the volatile side the base.
#[derive(Debug, Clone)]
pub struct PriceNormalizer {
    stable_symbols: Vec<String>,
    volatile_symbols: Vec<String>,
}

impl Default for PriceNormalizer {
    fn default() -> Self {
        Self::new(&PairsConfig::default())
    }
}

impl PriceNormalizer {
    pub fn new(pairs: &PairsConfig) -> Self {
        Self {
            stable_symbols: pairs.stable_symbols.clone(),
            volatile_symbols: pairs.volatile_symbols.clone(),
        }
    }

    fn is_stable(&self, symbol: &str) -> bool {
        self.stable_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }

    fn is_volatile(&self, symbol: &str) -> bool {
        self.volatile_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(symbol))
    }

    /// Normalize one pool snapshot.
    pub fn normalize(&self, venue: &str, raw: &RawPoolState) -> Result<PoolQuote, PricingError> {
        let s0 = raw.token0.symbol.as_str();
        let s1 = raw.token1.symbol.as_str();

        // (base, base_reserve, quote, quote_reserve)
        let (base, base_raw, quote, quote_raw): (&TokenInfo, u128, &TokenInfo, u128) =
            if self.is_volatile(s0) && self.is_stable(s1) {
                (&raw.token0, raw.reserve0, &raw.token1, raw.reserve1)
            } else if self.is_stable(s0) && self.is_volatile(s1) {
                (&raw.token1, raw.reserve1, &raw.token0, raw.reserve0)
            } else {
                return Err(PricingError::UnsupportedPair {
                    symbol0: s0.to_string(),
                    symbol1: s1.to_string(),
                });
            };

        let base_scaled = scale_reserve(base_raw, base.decimals)?;
        let quote_scaled = scale_reserve(quote_raw, quote.decimals)?;

        if base_scaled.is_zero() {
            return Err(PricingError::DivisionByZero {
                venue: venue.to_string(),
                symbol: base.symbol.clone(),
            });
        }
        if quote_scaled.is_zero() {
            return Err(PricingError::EmptyReserve {
                venue: venue.to_string(),
                symbol: quote.symbol.clone(),
            });
        }

        let price = quote_scaled.checked_div(base_scaled).ok_or_else(|| {
            PricingError::Overflow(format!("{venue}: {quote_scaled} / {base_scaled}"))
        })?;

        debug!(
            venue,
            pool = %raw.pool_address,
            base = %base.symbol,
            quote = %quote.symbol,
            %price,
            "Normalized pool"
        );

        Ok(PoolQuote {
            venue: venue.to_string(),
            pool_address: raw.pool_address.clone(),
            base_token: base.clone(),
            quote_token: quote.clone(),
            reserves: [base_raw, quote_raw],
            price,
        })
    }
}
