use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Unsupported pair {symbol0}/{symbol1}: need one stable and one volatile token")]
    UnsupportedPair { symbol0: String, symbol1: String },

    #[error("Division by zero: {venue} base reserve ({symbol}) is empty")]
    DivisionByZero { venue: String, symbol: String },

    #[error("Empty reserve: {venue} quote reserve ({symbol}) is empty")]
    EmptyReserve { venue: String, symbol: String },

    #[error("Reserve {raw} with {decimals} decimals does not fit a 96-bit mantissa")]
    ReserveOverflow { raw: u128, decimals: u32 },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}
