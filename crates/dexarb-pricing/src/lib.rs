pub mod error;
pub mod normalizer;
pub mod spread;

pub use error::PricingError;
pub use normalizer::{scale_reserve, PriceNormalizer};
pub use spread::{compare, SpreadCalculator};
