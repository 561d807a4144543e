//! dexarb - two-pool DEX arbitrage signals with generated advisories.
//!
//! Reads two Uniswap V2 style pools for the same pair, normalizes their
//! reserves into prices, measures the spread and asks a text generator for a
//! structured recommendation, falling back to a deterministic one.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use dexarb::models::config::DexArbConfig;
//!
//! # async fn run() -> Result<(), dexarb::ServiceError> {
//! let service = dexarb::build_service(&DexArbConfig::default())?;
//! let report = service.arbitrage(Some("Is the spread worth the gas?")).await?;
//! println!("{} {}", report.spread, report.advice.decision);
//! # Ok(())
//! # }
//! ```

pub use dexarb_agents as agents;
pub use dexarb_chain as chain;
pub use dexarb_models as models;
pub use dexarb_pricing as pricing;

pub mod error;
pub mod server;
pub mod service;

pub use error::ServiceError;
pub use server::{router, serve};
pub use service::{build_generator, build_service, ArbService};
