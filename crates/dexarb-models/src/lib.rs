pub mod advisory;
pub mod config;
pub mod pool;
pub mod report;
pub mod signal;

pub use advisory::{
    AdvisoryOutcome, AdvisoryResult, AdvisorySource, AttemptFailure, PromptKind, ADVISORY_FIELDS,
};
pub use config::{
    AdvisoryConfig, DexArbConfig, GeneratorBackend, GeneratorConfig, PairsConfig, PoolConfig,
    PoolsConfig, RpcConfig, ServerConfig, SignalConfig,
};
pub use pool::{PoolQuote, RawPoolState, TokenInfo};
pub use report::{ArbitrageReport, PricesReport, QuotePair};
pub use signal::ArbitrageSignal;
