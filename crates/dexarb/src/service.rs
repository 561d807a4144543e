use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dexarb_agents::{
    AdvisoryOrchestrator, ChatCompletionsGenerator, ClaudeCliGenerator, DisabledGenerator,
    TextGenerator,
};
use dexarb_chain::{JsonRpcPoolReader, PoolReader};
use dexarb_models::advisory::AdvisoryOutcome;
use dexarb_models::config::{DexArbConfig, GeneratorBackend, GeneratorConfig, PoolConfig, PoolsConfig};
use dexarb_models::pool::PoolQuote;
use dexarb_models::report::{ArbitrageReport, PricesReport, QuotePair};
use dexarb_models::signal::ArbitrageSignal;
use dexarb_pricing::{PriceNormalizer, SpreadCalculator};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ServiceError;

/// Reads both pools, prices them and produces signals and advisories.
pub struct ArbService {
    reader: Arc<dyn PoolReader>,
    normalizer: PriceNormalizer,
    calculator: SpreadCalculator,
    pools: PoolsConfig,
    advisor: AdvisoryOrchestrator,
}

impl ArbService {
    pub fn new(
        reader: Arc<dyn PoolReader>,
        normalizer: PriceNormalizer,
        calculator: SpreadCalculator,
        pools: PoolsConfig,
        advisor: AdvisoryOrchestrator,
    ) -> Self {
        Self {
            reader,
            normalizer,
            calculator,
            pools,
            advisor,
        }
    }

    /// Wire a service from configuration around the given reader and generator.
    pub fn from_config(
        config: &DexArbConfig,
        reader: Arc<dyn PoolReader>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self::new(
            reader,
            PriceNormalizer::new(&config.pairs),
            SpreadCalculator::new(config.signal.opportunity_threshold_percent),
            config.pools.clone(),
            AdvisoryOrchestrator::from_config(generator, &config.advisory, &config.signal),
        )
    }

    pub fn generator_name(&self) -> &str {
        self.advisor.generator_name()
    }

    async fn quote(&self, pool: &PoolConfig) -> Result<PoolQuote, ServiceError> {
        let raw = self
            .reader
            .fetch_pool(&pool.address)
            .await
            .map_err(|source| ServiceError::Chain {
                venue: pool.venue.clone(),
                address: pool.address.clone(),
                source,
            })?;
        Ok(self.normalizer.normalize(&pool.venue, &raw)?)
    }

    /// Fetch both pools concurrently and compare them.
    async fn market(&self) -> Result<(QuotePair, ArbitrageSignal), ServiceError> {
        let (pool_a, pool_b) =
            tokio::try_join!(self.quote(&self.pools.a), self.quote(&self.pools.b))?;
        let signal = self.calculator.compare(&pool_a, &pool_b)?;
        Ok((QuotePair { pool_a, pool_b }, signal))
    }

    /// Current quotes and signal, without an advisory.
    pub async fn prices(&self) -> Result<PricesReport, ServiceError> {
        let (pools, signal) = self.market().await?;
        info!(
            pool_a = %pools.pool_a.price,
            pool_b = %pools.pool_b.price,
            spread = %signal.spread_display(),
            "Prices fetched"
        );
        Ok(PricesReport {
            fetched_at: Utc::now(),
            pools,
            spread: signal.spread_display(),
            signal,
        })
    }

    /// One full evaluation: quotes, signal and advisory.
    ///
    /// Fails only on the price side; the advisory always resolves.
    pub async fn arbitrage(&self, question: Option<&str>) -> Result<ArbitrageReport, ServiceError> {
        let start = Instant::now();
        let (pools, signal) = self.market().await?;
        let outcome = self
            .advisor
            .advise(&signal, &pools.pool_a, &pools.pool_b, question)
            .await;

        let report = ArbitrageReport {
            id: Uuid::new_v4(),
            evaluated_at: Utc::now(),
            spread: signal.spread_display(),
            pools,
            signal,
            advice: outcome.result,
            advice_source: outcome.source,
        };
        info!(
            id = %report.id,
            spread = %report.spread,
            opportunity = report.signal.has_opportunity,
            source = ?report.advice_source,
            failed_attempts = outcome.failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Arbitrage evaluated"
        );
        Ok(report)
    }

    /// Answer a free-form question about the market.
    ///
    /// When `context` carries quotes the signal is computed from them;
    /// otherwise fresh quotes are fetched first. Context prices must be positive.
    pub async fn ask(
        &self,
        question: &str,
        context: Option<&QuotePair>,
    ) -> Result<AdvisoryOutcome, ServiceError> {
        let (pools, signal) = match context {
            Some(pools) => {
                for quote in [&pools.pool_a, &pools.pool_b] {
                    if quote.price <= Decimal::ZERO {
                        return Err(ServiceError::InvalidContext(format!(
                            "{} price must be positive, got {}",
                            quote.venue, quote.price
                        )));
                    }
                }
                let signal = self
                    .calculator
                    .compare(&pools.pool_a, &pools.pool_b)
                    .map_err(|e| ServiceError::InvalidContext(e.to_string()))?;
                (pools.clone(), signal)
            }
            None => self.market().await?,
        };

        Ok(self
            .advisor
            .advise(&signal, &pools.pool_a, &pools.pool_b, Some(question))
            .await)
    }
}

/// Pick the generator backend named in configuration.
///
/// A chat-completions backend without an API key in the environment degrades
/// to [`DisabledGenerator`], so every advisory comes from the fallback.
pub fn build_generator(config: &GeneratorConfig, http: reqwest::Client) -> Arc<dyn TextGenerator> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    match config.backend {
        GeneratorBackend::ChatCompletions => {
            match std::env::var(&config.api_key_env).ok().filter(|k| !k.trim().is_empty()) {
                Some(api_key) => Arc::new(
                    ChatCompletionsGenerator::new(
                        http,
                        config.endpoint.clone(),
                        api_key,
                        config.model.clone(),
                    )
                    .with_sampling(config.temperature, config.max_tokens)
                    .with_timeout(timeout),
                ),
                None => {
                    warn!(
                        env = %config.api_key_env,
                        "API key not set, advisories will use the fallback"
                    );
                    Arc::new(DisabledGenerator::new(format!(
                        "{} is not set",
                        config.api_key_env
                    )))
                }
            }
        }
        GeneratorBackend::ClaudeCli => {
            Arc::new(ClaudeCliGenerator::new(config.model.clone(), timeout))
        }
        GeneratorBackend::Disabled => {
            Arc::new(DisabledGenerator::new("generator disabled in configuration"))
        }
    }
}

/// Build an [`ArbService`] backed by the JSON-RPC reader and the configured generator.
pub fn build_service(config: &DexArbConfig) -> Result<ArbService, ServiceError> {
    let http = reqwest::Client::builder()
        .build()
        .map_err(|e| ServiceError::Setup(format!("HTTP client: {e}")))?;

    let reader = JsonRpcPoolReader::new(http.clone(), config.rpc.url.clone())
        .with_timeout(Duration::from_secs(config.rpc.timeout_seconds));
    let generator = build_generator(&config.generator, http);

    info!(
        rpc = %config.rpc.url,
        pool_a = %config.pools.a.venue,
        pool_b = %config.pools.b.venue,
        generator = generator.name(),
        "Service configured"
    );

    Ok(ArbService::from_config(config, Arc::new(reader), generator))
}
