use std::sync::Arc;
use std::time::{Duration, Instant};

use dexarb_models::advisory::{AdvisoryOutcome, AdvisoryResult, AdvisorySource, AttemptFailure};
use dexarb_models::config::{AdvisoryConfig, SignalConfig};
use dexarb_models::pool::PoolQuote;
use dexarb_models::signal::ArbitrageSignal;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, GeneratorError};
use crate::fallback::FallbackAdvisor;
use crate::generator::TextGenerator;
use crate::prompts::{PromptAttempt, PromptSeries};
use crate::sanitizer::sanitize;
use crate::validator::validate;

/// Progress of one advisory run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryState {
    Pending,
    /// Waiting on attempt `n` (1-based).
    Attempting(usize),
    Succeeded,
    Exhausted,
}

impl std::fmt::Display for AdvisoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvisoryState::Pending => f.write_str("pending"),
            AdvisoryState::Attempting(n) => write!(f, "attempting({n})"),
            AdvisoryState::Succeeded => f.write_str("succeeded"),
            AdvisoryState::Exhausted => f.write_str("exhausted"),
        }
    }
}

/// Runs the prompt series against a generator, one attempt at a time, and
/// falls back to the deterministic advisor when every attempt fails.
///
/// `advise` never returns an error: the worst case is the fallback.
pub struct AdvisoryOrchestrator {
    generator: Arc<dyn TextGenerator>,
    series: PromptSeries,
    attempt_timeout: Duration,
    fallback: FallbackAdvisor,
}

impl AdvisoryOrchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        series: PromptSeries,
        attempt_timeout: Duration,
        fallback: FallbackAdvisor,
    ) -> Self {
        Self {
            generator,
            series,
            attempt_timeout,
            fallback,
        }
    }

    pub fn from_config(
        generator: Arc<dyn TextGenerator>,
        advisory: &AdvisoryConfig,
        signal: &SignalConfig,
    ) -> Self {
        Self::new(
            generator,
            PromptSeries::new(advisory.prefilled_attempt),
            Duration::from_secs(advisory.attempt_timeout_seconds),
            FallbackAdvisor::new(signal.fallback_threshold_percent),
        )
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Produce an advisory for `signal`. Attempts run strictly in order and
    /// the first reply that survives sanitize, parse and validate wins.
    pub async fn advise(
        &self,
        signal: &ArbitrageSignal,
        a: &PoolQuote,
        b: &PoolQuote,
        question: Option<&str>,
    ) -> AdvisoryOutcome {
        let start = Instant::now();
        let attempts = self.series.build(signal, a, b, question);
        let mut failures = Vec::new();
        let mut state = AdvisoryState::Pending;
        debug!(
            generator = self.generator.name(),
            attempts = attempts.len(),
            state = %state,
            "Advisory started"
        );

        for (index, attempt) in attempts.iter().enumerate() {
            let number = index + 1;
            state = AdvisoryState::Attempting(number);
            debug!(state = %state, prompt = %attempt.kind, "Advisory attempt");

            match self.run_attempt(attempt).await {
                Ok(result) => {
                    state = AdvisoryState::Succeeded;
                    info!(
                        state = %state,
                        attempt = number,
                        prompt = %attempt.kind,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Advisory accepted from generator"
                    );
                    return AdvisoryOutcome {
                        result,
                        source: AdvisorySource::Generator { attempt: number },
                        failures,
                    };
                }
                Err(e) => {
                    warn!(attempt = number, prompt = %attempt.kind, error = %e, "Advisory attempt failed");
                    failures.push(AttemptFailure {
                        attempt: number,
                        prompt: attempt.kind,
                        reason: e.to_string(),
                    });
                }
            }
        }

        state = AdvisoryState::Exhausted;
        warn!(
            state = %state,
            failed_attempts = failures.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "All advisory attempts failed, using fallback"
        );
        AdvisoryOutcome {
            result: self.fallback.advise(signal),
            source: AdvisorySource::Fallback,
            failures,
        }
    }

    async fn run_attempt(&self, attempt: &PromptAttempt) -> Result<AdvisoryResult, ExtractionError> {
        let raw = tokio::time::timeout(self.attempt_timeout, self.generator.generate(&attempt.text))
            .await
            .map_err(|_| GeneratorError::Timeout(self.attempt_timeout.as_secs()))??;

        let cleaned = sanitize(&raw);
        let value: serde_json::Value = serde_json::from_str(&cleaned)?;
        Ok(validate(&value)?)
    }
}
