use serde::{Deserialize, Serialize};

/// Keys of an [`AdvisoryResult`] as they appear on the wire, in validation order.
pub const ADVISORY_FIELDS: [&str; 4] = ["decision", "reason", "recommendation", "riskAnalysis"];

/// The structured decision returned for every evaluation.
///
/// Produced either by a validated generator reply or by the fallback advisor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryResult {
    pub decision: String,
    pub reason: String,
    pub recommendation: String,
    pub risk_analysis: String,
}

/// Which prompt template an attempt used, most information-dense first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Prices, spread, direction, optional question.
    Full,
    /// Spread only.
    Reduced,
    /// Near-final JSON the generator only has to echo back.
    Prefilled,
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PromptKind::Full => "full",
            PromptKind::Reduced => "reduced",
            PromptKind::Prefilled => "prefilled",
        };
        f.write_str(name)
    }
}

/// Where an [`AdvisoryResult`] came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisorySource {
    /// Accepted from the generator on this attempt (1-based).
    Generator { attempt: usize },
    /// Every attempt failed; deterministic fallback.
    Fallback,
}

/// Diagnostic record of one failed attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptFailure {
    pub attempt: usize,
    pub prompt: PromptKind,
    pub reason: String,
}

/// Result of one advisory run together with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdvisoryOutcome {
    pub result: AdvisoryResult,
    pub source: AdvisorySource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AttemptFailure>,
}

impl AdvisoryOutcome {
    pub fn is_fallback(&self) -> bool {
        self.source == AdvisorySource::Fallback
    }
}
