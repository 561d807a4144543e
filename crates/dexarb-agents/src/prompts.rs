use dexarb_models::advisory::{AdvisoryResult, PromptKind};
use dexarb_models::pool::PoolQuote;
use dexarb_models::signal::ArbitrageSignal;

/// System prompt for backends that accept one.
pub const SYSTEM_PROMPT: &str = "You are a DEX arbitrage analyst. You reply with a single flat JSON \
     object and nothing else.";

/// The four-field template every attempt asks the generator to fill.
const SCHEMA_TEMPLATE: &str = r#"{"decision": "your decision here", "reason": "your reason here", "recommendation": "your recommendation here", "riskAnalysis": "your risk analysis here"}"#;

/// Formatting constraints repeated at the end of every attempt.
const FORMAT_RULES: &str = "Output ONLY the JSON object. No prose, no markdown, no comments. \
     Exactly four fields: decision, reason, recommendation, riskAnalysis. \
     Every value is a plain string. No nested objects or arrays.";

/// One rendered prompt of the attempt series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAttempt {
    pub kind: PromptKind,
    pub text: String,
}

/// Builds the ordered prompt series, most information-dense first.
#[derive(Debug, Clone, Copy)]
pub struct PromptSeries {
    /// Append the pre-filled last-resort attempt.
    pub prefilled: bool,
}

impl Default for PromptSeries {
    fn default() -> Self {
        Self { prefilled: true }
    }
}

impl PromptSeries {
    pub fn new(prefilled: bool) -> Self {
        Self { prefilled }
    }

    /// Render every attempt up front; each is a pure function of its inputs.
    pub fn build(
        &self,
        signal: &ArbitrageSignal,
        a: &PoolQuote,
        b: &PoolQuote,
        question: Option<&str>,
    ) -> Vec<PromptAttempt> {
        let mut attempts = vec![
            PromptAttempt {
                kind: PromptKind::Full,
                text: full_prompt(signal, a, b, question),
            },
            PromptAttempt {
                kind: PromptKind::Reduced,
                text: reduced_prompt(signal),
            },
        ];
        if self.prefilled {
            attempts.push(PromptAttempt {
                kind: PromptKind::Prefilled,
                text: prefilled_prompt(signal),
            });
        }
        attempts
    }
}

/// The default three-attempt series.
pub fn build_attempts(
    signal: &ArbitrageSignal,
    a: &PoolQuote,
    b: &PoolQuote,
    question: Option<&str>,
) -> Vec<PromptAttempt> {
    PromptSeries::default().build(signal, a, b, question)
}

fn side(venue: Option<&String>) -> &str {
    venue.map(String::as_str).unwrap_or("none")
}

fn full_prompt(
    signal: &ArbitrageSignal,
    a: &PoolQuote,
    b: &PoolQuote,
    question: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are advising on a two-pool DEX arbitrage for {pair}.\n\
         Return ONLY this JSON format with NO comments, NO nested objects, ONLY strings:\n\n\
         {SCHEMA_TEMPLATE}\n\n\
         Data: {venue_a}={price_a:.2}, {venue_b}={price_b:.2}, Spread={spread}, \
         Buy={buy}, Sell={sell}, Opportunity={opportunity} (threshold {threshold}%)\n",
        pair = a.pair_label(),
        venue_a = a.venue,
        price_a = a.price,
        venue_b = b.venue,
        price_b = b.price,
        spread = signal.spread_display(),
        buy = side(signal.buy_side.as_ref()),
        sell = side(signal.sell_side.as_ref()),
        opportunity = if signal.has_opportunity { "yes" } else { "no" },
        threshold = signal.threshold_percent,
    );

    if let Some(q) = question.map(str::trim).filter(|q| !q.is_empty()) {
        prompt.push_str(&format!("Question from the trader: {q}\n"));
    }

    prompt.push('\n');
    prompt.push_str(FORMAT_RULES);
    prompt
}

fn reduced_prompt(signal: &ArbitrageSignal) -> String {
    format!(
        "JSON only. No comments. No explanations. Fill this template:\n\n\
         {SCHEMA_TEMPLATE}\n\n\
         Spread: {spread}\n\n\
         {FORMAT_RULES}",
        spread = signal.spread_display(),
    )
}

fn prefilled_prompt(signal: &ArbitrageSignal) -> String {
    let spread = signal.spread_display();
    let draft = match (signal.has_opportunity, signal.direction()) {
        (true, Some((buy, sell))) => AdvisoryResult {
            decision: format!("Buy {buy} Sell {sell}"),
            reason: format!("Spread {spread}"),
            recommendation: "Execute arbitrage".to_string(),
            risk_analysis: "Consider fees and gas".to_string(),
        },
        _ => AdvisoryResult {
            decision: "No Trade".to_string(),
            reason: format!("Spread {spread}"),
            recommendation: "Wait".to_string(),
            risk_analysis: "Consider fees and gas".to_string(),
        },
    };
    // Serializing an AdvisoryResult cannot fail.
    let json = serde_json::to_string(&draft).unwrap_or_default();

    format!("Repeat this JSON exactly. {FORMAT_RULES}\n\n{json}")
}
