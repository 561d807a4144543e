use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the dexarb service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DexArbConfig {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub pools: PoolsConfig,
    #[serde(default)]
    pub pairs: PairsConfig,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// JSON-RPC node used to read pool reserves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcConfig {
    /// Overridden by the `RPC_URL` environment variable when set.
    #[serde(default = "default_rpc_url")]
    pub url: String,
    #[serde(default = "default_rpc_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_seconds: default_rpc_timeout(),
        }
    }
}

/// The two pools compared on every evaluation. Spread is measured relative to `b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolsConfig {
    pub a: PoolConfig,
    pub b: PoolConfig,
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            a: PoolConfig {
                venue: "Uniswap".to_string(),
                address: "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc".to_string(),
            },
            b: PoolConfig {
                venue: "Sushiswap".to_string(),
                address: "0x397FF1542f962076d0BFE58eA045FfA2d347ACa0".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoolConfig {
    /// Human label used in signals and advice (e.g. "Uniswap").
    pub venue: String,
    /// Pair contract address.
    pub address: String,
}

/// Symbol lists used to orient a pool: the stable side is always the quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairsConfig {
    #[serde(default = "default_stable_symbols")]
    pub stable_symbols: Vec<String>,
    #[serde(default = "default_volatile_symbols")]
    pub volatile_symbols: Vec<String>,
}

impl Default for PairsConfig {
    fn default() -> Self {
        Self {
            stable_symbols: default_stable_symbols(),
            volatile_symbols: default_volatile_symbols(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalConfig {
    /// A spread strictly above this (in percent) is an opportunity.
    #[serde(default = "default_opportunity_threshold")]
    pub opportunity_threshold_percent: Decimal,
    /// Stricter threshold applied by the fallback advisor, which has no model nuance.
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold_percent: Decimal,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            opportunity_threshold_percent: default_opportunity_threshold(),
            fallback_threshold_percent: default_fallback_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryConfig {
    /// Upper bound on a single generator call.
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_seconds: u64,
    /// Append the pre-filled last-resort attempt to the prompt series.
    #[serde(default = "default_true")]
    pub prefilled_attempt: bool,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_seconds: default_attempt_timeout(),
            prefilled_attempt: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorBackend {
    /// OpenAI-compatible `/chat/completions` HTTP endpoint.
    #[default]
    ChatCompletions,
    /// Local `claude` CLI.
    ClaudeCli,
    /// No generator; every evaluation resolves through the fallback advisor.
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub backend: GeneratorBackend,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the chat-completions API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Transport-level timeout; the orchestrator applies its own per-attempt bound on top.
    #[serde(default = "default_generator_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_generator_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}
fn default_rpc_timeout() -> u64 {
    10
}
fn default_stable_symbols() -> Vec<String> {
    ["USDC", "USDT", "DAI"].iter().map(|s| s.to_string()).collect()
}
fn default_volatile_symbols() -> Vec<String> {
    ["WETH", "WBTC"].iter().map(|s| s.to_string()).collect()
}
fn default_opportunity_threshold() -> Decimal {
    Decimal::new(5, 1)
}
fn default_fallback_threshold() -> Decimal {
    Decimal::new(8, 1)
}
fn default_attempt_timeout() -> u64 {
    12
}
fn default_true() -> bool {
    true
}
fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}
fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}
fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}
fn default_temperature() -> f64 {
    0.1
}
fn default_max_tokens() -> u32 {
    400
}
fn default_generator_timeout() -> u64 {
    15
}
fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}
