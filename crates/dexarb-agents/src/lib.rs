pub mod chat_completions;
pub mod claude_cli;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod orchestrator;
pub mod prompts;
pub mod sanitizer;
pub mod validator;

pub mod test_support;

pub use chat_completions::ChatCompletionsGenerator;
pub use claude_cli::ClaudeCliGenerator;
pub use error::{ExtractionError, GeneratorError, ValidationError};
pub use fallback::{fallback, FallbackAdvisor};
pub use generator::{DisabledGenerator, TextGenerator};
pub use orchestrator::{AdvisoryOrchestrator, AdvisoryState};
pub use prompts::{build_attempts, PromptAttempt, PromptSeries};
pub use sanitizer::{sanitize, Stage, STAGES};
pub use validator::validate;
