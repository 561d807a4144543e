use async_trait::async_trait;

use crate::error::GeneratorError;

/// A free-text completion backend: prompt in, completion out.
///
/// Treated as an unreliable oracle. Implementations must be safe to share
/// across concurrent evaluations; the orchestrator holds them behind an `Arc`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Generator used when no backend is configured. Every call fails, so each
/// evaluation resolves through the fallback advisor.
#[derive(Debug, Clone)]
pub struct DisabledGenerator {
    reason: String,
}

impl DisabledGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_generator_always_fails() {
        let generator = DisabledGenerator::new("no API key");
        let err = generator.generate("anything").await.unwrap_err();
        assert_eq!(err, GeneratorError::Unavailable("no API key".to_string()));
        assert_eq!(generator.name(), "disabled");
    }
}
